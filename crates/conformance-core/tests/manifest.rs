// crates/conformance-core/tests/manifest.rs
// ============================================================================
// Module: Manifest Tests
// Description: Tests for manifest parsing, loading, and exclusions.
// ============================================================================
//! ## Overview
//! Validates the manifest document shape, digest stamping, error mapping,
//! and case exclusion.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use std::collections::BTreeSet;

use conformance_core::DEFAULT_HASH_ALGORITHM;
use conformance_core::ManifestError;
use conformance_core::TestManifest;
use conformance_core::hash_bytes;
use support::case;
use support::manifest_json;

#[test]
fn parses_document_shape_in_order() {
    let json = r#"{"testsCollection":{"name":"language/expressions","tests":[
        {"path":"a.js","code":"cGFzcw=="},
        {"path":"b.js","code":""}
    ]}}"#;
    let manifest = TestManifest::from_json_slice(json.as_bytes()).unwrap();
    assert_eq!(manifest.name, "language/expressions");
    let paths: Vec<&str> = manifest.cases.iter().map(|case| case.path.as_str()).collect();
    assert_eq!(paths, vec!["a.js", "b.js"]);
}

#[test]
fn digest_covers_raw_bytes() {
    let json = manifest_json("digest", &[case("a.js", "pass")]);
    let manifest = TestManifest::from_json_slice(json.as_bytes()).unwrap();
    assert_eq!(manifest.digest, Some(hash_bytes(DEFAULT_HASH_ALGORITHM, json.as_bytes())));
}

#[test]
fn empty_test_list_is_valid() {
    let json = r#"{"testsCollection":{"name":"empty","tests":[]}}"#;
    let manifest = TestManifest::from_json_slice(json.as_bytes()).unwrap();
    assert!(manifest.cases.is_empty());
}

#[test]
fn blank_name_is_invalid() {
    let json = r#"{"testsCollection":{"name":"  ","tests":[]}}"#;
    let err = TestManifest::from_json_slice(json.as_bytes()).unwrap_err();
    assert!(matches!(err, ManifestError::Invalid(_)));
}

#[test]
fn missing_collection_is_a_parse_error() {
    let err = TestManifest::from_json_slice(br#"{"tests":[]}"#).unwrap_err();
    assert!(matches!(err, ManifestError::Parse(_)));
}

#[test]
fn non_utf8_bytes_are_invalid() {
    let err = TestManifest::from_json_slice(&[0xff, 0xfe, 0x7b]).unwrap_err();
    assert!(matches!(err, ManifestError::Invalid(_)));
}

#[test]
fn load_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("suite.json");
    std::fs::write(&path, manifest_json("disk", &[case("a.js", "pass")])).unwrap();
    let manifest = TestManifest::load(&path).unwrap();
    assert_eq!(manifest.name, "disk");
    assert_eq!(manifest.cases.len(), 1);
    assert!(manifest.digest.is_some());
}

#[test]
fn load_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = TestManifest::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ManifestError::Io { .. }));
}

#[test]
fn exclusion_removes_listed_paths_only() {
    let mut manifest = TestManifest::new(
        "excl",
        vec![case("a.js", "pass"), case("b.js", "pass"), case("c.js", "pass")],
    );
    let excluded: BTreeSet<String> = ["b.js".to_string(), "zzz.js".to_string()].into();
    assert_eq!(manifest.exclude(&excluded), 1);
    let paths: Vec<&str> = manifest.cases.iter().map(|case| case.path.as_str()).collect();
    assert_eq!(paths, vec!["a.js", "c.js"]);
}

#[test]
fn negative_field_is_parsed_and_dropped_on_request() {
    let json = r#"{"testsCollection":{"name":"neg","tests":[
        {"path":"pos.js","code":"dHJ1ZQ=="},
        {"path":"neg.js","code":"dGhyb3cgMQ==","negative":"SyntaxError","description":"x"}
    ]}}"#;
    let mut manifest = TestManifest::from_json_slice(json.as_bytes()).unwrap();
    assert_eq!(manifest.cases.len(), 2);
    assert_eq!(manifest.cases[1].negative.as_deref(), Some("SyntaxError"));
    assert_eq!(manifest.drop_negative(), 1);
    let paths: Vec<&str> = manifest.cases.iter().map(|case| case.path.as_str()).collect();
    assert_eq!(paths, vec!["pos.js"]);
}

#[test]
fn positive_cases_serialize_without_negative_field() {
    let manifest = TestManifest::new("docs", vec![case("a.js", "pass")]);
    let json = serde_json::to_string(&manifest.to_document()).unwrap();
    assert!(!json.contains("negative"));
}

#[test]
fn document_round_trip_preserves_cases() {
    let manifest = TestManifest::new("docs", vec![case("a.js", "pass")]);
    let json = serde_json::to_string(&manifest.to_document()).unwrap();
    assert!(json.starts_with(r#"{"testsCollection":"#));
    let reparsed = TestManifest::from_json_slice(json.as_bytes()).unwrap();
    assert_eq!(reparsed.cases, manifest.cases);
}
