// crates/conformance-amalgamate/tests/pack.rs
// ============================================================================
// Module: Manifest Packer Tests
// Description: Tests for packing loose test files into manifests.
// ============================================================================
//! ## Overview
//! Validates that packed manifests load back with the same sources, in the
//! listed order, with exclusions applied.

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

use std::collections::BTreeSet;
use std::fs;

use conformance_amalgamate::PackError;
use conformance_amalgamate::collect_test_files;
use conformance_amalgamate::pack_manifest;
use conformance_amalgamate::write_manifest;
use conformance_core::TestManifest;
use conformance_core::decode_payload;

#[test]
fn packed_manifest_loads_with_original_sources() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b.js"), "var b;\n").unwrap();
    fs::write(dir.path().join("a.js"), "var a;\n").unwrap();
    fs::write(dir.path().join("skip.js"), "broken(\n").unwrap();
    let files = vec!["b.js".to_string(), "skip.js".to_string(), "a.js".to_string()];
    let exclude: BTreeSet<String> = ["skip.js".to_string()].into();

    let manifest = pack_manifest("packed", dir.path(), &files, &exclude).unwrap();
    let out = dir.path().join("packed.json");
    write_manifest(&out, &manifest).unwrap();

    let loaded = TestManifest::load(&out).unwrap();
    assert_eq!(loaded.name, "packed");
    let paths: Vec<&str> = loaded.cases.iter().map(|case| case.path.as_str()).collect();
    assert_eq!(paths, vec!["b.js", "a.js"]);
    assert_eq!(decode_payload(&loaded.cases[0].code).unwrap(), "var b;\n");
}

#[test]
fn blank_name_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = pack_manifest(" ", dir.path(), &[], &BTreeSet::new()).unwrap_err();
    assert!(matches!(err, PackError::Invalid(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err =
        pack_manifest("x", dir.path(), &["absent.js".to_string()], &BTreeSet::new()).unwrap_err();
    assert!(matches!(err, PackError::Io { .. }));
}

#[test]
fn collect_lists_script_files_sorted() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b.js"), "").unwrap();
    fs::write(dir.path().join("a.js"), "").unwrap();
    fs::write(dir.path().join("notes.txt"), "").unwrap();
    fs::create_dir(dir.path().join("nested.js")).unwrap();
    assert_eq!(collect_test_files(dir.path()).unwrap(), vec!["a.js".to_string(), "b.js".to_string()]);
}
