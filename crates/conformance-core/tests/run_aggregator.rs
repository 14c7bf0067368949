// crates/conformance-core/tests/run_aggregator.rs
// ============================================================================
// Module: Run Aggregator Tests
// Description: End-to-end tests for multi-suite runs.
// ============================================================================
//! ## Overview
//! Validates run-level tallies, the summary line, failure isolation across
//! suites, and manifest-source loading with exclusions.

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

use std::path::PathBuf;

use conformance_core::BufferedReport;
use conformance_core::CaseOutcome;
use conformance_core::ExceptionKind;
use conformance_core::ExecutionSink;
use conformance_core::FileManifestSource;
use conformance_core::RunAggregator;
use conformance_core::RunError;
use conformance_core::RunTally;
use conformance_core::TestManifest;
use support::ScriptedSink;
use support::case;
use support::manifest_json;
use support::mixed_manifest;
use support::raw_case;

fn tally(total: u64, passed: u64, failed: u64, exceptions: u64, reported: u64) -> RunTally {
    RunTally {
        total_cases: total,
        passed_cases: passed,
        failed_assertions: failed,
        exceptions,
        reported_failures: reported,
    }
}

#[test]
fn mixed_manifest_produces_expected_summary() {
    let mut aggregator = RunAggregator::new(ScriptedSink::default(), BufferedReport::new());
    let report = aggregator.run_all(&[mixed_manifest()]);

    assert_eq!(report.tally, tally(3, 1, 1, 1, 1));
    assert_eq!(
        aggregator.output().lines().last().map(String::as_str),
        Some("Total cases: 3, passed: 1, failed cases: 1, exceptions: 1, reported failures: 1")
    );
}

#[test]
fn empty_run_prints_zero_summary() {
    let mut aggregator = RunAggregator::new(ScriptedSink::default(), BufferedReport::new());
    let report = aggregator.run_all(&[TestManifest::new("empty", Vec::new())]);

    assert_eq!(report.tally, RunTally::default());
    assert_eq!(
        aggregator.output().lines(),
        [
            "  ==> Running \"empty\"".to_string(),
            "Total cases: 0, passed: 0, failed cases: 0, exceptions: 0, reported failures: 0".to_string(),
        ]
    );
}

#[test]
fn decode_failure_does_not_stop_the_run() {
    let manifest = TestManifest::new(
        "decode",
        vec![raw_case("bad.js", "%%%"), case("good.js", "pass")],
    );
    let mut aggregator = RunAggregator::new(ScriptedSink::default(), BufferedReport::new());
    let report = aggregator.run_all(&[manifest]);

    assert_eq!(report.tally, tally(2, 1, 0, 1, 0));
    assert!(matches!(
        report.suites[0].cases[0].outcome,
        CaseOutcome::Exception {
            kind: ExceptionKind::Decode,
            ..
        }
    ));
}

#[test]
fn same_manifest_twice_yields_identical_suite_tallies() {
    let manifest = TestManifest::new(
        "repeat",
        vec![case("a.js", "report first\nreport second"), case("b.js", "pass")],
    );
    let mut aggregator = RunAggregator::new(ScriptedSink::default(), BufferedReport::new());
    let report = aggregator.run_all(&[manifest.clone(), manifest]);

    assert_eq!(report.suites.len(), 2);
    assert_eq!(report.suites[0].tally, report.suites[1].tally);
    assert_eq!(report.suites[1].tally, tally(2, 1, 1, 0, 2));
    assert_eq!(aggregator.runner().recorder().count(), 4);
}

#[test]
fn hook_then_throw_counts_as_exception_only() {
    let manifest = TestManifest::new("both", vec![case("a.js", "report soft\nthrow Error: hard")]);
    let mut aggregator = RunAggregator::new(ScriptedSink::default(), BufferedReport::new());
    let report = aggregator.run_all(&[manifest]);

    assert_eq!(report.tally, tally(1, 0, 0, 1, 1));
}

#[test]
fn panicking_suite_does_not_affect_later_suites() {
    let first = TestManifest::new("first", vec![case("boom.js", "panic engine bug")]);
    let second = TestManifest::new("second", vec![case("ok.js", "pass")]);
    let mut aggregator = RunAggregator::new(ScriptedSink::default(), BufferedReport::new());
    let report = aggregator.run_all(&[first, second]);

    assert_eq!(report.suites[0].tally, tally(1, 0, 0, 1, 0));
    assert_eq!(report.suites[1].tally, tally(1, 1, 0, 0, 0));
    assert_eq!(report.tally, tally(2, 1, 0, 1, 0));
}

#[test]
fn run_tally_is_sum_of_suite_tallies() {
    let mut aggregator = RunAggregator::new(ScriptedSink::default(), BufferedReport::new());
    let report = aggregator.run_all(&[mixed_manifest(), mixed_manifest(), mixed_manifest()]);

    let mut summed = RunTally::default();
    for suite in &report.suites {
        summed.absorb(&suite.tally);
    }
    assert_eq!(report.tally, summed);
    assert_eq!(report.tally, tally(9, 3, 3, 3, 3));
}

#[test]
fn file_source_loads_in_order_and_applies_exclusions() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    std::fs::write(
        &first,
        manifest_json("first", &[case("keep.js", "pass"), case("skip.js", "throw Error: no")]),
    )
    .unwrap();
    std::fs::write(&second, manifest_json("second", &[case("other.js", "report x")])).unwrap();

    let source = FileManifestSource::new(vec![first, second])
        .with_exclusions(["skip.js".to_string()]);
    let mut aggregator = RunAggregator::new(ScriptedSink::default(), BufferedReport::new());
    let report = aggregator.run_source(&source).unwrap();

    let names: Vec<&str> = report.suites.iter().map(|suite| suite.name.as_str()).collect();
    assert_eq!(names, vec!["first", "second"]);
    assert_eq!(report.tally, tally(2, 1, 1, 0, 1));
    assert!(report.suites.iter().all(|suite| suite.digest.is_some()));
}

#[test]
fn file_source_drops_negative_cases() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("negative.json");
    let mut expects_throw = case("neg.js", "throw SyntaxError: unexpected token");
    expects_throw.negative = Some("SyntaxError".to_string());
    std::fs::write(&path, manifest_json("negative", &[case("pos.js", "pass"), expects_throw]))
        .unwrap();

    let source = FileManifestSource::new(vec![path]);
    let mut aggregator = RunAggregator::new(ScriptedSink::default(), BufferedReport::new());
    let report = aggregator.run_source(&source).unwrap();

    assert_eq!(report.tally, tally(1, 1, 0, 0, 0));
    assert_eq!(aggregator.runner().sink().executed.len(), 1);
}

#[test]
fn borrowed_sink_keeps_its_history_after_the_run() {
    let mut sink = ScriptedSink::default();
    let mut aggregator = RunAggregator::new(&mut sink, BufferedReport::new());
    let report = aggregator.run_all(&[mixed_manifest()]);
    let (_, output) = aggregator.into_parts();

    assert_eq!(report.tally, tally(3, 1, 1, 1, 1));
    assert_eq!(output.lines().len(), 2);
    assert_eq!(sink.executed.len(), 3);
}

#[test]
fn boxed_sink_runs_like_a_concrete_one() {
    let sink: Box<dyn ExecutionSink> = Box::new(ScriptedSink::default());
    let mut aggregator = RunAggregator::new(sink, BufferedReport::new());
    let report = aggregator.run_all(&[mixed_manifest()]);

    assert_eq!(report.tally, tally(3, 1, 1, 1, 1));
}

#[test]
fn missing_manifest_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let present = dir.path().join("present.json");
    std::fs::write(&present, manifest_json("present", &[case("a.js", "pass")])).unwrap();
    let missing: PathBuf = dir.path().join("missing.json");

    let source = FileManifestSource::new(vec![present, missing]);
    let mut aggregator = RunAggregator::new(ScriptedSink::default(), BufferedReport::new());
    let err = aggregator.run_source(&source).unwrap_err();

    assert!(matches!(err, RunError::Manifest { .. }));
    assert!(
        !aggregator.output().lines().iter().any(|line| line.starts_with("Total cases:")),
        "aborted runs must not print a summary"
    );
}
