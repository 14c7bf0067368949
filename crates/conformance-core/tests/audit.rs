// crates/conformance-core/tests/audit.rs
// ============================================================================
// Module: Audit Sink Tests
// Description: Tests for structured harness audit events.
// ============================================================================
//! ## Overview
//! Validates event order for a run and the JSON-lines file sink format.

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

use std::sync::Arc;

use conformance_core::BufferedReport;
use conformance_core::FileAuditSink;
use conformance_core::HarnessAuditEvent;
use conformance_core::HarnessAuditKind;
use conformance_core::HarnessAuditSink;
use conformance_core::MemoryAuditSink;
use conformance_core::RunAggregator;
use conformance_core::RunTally;
use serde_json::Value;
use support::ScriptedSink;
use support::mixed_manifest;

#[test]
fn run_emits_events_in_order() {
    let sink = Arc::new(MemoryAuditSink::new());
    let mut aggregator = RunAggregator::new(ScriptedSink::default(), BufferedReport::new())
        .with_audit(sink.clone());
    aggregator.run_all(&[mixed_manifest()]);

    let events = sink.events();
    let labels: Vec<&str> = events
        .iter()
        .map(|event| match &event.kind {
            HarnessAuditKind::SuiteStarted {
                ..
            } => "suite_started",
            HarnessAuditKind::CaseFinished {
                ..
            } => "case_finished",
            HarnessAuditKind::SuiteFinished {
                ..
            } => "suite_finished",
            HarnessAuditKind::RunFinished {
                ..
            } => "run_finished",
        })
        .collect();
    assert_eq!(
        labels,
        vec![
            "suite_started",
            "case_finished",
            "case_finished",
            "case_finished",
            "suite_finished",
            "run_finished",
        ]
    );
}

#[test]
fn file_sink_appends_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    let sink = FileAuditSink::new(&path).unwrap();
    sink.record(&HarnessAuditEvent::suite_started("alpha", 2, None));
    sink.record(&HarnessAuditEvent::run_finished(1, RunTally::default()));

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<Value> =
        text.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["event"], "suite_started");
    assert_eq!(lines[0]["suite"], "alpha");
    assert_eq!(lines[1]["event"], "run_finished");
    assert!(lines[1]["timestamp_ms"].is_u64());
}
