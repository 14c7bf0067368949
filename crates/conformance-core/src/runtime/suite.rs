// conformance-core/src/runtime/suite.rs
// ============================================================================
// Module: Suite Iterator
// Description: Walks one manifest's cases in order and tallies outcomes.
// Purpose: Fold per-case outcomes into a suite report without skipping cases.
// Dependencies: crate::{audit, core, interfaces, runtime::runner}
// ============================================================================

//! ## Overview
//! The suite iterator announces the suite, runs every case through the
//! [`CaseRunner`] in manifest order, and records each outcome exactly once.
//! No case is skipped or retried.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::audit::HarnessAuditEvent;
use crate::audit::HarnessAuditSink;
use crate::core::CaseOutcome;
use crate::core::CaseRecord;
use crate::core::RunTally;
use crate::core::SuiteReport;
use crate::core::TestManifest;
use crate::interfaces::ExecutionSink;
use crate::interfaces::ReportOutput;
use crate::runtime::recorder::DEFAULT_MAX_MESSAGES;
use crate::runtime::runner::CaseRunner;

// ============================================================================
// SECTION: Options
// ============================================================================

/// Presentation options shared by suite and run execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarnessOptions {
    /// Write one report line per exception case.
    pub echo_exceptions: bool,
    /// Failure messages retained per case.
    pub max_messages_per_case: usize,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            echo_exceptions: false,
            max_messages_per_case: DEFAULT_MAX_MESSAGES,
        }
    }
}

// ============================================================================
// SECTION: Suite Iterator
// ============================================================================

/// Runs the cases of one manifest.
pub struct SuiteIterator<'a, E> {
    /// Case runner shared across suites.
    runner: &'a mut CaseRunner<E>,
    /// Human-readable report output.
    output: &'a mut dyn ReportOutput,
    /// Structured audit sink.
    audit: &'a dyn HarnessAuditSink,
    /// Presentation options.
    options: HarnessOptions,
}

impl<'a, E: ExecutionSink> SuiteIterator<'a, E> {
    /// Creates a suite iterator over borrowed run components.
    pub fn new(
        runner: &'a mut CaseRunner<E>,
        output: &'a mut dyn ReportOutput,
        audit: &'a dyn HarnessAuditSink,
        options: HarnessOptions,
    ) -> Self {
        Self {
            runner,
            output,
            audit,
            options,
        }
    }

    /// Runs every case of `manifest` in order and returns the suite report.
    pub fn run_suite(&mut self, manifest: &TestManifest) -> SuiteReport {
        self.output.write_line(&format!("  ==> Running \"{}\"", manifest.name));
        self.audit.record(&HarnessAuditEvent::suite_started(
            &manifest.name,
            manifest.cases.len(),
            manifest.digest.clone(),
        ));

        let mut tally = RunTally::default();
        let mut cases = Vec::with_capacity(manifest.cases.len());
        for case in &manifest.cases {
            let outcome = self.runner.run(case);
            tally.record(&outcome);
            self.audit.record(&HarnessAuditEvent::case_finished(
                &manifest.name,
                &case.path,
                &outcome,
            ));
            if self.options.echo_exceptions
                && let CaseOutcome::Exception {
                    kind,
                    message,
                    ..
                } = &outcome
            {
                self.output.write_line(&format!("    {} (exception, {kind}): {message}", case.path));
            }
            cases.push(CaseRecord {
                path: case.path.clone(),
                outcome,
            });
        }

        self.audit.record(&HarnessAuditEvent::suite_finished(&manifest.name, tally));
        SuiteReport {
            name: manifest.name.clone(),
            digest: manifest.digest.clone(),
            tally,
            cases,
        }
    }
}
