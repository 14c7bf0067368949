// conformance-core/src/runtime/aggregate.rs
// ============================================================================
// Module: Run Aggregator
// Description: Runs manifests in order and sums suite tallies into a run report.
// Purpose: Provide the single canonical entry point for a harness run.
// Dependencies: crate::{audit, core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The aggregator processes manifests strictly one after another, never in
//! parallel: the shared failure recorder is only meaningful when at most one
//! case executes at a time. Every manifest is attempted; failing suites never
//! stop the run. A manifest that cannot be loaded is the one fatal condition,
//! since no case-level recovery is possible without it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;

use crate::audit::HarnessAuditEvent;
use crate::audit::HarnessAuditSink;
use crate::audit::NoopAuditSink;
use crate::core::ManifestError;
use crate::core::RunReport;
use crate::core::TestManifest;
use crate::interfaces::ExecutionSink;
use crate::interfaces::ManifestSource;
use crate::interfaces::ReportOutput;
use crate::runtime::recorder::FailureRecorder;
use crate::runtime::report::format_summary;
use crate::runtime::runner::CaseRunner;
use crate::runtime::suite::HarnessOptions;
use crate::runtime::suite::SuiteIterator;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Run-level errors.
#[derive(Debug, Error)]
pub enum RunError {
    /// A manifest could not be loaded; the run was aborted.
    #[error("failed to load manifest {suite}: {source}")]
    Manifest {
        /// Suite identifier that failed to load.
        suite: String,
        /// Underlying manifest error.
        source: ManifestError,
    },
}

// ============================================================================
// SECTION: Run Aggregator
// ============================================================================

/// Sequential multi-suite runner.
pub struct RunAggregator<E, O> {
    /// Case runner owning the engine and the shared recorder.
    runner: CaseRunner<E>,
    /// Human-readable report output.
    output: O,
    /// Structured audit sink.
    audit: Arc<dyn HarnessAuditSink>,
    /// Presentation options.
    options: HarnessOptions,
}

impl<E: ExecutionSink, O: ReportOutput> RunAggregator<E, O> {
    /// Creates an aggregator with default options and no audit logging.
    #[must_use]
    pub fn new(sink: E, output: O) -> Self {
        Self::with_options(sink, output, HarnessOptions::default())
    }

    /// Creates an aggregator with explicit options and no audit logging.
    #[must_use]
    pub fn with_options(sink: E, output: O, options: HarnessOptions) -> Self {
        let recorder = FailureRecorder::with_message_limit(options.max_messages_per_case);
        Self {
            runner: CaseRunner::with_recorder(sink, recorder),
            output,
            audit: Arc::new(NoopAuditSink),
            options,
        }
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn HarnessAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the case runner.
    #[must_use]
    pub const fn runner(&self) -> &CaseRunner<E> {
        &self.runner
    }

    /// Returns the report output.
    #[must_use]
    pub const fn output(&self) -> &O {
        &self.output
    }

    /// Consumes the aggregator and returns the engine and report output.
    #[must_use]
    pub fn into_parts(self) -> (E, O) {
        (self.runner.into_sink(), self.output)
    }

    /// Runs already-loaded manifests in order.
    pub fn run_all(&mut self, manifests: &[TestManifest]) -> RunReport {
        let mut report = RunReport::default();
        for manifest in manifests {
            self.run_one(manifest, &mut report);
        }
        self.finish(&report);
        report
    }

    /// Loads and runs each manifest from `source` in order.
    ///
    /// Manifests are loaded one at a time, immediately before their suite runs.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Manifest`] when a manifest cannot be loaded; suites
    /// that already ran are discarded with the aborted run.
    pub fn run_source(&mut self, source: &dyn ManifestSource) -> Result<RunReport, RunError> {
        let mut report = RunReport::default();
        for suite in source.suite_ids() {
            let manifest = source.load(&suite).map_err(|err| RunError::Manifest {
                suite: suite.clone(),
                source: err,
            })?;
            self.run_one(&manifest, &mut report);
        }
        self.finish(&report);
        Ok(report)
    }

    /// Runs one suite and folds its report into the run report.
    fn run_one(&mut self, manifest: &TestManifest, report: &mut RunReport) {
        let suite = SuiteIterator::new(
            &mut self.runner,
            &mut self.output,
            self.audit.as_ref(),
            self.options,
        )
        .run_suite(manifest);
        report.tally.absorb(&suite.tally);
        report.suites.push(suite);
    }

    /// Emits the final summary line and audit event.
    fn finish(&mut self, report: &RunReport) {
        self.output.write_line(&format_summary(&report.tally));
        self.audit.record(&HarnessAuditEvent::run_finished(report.suites.len(), report.tally));
    }
}
