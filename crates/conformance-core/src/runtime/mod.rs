// conformance-core/src/runtime/mod.rs
// ============================================================================
// Module: Conformance Harness Runtime
// Description: Case runner, suite iterator, run aggregator, and helpers.
// Purpose: Execute manifests against an engine and account for every case.
// Dependencies: crate::{audit, core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement the strictly sequential execution path:
//! the [`RunAggregator`] walks manifests in order, the [`SuiteIterator`]
//! walks cases in order, and the [`CaseRunner`] executes one case behind a
//! failure boundary, classifying it by the change in the shared
//! [`FailureRecorder`] count.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod aggregate;
pub mod recorder;
pub mod report;
pub mod runner;
pub mod source;
pub mod suite;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use aggregate::RunAggregator;
pub use aggregate::RunError;
pub use recorder::DEFAULT_MAX_MESSAGES;
pub use recorder::FailureRecorder;
pub use report::BufferedReport;
pub use report::WriterReport;
pub use report::format_summary;
pub use runner::CaseRunner;
pub use source::FileManifestSource;
pub use suite::HarnessOptions;
pub use suite::SuiteIterator;
