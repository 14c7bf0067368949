// conformance-core/src/lib.rs
// ============================================================================
// Module: Conformance Harness Core Library
// Description: Public API surface for the conformance harness core.
// Purpose: Expose manifest types, interfaces, and the execution runtime.
// Dependencies: crate::{audit, core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The conformance harness core loads externally authored test manifests,
//! runs every case against a language engine under failure isolation, and
//! folds the outcomes into suite and run tallies. Engines integrate through
//! the [`ExecutionSink`] interface and report soft assertion failures back
//! through a [`FailureHook`] capability handed to them for each case.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::HarnessAuditEvent;
pub use audit::HarnessAuditKind;
pub use audit::HarnessAuditSink;
pub use audit::MemoryAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use core::*;
pub use interfaces::ExecutionError;
pub use interfaces::ExecutionSink;
pub use interfaces::FailureHook;
pub use interfaces::ManifestSource;
pub use interfaces::ReportOutput;
pub use runtime::BufferedReport;
pub use runtime::CaseRunner;
pub use runtime::FailureRecorder;
pub use runtime::FileManifestSource;
pub use runtime::HarnessOptions;
pub use runtime::RunAggregator;
pub use runtime::RunError;
pub use runtime::SuiteIterator;
pub use runtime::WriterReport;
