// conformance-core/src/interfaces/mod.rs
// ============================================================================
// Module: Conformance Harness Interfaces
// Description: Engine-agnostic interfaces for execution, reporting, and manifests.
// Purpose: Define the contract surfaces the harness runtime depends on.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The harness never embeds a language engine. It hands decoded source text to
//! an [`ExecutionSink`] together with a [`FailureHook`], the single capability
//! executed test code may use to report soft assertion failures. Manifests
//! arrive through a [`ManifestSource`] and human-readable progress leaves
//! through a [`ReportOutput`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::ManifestError;
use crate::core::TestManifest;

// ============================================================================
// SECTION: Failure Hook
// ============================================================================

/// Reporting hook exposed to executed test code.
///
/// Each call signals one soft assertion failure. Calls never fail and carry no
/// return value.
pub trait FailureHook {
    /// Records one assertion failure with its message.
    fn report_failure(&self, message: &str);
}

// ============================================================================
// SECTION: Execution Sink
// ============================================================================

/// Errors raised while executing a case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The executed source raised an error.
    #[error("{kind}: {message}")]
    Thrown {
        /// Error class reported by the engine (for example `TypeError`).
        kind: String,
        /// Error message reported by the engine.
        message: String,
    },
    /// The engine could not run the source at all.
    #[error("engine failure: {0}")]
    Engine(String),
}

/// Language engine that runs decoded source text.
pub trait ExecutionSink {
    /// Executes `source`, routing assertion failures through `hook`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError`] when the source raises or the engine fails.
    fn execute(&mut self, source: &str, hook: &dyn FailureHook) -> Result<(), ExecutionError>;
}

impl<T: ExecutionSink + ?Sized> ExecutionSink for &mut T {
    fn execute(&mut self, source: &str, hook: &dyn FailureHook) -> Result<(), ExecutionError> {
        (**self).execute(source, hook)
    }
}

impl<T: ExecutionSink + ?Sized> ExecutionSink for Box<T> {
    fn execute(&mut self, source: &str, hook: &dyn FailureHook) -> Result<(), ExecutionError> {
        (**self).execute(source, hook)
    }
}

// ============================================================================
// SECTION: Manifest Source
// ============================================================================

/// Read-only provider of suite manifests.
pub trait ManifestSource {
    /// Returns the suite identifiers in run order.
    fn suite_ids(&self) -> Vec<String>;

    /// Loads the manifest for one suite identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError`] when the manifest is missing or malformed.
    fn load(&self, suite_id: &str) -> Result<TestManifest, ManifestError>;
}

// ============================================================================
// SECTION: Report Output
// ============================================================================

/// Line-oriented sink for human-readable progress and summaries.
pub trait ReportOutput {
    /// Writes one line of report text.
    fn write_line(&mut self, line: &str);
}
