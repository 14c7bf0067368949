// conformance-core/src/runtime/runner.rs
// ============================================================================
// Module: Case Runner
// Description: Executes one case behind a failure boundary and classifies it.
// Purpose: Contain every per-case failure so the run always continues.
// Dependencies: crate::{core, interfaces, runtime::recorder}
// ============================================================================

//! ## Overview
//! A case is decoded, handed to the [`ExecutionSink`] together with the
//! shared [`FailureRecorder`], and classified:
//! - decode failure, raised error, or sink panic: [`CaseOutcome::Exception`];
//! - completion with an unchanged failure count: [`CaseOutcome::Passed`];
//! - completion with a larger failure count: [`CaseOutcome::AssertionFailed`].
//!
//! The recorder count is sampled, never reset.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::panic;
use std::panic::AssertUnwindSafe;

use crate::core::CaseOutcome;
use crate::core::ExceptionKind;
use crate::core::TestCase;
use crate::core::decode_payload;
use crate::interfaces::ExecutionError;
use crate::interfaces::ExecutionSink;
use crate::runtime::recorder::FailureRecorder;

// ============================================================================
// SECTION: Case Runner
// ============================================================================

/// Runs single cases against an execution sink.
#[derive(Debug)]
pub struct CaseRunner<E> {
    /// Engine executing decoded sources.
    sink: E,
    /// Shared failure ledger exposed to executed code.
    recorder: FailureRecorder,
}

impl<E: ExecutionSink> CaseRunner<E> {
    /// Creates a runner with a fresh recorder.
    #[must_use]
    pub fn new(sink: E) -> Self {
        Self::with_recorder(sink, FailureRecorder::new())
    }

    /// Creates a runner around an existing recorder.
    #[must_use]
    pub const fn with_recorder(sink: E, recorder: FailureRecorder) -> Self {
        Self {
            sink,
            recorder,
        }
    }

    /// Returns the shared failure recorder.
    #[must_use]
    pub const fn recorder(&self) -> &FailureRecorder {
        &self.recorder
    }

    /// Returns the execution sink.
    #[must_use]
    pub const fn sink(&self) -> &E {
        &self.sink
    }

    /// Consumes the runner and returns the execution sink.
    #[must_use]
    pub fn into_sink(self) -> E {
        self.sink
    }

    /// Runs one case and classifies its outcome.
    pub fn run(&mut self, case: &TestCase) -> CaseOutcome {
        let before = self.recorder.count();
        // Messages left by code running outside a case are not attributed to this one.
        let _ = self.recorder.take_messages();

        let source = match decode_payload(&case.code) {
            Ok(source) => source,
            Err(err) => {
                return CaseOutcome::Exception {
                    kind: ExceptionKind::Decode,
                    message: err.to_string(),
                    reported: 0,
                };
            }
        };

        let sink = &mut self.sink;
        let recorder = &self.recorder;
        let result = panic::catch_unwind(AssertUnwindSafe(|| sink.execute(&source, recorder)));

        let after = self.recorder.count();
        let reported = after.saturating_sub(before);
        let messages = self.recorder.take_messages();

        match result {
            Ok(Ok(())) if reported == 0 => CaseOutcome::Passed,
            Ok(Ok(())) => CaseOutcome::AssertionFailed {
                reported,
                messages,
            },
            Ok(Err(ExecutionError::Thrown {
                kind,
                message,
            })) => CaseOutcome::Exception {
                kind: ExceptionKind::Thrown,
                message: format!("{kind}: {message}"),
                reported,
            },
            Ok(Err(ExecutionError::Engine(message))) => CaseOutcome::Exception {
                kind: ExceptionKind::Engine,
                message,
                reported,
            },
            Err(payload) => CaseOutcome::Exception {
                kind: ExceptionKind::Panic,
                message: panic_message(payload.as_ref()),
                reported,
            },
        }
    }
}

/// Extracts a readable message from a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "execution sink panicked".to_string()
}
