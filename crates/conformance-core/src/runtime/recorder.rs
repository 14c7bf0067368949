// conformance-core/src/runtime/recorder.rs
// ============================================================================
// Module: Failure Recorder
// Description: Shared assertion-failure counter handed to executed code.
// Purpose: Let executed cases report soft failures without a return protocol.
// Dependencies: crate::interfaces
// ============================================================================

//! ## Overview
//! The recorder is the one failure ledger shared by the harness and the code
//! it executes. Engines receive it as a [`FailureHook`] for the duration of a
//! case; the case runner samples [`FailureRecorder::count`] before and after
//! execution and classifies by the delta.
//!
//! ## Invariants
//! - The count never decreases and is never reset.
//! - Only the diagnostic message buffer is drained between cases.
//! - Execution is serialized, so interior mutability needs no locking.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cell::Cell;
use std::cell::RefCell;

use crate::interfaces::FailureHook;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default number of failure messages retained per case.
pub const DEFAULT_MAX_MESSAGES: usize = 16;

// ============================================================================
// SECTION: Failure Recorder
// ============================================================================

/// Process-lifetime failure counter with a bounded per-case message buffer.
#[derive(Debug)]
pub struct FailureRecorder {
    /// Total failures reported since creation.
    count: Cell<u64>,
    /// Messages reported since the last drain.
    messages: RefCell<Vec<String>>,
    /// Maximum messages retained between drains.
    max_messages: usize,
}

impl Default for FailureRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl FailureRecorder {
    /// Creates a recorder with the default message limit.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_message_limit(DEFAULT_MAX_MESSAGES)
    }

    /// Creates a recorder retaining at most `max_messages` messages per drain.
    #[must_use]
    pub const fn with_message_limit(max_messages: usize) -> Self {
        Self {
            count: Cell::new(0),
            messages: RefCell::new(Vec::new()),
            max_messages,
        }
    }

    /// Returns the total number of failures reported so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.get()
    }

    /// Drains the retained messages; the count is left untouched.
    pub fn take_messages(&self) -> Vec<String> {
        self.messages.take()
    }
}

impl FailureHook for FailureRecorder {
    fn report_failure(&self, message: &str) {
        self.count.set(self.count.get().saturating_add(1));
        if let Ok(mut messages) = self.messages.try_borrow_mut()
            && messages.len() < self.max_messages
        {
            messages.push(message.to_string());
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
