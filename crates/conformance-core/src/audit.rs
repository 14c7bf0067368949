// conformance-core/src/audit.rs
// ============================================================================
// Module: Harness Audit Logging
// Description: Structured audit events for suite and case execution.
// Purpose: Emit machine-readable run logs without hard dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! This module defines audit event payloads and sinks for harness runs. Events
//! are written as JSON lines so runs can be diffed or routed into any log
//! pipeline. Sinks swallow their own I/O failures: logging never changes a
//! run's outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::CaseOutcome;
use crate::core::ExceptionKind;
use crate::core::HashDigest;
use crate::core::RunTally;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Harness audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarnessAuditEvent {
    /// Unix timestamp in milliseconds when the event was created.
    pub timestamp_ms: u64,
    /// Event details.
    #[serde(flatten)]
    pub kind: HarnessAuditKind,
}

/// Audit event variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HarnessAuditKind {
    /// A suite is about to run.
    SuiteStarted {
        /// Suite name.
        suite: String,
        /// Number of cases in the suite.
        cases: usize,
        /// Manifest digest, when known.
        #[serde(skip_serializing_if = "Option::is_none")]
        digest: Option<HashDigest>,
    },
    /// A case finished running.
    CaseFinished {
        /// Suite name.
        suite: String,
        /// Case path.
        path: String,
        /// Outcome label.
        outcome: &'static str,
        /// Hook calls observed during the case.
        reported: u64,
        /// Exception kind, for exception outcomes.
        #[serde(skip_serializing_if = "Option::is_none")]
        exception: Option<ExceptionKind>,
        /// Exception message or first failure message.
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
    /// A suite finished running.
    SuiteFinished {
        /// Suite name.
        suite: String,
        /// Suite tally.
        tally: RunTally,
    },
    /// The whole run finished.
    RunFinished {
        /// Number of suites run.
        suites: usize,
        /// Run tally.
        tally: RunTally,
    },
}

impl HarnessAuditEvent {
    /// Creates a new audit event stamped with the current time.
    #[must_use]
    pub fn new(kind: HarnessAuditKind) -> Self {
        Self {
            timestamp_ms: now_millis(),
            kind,
        }
    }

    /// Creates a `suite_started` event.
    #[must_use]
    pub fn suite_started(suite: &str, cases: usize, digest: Option<HashDigest>) -> Self {
        Self::new(HarnessAuditKind::SuiteStarted {
            suite: suite.to_string(),
            cases,
            digest,
        })
    }

    /// Creates a `case_finished` event from a classified outcome.
    #[must_use]
    pub fn case_finished(suite: &str, path: &str, outcome: &CaseOutcome) -> Self {
        let (exception, detail) = match outcome {
            CaseOutcome::Passed => (None, None),
            CaseOutcome::AssertionFailed {
                messages, ..
            } => (None, messages.first().cloned()),
            CaseOutcome::Exception {
                kind,
                message,
                ..
            } => (Some(*kind), Some(message.clone())),
        };
        Self::new(HarnessAuditKind::CaseFinished {
            suite: suite.to_string(),
            path: path.to_string(),
            outcome: outcome.label(),
            reported: outcome.reported(),
            exception,
            detail,
        })
    }

    /// Creates a `suite_finished` event.
    #[must_use]
    pub fn suite_finished(suite: &str, tally: RunTally) -> Self {
        Self::new(HarnessAuditKind::SuiteFinished {
            suite: suite.to_string(),
            tally,
        })
    }

    /// Creates a `run_finished` event.
    #[must_use]
    pub fn run_finished(suites: usize, tally: RunTally) -> Self {
        Self::new(HarnessAuditKind::RunFinished {
            suites,
            tally,
        })
    }
}

/// Returns the current unix time in milliseconds, or zero if the clock is unavailable.
fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for harness events.
pub trait HarnessAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &HarnessAuditEvent);
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl HarnessAuditSink for StderrAuditSink {
    fn record(&self, event: &HarnessAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl HarnessAuditSink for FileAuditSink {
    fn record(&self, event: &HarnessAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl HarnessAuditSink for NoopAuditSink {
    fn record(&self, _event: &HarnessAuditEvent) {}
}

/// Audit sink that keeps events in memory, for tests and embedding callers.
#[derive(Default)]
pub struct MemoryAuditSink {
    /// Recorded events in arrival order.
    events: Mutex<Vec<HarnessAuditEvent>>,
}

impl MemoryAuditSink {
    /// Creates an empty in-memory sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<HarnessAuditEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl HarnessAuditSink for MemoryAuditSink {
    fn record(&self, event: &HarnessAuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

impl<T: HarnessAuditSink + ?Sized> HarnessAuditSink for std::sync::Arc<T> {
    fn record(&self, event: &HarnessAuditEvent) {
        (**self).record(event);
    }
}
