// conformance-core/src/core/outcome.rs
// ============================================================================
// Module: Outcomes and Tallies
// Description: Per-case outcome classification and suite/run accounting.
// Purpose: Fold case outcomes into counters that always balance.
// Dependencies: serde, crate::core::hashing
// ============================================================================

//! ## Overview
//! Every case ends in exactly one of three outcomes: it passed, it ran to
//! completion but reported soft assertion failures, or it raised. Tallies
//! count cases per outcome bucket, so a case that reports many assertion
//! failures still contributes one to `failed_assertions`.
//!
//! ## Invariants
//! - `total_cases == passed_cases + failed_assertions + exceptions`.
//! - `reported_failures` counts raw hook calls and sits outside the buckets.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::hashing::HashDigest;

// ============================================================================
// SECTION: Case Outcomes
// ============================================================================

/// Source of an exception outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExceptionKind {
    /// The payload could not be decoded.
    Decode,
    /// The executed source raised an error.
    Thrown,
    /// The engine itself failed to run the source.
    Engine,
    /// The execution sink panicked.
    Panic,
}

impl ExceptionKind {
    /// Returns a stable label for the exception kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Decode => "decode",
            Self::Thrown => "thrown",
            Self::Engine => "engine",
            Self::Panic => "panic",
        }
    }
}

impl fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified result of running one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CaseOutcome {
    /// The case completed without reporting failures.
    Passed,
    /// The case completed but reported one or more assertion failures.
    AssertionFailed {
        /// Number of failures reported through the hook.
        reported: u64,
        /// Retained failure messages.
        messages: Vec<String>,
    },
    /// The case raised before completing.
    Exception {
        /// Where the exception came from.
        kind: ExceptionKind,
        /// Exception description.
        message: String,
        /// Failures reported through the hook before the exception.
        reported: u64,
    },
}

impl CaseOutcome {
    /// Returns a stable label for the outcome bucket.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::AssertionFailed {
                ..
            } => "assertion_failed",
            Self::Exception {
                ..
            } => "exception",
        }
    }

    /// Returns the number of hook calls observed while running the case.
    #[must_use]
    pub const fn reported(&self) -> u64 {
        match self {
            Self::Passed => 0,
            Self::AssertionFailed {
                reported, ..
            }
            | Self::Exception {
                reported, ..
            } => *reported,
        }
    }

    /// Returns true when the case passed.
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Outcome of one case, keyed by its manifest path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Case path from the manifest.
    pub path: String,
    /// Classified outcome.
    #[serde(flatten)]
    pub outcome: CaseOutcome,
}

// ============================================================================
// SECTION: Tallies
// ============================================================================

/// Outcome counters for a suite or a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTally {
    /// Cases attempted.
    pub total_cases: u64,
    /// Cases that passed.
    pub passed_cases: u64,
    /// Cases that completed with at least one assertion failure.
    pub failed_assertions: u64,
    /// Cases that raised.
    pub exceptions: u64,
    /// Raw hook calls across all cases, including cases that later raised.
    pub reported_failures: u64,
}

impl RunTally {
    /// Folds one case outcome into the tally.
    pub const fn record(&mut self, outcome: &CaseOutcome) {
        self.total_cases += 1;
        self.reported_failures += outcome.reported();
        match outcome {
            CaseOutcome::Passed => self.passed_cases += 1,
            CaseOutcome::AssertionFailed {
                ..
            } => self.failed_assertions += 1,
            CaseOutcome::Exception {
                ..
            } => self.exceptions += 1,
        }
    }

    /// Adds another tally into this one.
    pub const fn absorb(&mut self, other: &Self) {
        self.total_cases += other.total_cases;
        self.passed_cases += other.passed_cases;
        self.failed_assertions += other.failed_assertions;
        self.exceptions += other.exceptions;
        self.reported_failures += other.reported_failures;
    }

    /// Returns the number of cases that did not pass.
    #[must_use]
    pub const fn non_passed(&self) -> u64 {
        self.failed_assertions + self.exceptions
    }

    /// Returns true when every case lands in exactly one bucket.
    #[must_use]
    pub const fn is_balanced(&self) -> bool {
        self.total_cases == self.passed_cases + self.failed_assertions + self.exceptions
    }
}

// ============================================================================
// SECTION: Reports
// ============================================================================

/// Result of running one suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Suite name.
    pub name: String,
    /// Digest of the manifest the suite was loaded from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<HashDigest>,
    /// Suite tally.
    pub tally: RunTally,
    /// Per-case outcomes in manifest order.
    pub cases: Vec<CaseRecord>,
}

/// Result of running every suite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Run-level tally summed over suites.
    pub tally: RunTally,
    /// Suite reports in run order.
    pub suites: Vec<SuiteReport>,
}
