// conformance-core/src/runtime/report.rs
// ============================================================================
// Module: Report Output Sinks
// Description: Line-oriented report writers and summary formatting.
// Purpose: Route progress and summary text to a writer or an in-memory buffer.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Report output is plain text for people, never parsed by the harness. Write
//! failures are ignored so a closed terminal cannot abort a run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;

use crate::core::RunTally;
use crate::interfaces::ReportOutput;

// ============================================================================
// SECTION: Formatting
// ============================================================================

/// Formats the final run summary line.
#[must_use]
pub fn format_summary(tally: &RunTally) -> String {
    format!(
        "Total cases: {}, passed: {}, failed cases: {}, exceptions: {}, reported failures: {}",
        tally.total_cases,
        tally.passed_cases,
        tally.failed_assertions,
        tally.exceptions,
        tally.reported_failures
    )
}

// ============================================================================
// SECTION: Writer Report
// ============================================================================

/// Report output backed by any [`Write`] implementation.
#[derive(Debug)]
pub struct WriterReport<W> {
    /// Destination writer.
    writer: W,
}

impl<W: Write> WriterReport<W> {
    /// Wraps a writer.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
        }
    }

    /// Consumes the report and returns the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportOutput for WriterReport<W> {
    fn write_line(&mut self, line: &str) {
        let _ = writeln!(self.writer, "{line}");
        let _ = self.writer.flush();
    }
}

// ============================================================================
// SECTION: Buffered Report
// ============================================================================

/// Report output that keeps lines in memory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BufferedReport {
    /// Lines written so far.
    lines: Vec<String>,
}

impl BufferedReport {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lines written so far.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl ReportOutput for BufferedReport {
    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}
