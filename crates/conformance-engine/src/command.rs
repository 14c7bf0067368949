// conformance-engine/src/command.rs
// ============================================================================
// Module: Command Engine
// Description: Runs each case in a fresh engine process.
// Purpose: Implement the execution sink over an external interpreter.
// Dependencies: conformance-core, serde, tempfile
// ============================================================================

//! ## Overview
//! For every case the engine command is started, given the prelude followed
//! by the decoded source, and awaited to completion:
//! - every stdout line beginning with the failure marker calls the failure
//!   hook once, with the remainder of the line as the message;
//! - a non-zero exit status means the source raised, described by the last
//!   `Kind: message` line the engine wrote to stderr;
//! - failure to start or talk to the process is an engine failure.
//!
//! A fresh process per case means no global state leaks between cases.
//! There is no timeout: a case that never terminates stalls the run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::process::Output;
use std::process::Stdio;
use std::thread;

use conformance_core::ExecutionError;
use conformance_core::ExecutionSink;
use conformance_core::FailureHook;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::prelude::DEFAULT_FAILURE_MARKER;
use crate::prelude::default_prelude;
use crate::prelude::validate_marker;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum prelude file size in bytes.
const MAX_PRELUDE_BYTES: u64 = 1024 * 1024;
/// Maximum characters of stderr kept in an exception message.
const MAX_STDERR_TAIL_CHARS: usize = 512;
/// Kind reported when the engine exits non-zero without a recognizable error line.
const FALLBACK_ERROR_KIND: &str = "Error";

// ============================================================================
// SECTION: Types
// ============================================================================

/// How the script reaches the engine process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptMode {
    /// Script is written to the process's stdin.
    #[default]
    Stdin,
    /// Script is written to a temporary file whose path is appended to the command.
    File,
}

/// Engine construction errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine command has no program.
    #[error("engine command is empty")]
    EmptyCommand,
    /// The failure marker cannot be embedded safely.
    #[error("invalid failure marker: {0}")]
    InvalidMarker(String),
    /// The prelude file could not be read.
    #[error("failed to read prelude {path}: {error}")]
    Prelude {
        /// Prelude path.
        path: String,
        /// Underlying error message.
        error: String,
    },
}

/// Inputs for building a [`CommandEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Program followed by its arguments.
    pub command: Vec<String>,
    /// Script delivery mode.
    pub script_mode: ScriptMode,
    /// Prelude text; the default prelude is rendered when absent.
    pub prelude: Option<String>,
    /// Marker identifying failure lines on stdout.
    pub failure_marker: String,
}

impl EngineSettings {
    /// Creates settings for `command` with defaults for everything else.
    #[must_use]
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            script_mode: ScriptMode::default(),
            prelude: None,
            failure_marker: DEFAULT_FAILURE_MARKER.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Command Engine
// ============================================================================

/// Execution sink backed by an external engine process.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    /// Program to start.
    program: String,
    /// Arguments passed before the script path (file mode).
    args: Vec<String>,
    /// Script delivery mode.
    script_mode: ScriptMode,
    /// Prelude prepended to every case.
    prelude: String,
    /// Failure line marker.
    marker: String,
}

impl CommandEngine {
    /// Builds an engine from settings.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the command is empty or the marker is invalid.
    pub fn new(settings: EngineSettings) -> Result<Self, EngineError> {
        let (program, args) =
            settings.command.split_first().ok_or(EngineError::EmptyCommand)?;
        if program.trim().is_empty() {
            return Err(EngineError::EmptyCommand);
        }
        if !validate_marker(&settings.failure_marker) {
            return Err(EngineError::InvalidMarker(settings.failure_marker));
        }
        let prelude =
            settings.prelude.unwrap_or_else(|| default_prelude(&settings.failure_marker));
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            script_mode: settings.script_mode,
            prelude,
            marker: settings.failure_marker,
        })
    }

    /// Reads a prelude file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Prelude`] when the file is missing, too large, or not UTF-8.
    pub fn load_prelude(path: &Path) -> Result<String, EngineError> {
        let prelude_error = |error: String| EngineError::Prelude {
            path: path.display().to_string(),
            error,
        };
        let size = fs::metadata(path).map_err(|err| prelude_error(err.to_string()))?.len();
        if size > MAX_PRELUDE_BYTES {
            return Err(prelude_error(format!("file exceeds {MAX_PRELUDE_BYTES} bytes")));
        }
        let bytes = fs::read(path).map_err(|err| prelude_error(err.to_string()))?;
        String::from_utf8(bytes).map_err(|_| prelude_error("file must be utf-8".to_string()))
    }

    /// Returns the failure marker.
    #[must_use]
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Returns the prelude prepended to every case.
    #[must_use]
    pub fn prelude(&self) -> &str {
        &self.prelude
    }

    /// Runs the script with stdin delivery.
    fn run_stdin(&self, script: String) -> Result<Output, ExecutionError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| spawn_error(&self.program, &err))?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ExecutionError::Engine("engine stdin unavailable".to_string()))?;
        // The engine may exit before reading everything, so a broken pipe is not an error here.
        let writer = thread::spawn(move || {
            let _ = stdin.write_all(script.as_bytes());
        });
        let output = child
            .wait_with_output()
            .map_err(|err| ExecutionError::Engine(format!("failed to wait for engine: {err}")))?;
        writer
            .join()
            .map_err(|_| ExecutionError::Engine("engine stdin writer panicked".to_string()))?;
        Ok(output)
    }

    /// Runs the script with temporary file delivery.
    fn run_file(&self, script: &str) -> Result<Output, ExecutionError> {
        let mut file = tempfile::Builder::new()
            .prefix("conformance-case-")
            .suffix(".js")
            .tempfile()
            .map_err(|err| ExecutionError::Engine(format!("failed to create script file: {err}")))?;
        file.write_all(script.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|err| ExecutionError::Engine(format!("failed to write script file: {err}")))?;
        Command::new(&self.program)
            .args(&self.args)
            .arg(file.path())
            .stdin(Stdio::null())
            .output()
            .map_err(|err| spawn_error(&self.program, &err))
    }
}

impl ExecutionSink for CommandEngine {
    fn execute(&mut self, source: &str, hook: &dyn FailureHook) -> Result<(), ExecutionError> {
        let script = format!("{}\n{source}", self.prelude);
        let output = match self.script_mode {
            ScriptMode::Stdin => self.run_stdin(script)?,
            ScriptMode::File => self.run_file(&script)?,
        };
        let stdout = String::from_utf8_lossy(&output.stdout);
        for line in stdout.lines() {
            if let Some(message) = failure_message(line, &self.marker) {
                hook.report_failure(message);
            }
        }
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(thrown_error(&stderr, &output.status.to_string()))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps a spawn failure to an engine error.
fn spawn_error(program: &str, err: &std::io::Error) -> ExecutionError {
    ExecutionError::Engine(format!("failed to start engine {program}: {err}"))
}

/// Returns the failure message when `line` is a marker line.
fn failure_message<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let rest = line.trim_end_matches('\r').strip_prefix(marker)?;
    if rest.is_empty() {
        return Some(rest);
    }
    rest.strip_prefix(' ')
}

/// Builds the thrown error for a non-zero exit from engine stderr.
///
/// The last `Kind: message` line wins, so trailing stack frames and version
/// banners do not hide the error. Without one, the last non-empty line is kept
/// whole.
fn thrown_error(stderr: &str, status: &str) -> ExecutionError {
    let lines: Vec<&str> = stderr.lines().map(str::trim).filter(|line| !line.is_empty()).collect();
    if let Some((kind, message)) = lines.iter().rev().copied().find_map(split_error_line) {
        return ExecutionError::Thrown {
            kind: kind.to_string(),
            message: truncate_tail(message),
        };
    }
    let Some(tail) = lines.last() else {
        return ExecutionError::Thrown {
            kind: FALLBACK_ERROR_KIND.to_string(),
            message: format!("engine exited with {status}"),
        };
    };
    ExecutionError::Thrown {
        kind: FALLBACK_ERROR_KIND.to_string(),
        message: truncate_tail(tail),
    }
}

/// Splits `Kind: message` when `Kind` names an error constructor.
fn split_error_line(line: &str) -> Option<(&str, &str)> {
    let (kind, message) = line.split_once(": ")?;
    is_error_kind(kind).then_some((kind, message))
}

/// Caps a stderr excerpt at [`MAX_STDERR_TAIL_CHARS`] characters.
fn truncate_tail(text: &str) -> String {
    text.chars().take(MAX_STDERR_TAIL_CHARS).collect()
}

/// Returns true when `word` looks like an error constructor name.
fn is_error_kind(word: &str) -> bool {
    word.ends_with("Error")
        && word.bytes().all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'$'))
}
