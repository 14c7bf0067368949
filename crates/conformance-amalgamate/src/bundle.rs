// conformance-amalgamate/src/bundle.rs
// ============================================================================
// Module: Test Bundle Generator
// Description: Concatenates loose test files into one self-counting script.
// Purpose: Run a whole suite in a single engine invocation.
// Dependencies: conformance-config
// ============================================================================

//! ## Overview
//! A bundle is the header followed by one block per suite. Each test file is
//! wrapped so the script itself counts cases, passes, reported failures, and
//! exceptions, then prints a per-suite summary. The header defines `$ERROR`
//! to print the message and bump the failure counter.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use conformance_config::BundleConfig;
use thiserror::Error;

// ============================================================================
// SECTION: Templates
// ============================================================================

/// Default bundle header.
pub const DEFAULT_BUNDLE_HEADER: &str = r#"// Generated conformance test bundle

if (typeof console === "object") {
	print = console.log;
}

var $ERROR = function(msg) {
	print(msg);
	numFailedTests++;
};

function runTestCase(testcase) {
	if (testcase() !== true) {
		$ERROR('Test case returned non-true value!');
	}
}
/*						*/

"#;

/// Counter initialisation emitted at the start of every suite.
const SUITE_INIT: &str = "var currFailed = 0, numTotalCases = 0, numFailedTests = 0, numExceptions = 0, numPassed = 0;\n\n";
/// Line emitted before each test file.
const CASE_PREFIX: &str = "currFailed = numFailedTests + 1; currFailed--; numTotalCases++;\n";
/// Line emitted after each test file.
const CASE_SUFFIX: &str = "if(currFailed == numFailedTests) numPassed++;\n\n";
/// Summary emitted at the end of every suite.
const SUITE_FOOTER: &str = "/*\t\t\t\t\t\t*/\n\nprint('\\nTotal tests: ' + numTotalCases);\nprint('passed tests: ' + numPassed);\nprint('failed tests: ' + (numTotalCases-numPassed));\nprint('\\nfailed cases: ' + numFailedTests);\nprint('exceptions: ' + numExceptions);\n\n/*\t\t\t\t\t\t*/\n\n";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Bundle generation errors.
#[derive(Debug, Error)]
pub enum BundleError {
    /// A test, header, or output file could not be accessed.
    #[error("bundle io error at {path}: {error}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error message.
        error: String,
    },
}

/// One suite of test files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleSuite {
    /// Suite name printed by the bundle.
    pub name: String,
    /// Directory the files are relative to.
    pub dir: PathBuf,
    /// Test files in order.
    pub files: Vec<String>,
}

impl BundleSuite {
    /// Builds suites from a `[bundle]` section, resolving directories with `resolve`.
    #[must_use]
    pub fn from_config(config: &BundleConfig, resolve: impl Fn(&str) -> PathBuf) -> Vec<Self> {
        config
            .suites
            .iter()
            .map(|suite| Self {
                name: suite.name.clone(),
                dir: resolve(&suite.dir),
                files: suite.files.clone(),
            })
            .collect()
    }
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders the bundle text for `suites` under `header`.
///
/// # Errors
///
/// Returns [`BundleError::Io`] when a test file cannot be read as UTF-8 text.
pub fn render_bundle(header: &str, suites: &[BundleSuite]) -> Result<String, BundleError> {
    let mut output = String::from(header);
    for suite in suites {
        output.push_str(&format!("print('\\n{}');\n", escape_single_quoted(&suite.name)));
        output.push_str(SUITE_INIT);
        for file in &suite.files {
            let path = suite.dir.join(file);
            let text = read_text(&path)?;
            output.push_str(CASE_PREFIX);
            output.push_str(&text);
            if !text.ends_with('\n') {
                output.push('\n');
            }
            output.push_str(CASE_SUFFIX);
        }
        output.push_str(SUITE_FOOTER);
    }
    Ok(output)
}

/// Reads a bundle header file.
///
/// # Errors
///
/// Returns [`BundleError::Io`] when the file cannot be read as UTF-8 text.
pub fn read_header(path: &Path) -> Result<String, BundleError> {
    read_text(path)
}

/// Writes bundle text to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`BundleError::Io`] when the file cannot be written.
pub fn write_bundle(path: &Path, contents: &str) -> Result<(), BundleError> {
    fs::write(path, contents).map_err(|err| io_error(path, &err))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a UTF-8 text file.
fn read_text(path: &Path) -> Result<String, BundleError> {
    fs::read_to_string(path).map_err(|err| io_error(path, &err))
}

/// Maps an IO error for `path`.
fn io_error(path: &Path, err: &std::io::Error) -> BundleError {
    BundleError::Io {
        path: path.display().to_string(),
        error: err.to_string(),
    }
}

/// Escapes text for a single-quoted script string literal.
fn escape_single_quoted(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    escaped
}
