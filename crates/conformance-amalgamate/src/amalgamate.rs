// conformance-amalgamate/src/amalgamate.rs
// ============================================================================
// Module: Amalgamation
// Description: Concatenates engine source files into one translation unit.
// Purpose: Build the single-file engine the conformance run exercises.
// Dependencies: conformance-config, regex
// ============================================================================

//! ## Overview
//! Each listed file is read in order and transformed before being appended:
//! first every configured rewrite is applied, then local include lines for
//! the configured header names are removed, since their contents are already
//! part of the amalgamated output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use conformance_config::AmalgamateConfig;
use conformance_config::RewriteRule;
use regex::Regex;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Amalgamation errors.
#[derive(Debug, Error)]
pub enum AmalgamateError {
    /// A rewrite pattern is not a valid regular expression.
    #[error("invalid rewrite pattern {pattern}: {error}")]
    Pattern {
        /// Offending pattern.
        pattern: String,
        /// Regex compiler message.
        error: String,
    },
    /// A source or output file could not be accessed.
    #[error("amalgamation io error at {path}: {error}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error message.
        error: String,
    },
}

// ============================================================================
// SECTION: Amalgamator
// ============================================================================

/// Compiled rewrite.
#[derive(Debug, Clone)]
struct Rewrite {
    /// Pattern to replace.
    pattern: Regex,
    /// Replacement text.
    replacement: String,
}

/// Compiled amalgamation transform.
#[derive(Debug, Clone)]
pub struct Amalgamator {
    /// Rewrites in application order.
    rewrites: Vec<Rewrite>,
    /// Local include matcher; absent when no headers are stripped.
    includes: Option<Regex>,
}

impl Amalgamator {
    /// Compiles rewrites and the include matcher.
    ///
    /// # Errors
    ///
    /// Returns [`AmalgamateError::Pattern`] when a rewrite pattern does not compile.
    pub fn new(rules: &[RewriteRule], strip_includes: &[String]) -> Result<Self, AmalgamateError> {
        let rewrites = rules
            .iter()
            .map(|rule| {
                let pattern = Regex::new(&rule.pattern).map_err(|err| AmalgamateError::Pattern {
                    pattern: rule.pattern.clone(),
                    error: err.to_string(),
                })?;
                Ok(Rewrite {
                    pattern,
                    replacement: rule.replacement.clone(),
                })
            })
            .collect::<Result<Vec<_>, AmalgamateError>>()?;
        let includes = if strip_includes.is_empty() {
            None
        } else {
            let names: Vec<String> =
                strip_includes.iter().map(|name| regex::escape(name.trim())).collect();
            let pattern = format!(r#"#include "({})\.h"\r?\n"#, names.join("|"));
            Some(Regex::new(&pattern).map_err(|err| AmalgamateError::Pattern {
                pattern,
                error: err.to_string(),
            })?)
        };
        Ok(Self {
            rewrites,
            includes,
        })
    }

    /// Compiles the transform described by an `[amalgamate]` section.
    ///
    /// # Errors
    ///
    /// Returns [`AmalgamateError::Pattern`] when a rewrite pattern does not compile.
    pub fn from_config(config: &AmalgamateConfig) -> Result<Self, AmalgamateError> {
        Self::new(&config.rewrites, &config.strip_includes)
    }

    /// Transforms one file's text.
    #[must_use]
    pub fn transform(&self, text: &str) -> String {
        let mut output = text.to_string();
        for rewrite in &self.rewrites {
            output = rewrite.pattern.replace_all(&output, rewrite.replacement.as_str()).into_owned();
        }
        if let Some(includes) = &self.includes {
            output = includes.replace_all(&output, "").into_owned();
        }
        output
    }

    /// Reads `files` relative to `base_dir` in order and returns the amalgamated text.
    ///
    /// # Errors
    ///
    /// Returns [`AmalgamateError::Io`] when a file cannot be read as UTF-8 text.
    pub fn amalgamate(&self, base_dir: &Path, files: &[String]) -> Result<String, AmalgamateError> {
        let mut output = String::new();
        for file in files {
            let path = base_dir.join(file);
            let text = fs::read_to_string(&path).map_err(|err| AmalgamateError::Io {
                path: path.display().to_string(),
                error: err.to_string(),
            })?;
            output.push_str(&self.transform(&text));
        }
        Ok(output)
    }
}

/// Writes amalgamated text to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`AmalgamateError::Io`] when the file cannot be written.
pub fn write_amalgamation(path: &Path, contents: &str) -> Result<(), AmalgamateError> {
    fs::write(path, contents).map_err(|err| AmalgamateError::Io {
        path: path.display().to_string(),
        error: err.to_string(),
    })
}
