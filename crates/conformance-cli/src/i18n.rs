// conformance-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalog and translation utilities for the CLI.
// Purpose: Centralize user-facing strings for future localization support.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! The conformance CLI stores user-facing strings in a small translation
//! catalog to enforce consistent messaging and to prepare for future locales.
//! All runtime output should be routed through the [`t!`](crate::t) macro.
//! Harness progress lines and the run summary are produced by the runtime
//! and are not part of this catalog.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to the key itself to avoid panics.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static catalog entries loaded into the localized message bundle.
const CATALOG_ITEMS: &[(&str, &str)] = &[
    ("main.version", "conformance {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config valid."),
    ("run.no_manifests", "No manifests to run; set run.manifests or pass --manifest."),
    ("run.engine.missing_command", "engine.command is required to run cases."),
    ("run.engine.prelude_failed", "Failed to load engine prelude: {error}"),
    ("run.engine.invalid", "Invalid engine settings: {error}"),
    ("run.audit.open_failed", "Failed to open audit log at {path}: {error}"),
    ("run.aborted", "Run aborted: {error}"),
    ("run.report.serialize_failed", "Failed to serialize run report: {error}"),
    ("run.strict.failed", "{count} of {total} cases did not pass."),
    ("amalgamate.missing_section", "Config has no [amalgamate] section."),
    ("amalgamate.failed", "Amalgamation failed: {error}"),
    ("amalgamate.ok", "Amalgamated {files} files into {path}"),
    ("bundle.missing_section", "Config has no [bundle] section."),
    ("bundle.failed", "Bundle generation failed: {error}"),
    ("bundle.ok", "Bundled {files} test files into {path}"),
    ("manifest.pack.failed", "Manifest packing failed: {error}"),
    ("manifest.pack.ok", "Packed {cases} cases into {path}"),
];

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the English catalog while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = lookup(key).unwrap_or(key);
    args.into_iter().fold(template.to_string(), |message, arg| {
        message.replace(&format!("{{{}}}", arg.key), &arg.value)
    })
}

/// Returns the catalog template for `key`, when present.
#[must_use]
pub fn lookup(key: &str) -> Option<&'static str> {
    static CATALOG: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

    CATALOG.get_or_init(|| CATALOG_ITEMS.iter().copied().collect()).get(key).copied()
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
///
/// # Returns
///
/// A localized [`String`] with placeholders substituted.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
