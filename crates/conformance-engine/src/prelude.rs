// conformance-engine/src/prelude.rs
// ============================================================================
// Module: Harness Prelude
// Description: Script prepended to every case before it reaches the engine.
// Purpose: Install the failure hook and helpers that test sources expect.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Test sources report soft failures through `$ERROR(msg)` and wrap
//! function-style cases in `runTestCase(fn)`. The default prelude defines
//! both so that every reported failure becomes one stdout line starting with
//! the failure marker. Markers are restricted to identifier-like characters
//! so they embed safely inside a string literal.

/// Marker printed at the start of every failure line.
pub const DEFAULT_FAILURE_MARKER: &str = "__CONFORMANCE_FAILURE__";

/// Longest accepted failure marker.
const MAX_MARKER_LENGTH: usize = 64;

/// Returns true when `marker` is non-empty, short, and identifier-like.
#[must_use]
pub fn validate_marker(marker: &str) -> bool {
    !marker.is_empty()
        && marker.len() <= MAX_MARKER_LENGTH
        && marker.bytes().all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'$' | b'-'))
}

/// Renders the default prelude for `marker`.
#[must_use]
pub fn default_prelude(marker: &str) -> String {
    format!(
        r#"if (typeof print === "undefined" && typeof console === "object") {{
	print = console.log;
}}

var $ERROR = function(msg) {{
	print("{marker} " + msg);
}};

function runTestCase(testcase) {{
	if (testcase() !== true) {{
		$ERROR('Test case returned non-true value!');
	}}
}}
"#
    )
}
