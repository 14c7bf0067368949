// conformance-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic starting point for new harness setups.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The example covers every section, including the optional amalgamation and
//! bundle steps, and is kept valid by the config test suite.

/// Returns a canonical example `conformance.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[run]
manifests = [
    "manifests/ch15.5.json",
    "manifests/ch15.10.json",
]
exclude = [
    "15.5.1.1_A1_T8.js",
]
echo_exceptions = false
max_messages_per_case = 16

[engine]
command = ["./v7"]
script_mode = "file"
failure_marker = "__CONFORMANCE_FAILURE__"

[audit]
mode = "file"
path = "conformance-audit.jsonl"

[amalgamate]
base_dir = "src"
output = "v7.c"
files = [
    "license.h",
    "utf.h",
    "tokenizer.h",
    "mbuf.h",
    "internal.h",
    "mbuf.c",
    "utf.c",
    "tokenizer.c",
    "string.c",
    "vm.c",
    "main.c",
]
strip_includes = [
    "v7", "license", "utf", "tokenizer", "mbuf", "ast", "parser",
    "internal", "vm", "gc", "slre", "varint", "mm",
]

[[amalgamate.rewrites]]
pattern = '\.\./v7\.h'
replacement = "v7.h"

[bundle]
output = "test_suite/unit_test.js"

[[bundle.suites]]
name = "ch.15.5"
dir = "test_suite/ch15/15.5"
files = [
    "15.5.1.1_A1_T1.js",
    "15.5.1.1_A1_T2.js",
]
"#,
    )
}
