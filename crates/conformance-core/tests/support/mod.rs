// conformance-core/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Scripted execution sink and manifest builders for harness tests.
// Purpose: Drive the runtime without a real language engine.
// Dependencies: conformance-core
// ============================================================================

//! ## Overview
//! [`ScriptedSink`] interprets one directive per source line:
//! - `pass` or blank: no effect;
//! - `report <message>`: calls the failure hook;
//! - `throw <Kind>: <message>`: raises;
//! - `engine <message>`: reports an engine failure;
//! - `panic <message>`: panics inside the sink.

#![allow(dead_code, reason = "Each test binary uses a different subset of helpers.")]

use conformance_core::ExecutionError;
use conformance_core::ExecutionSink;
use conformance_core::FailureHook;
use conformance_core::TestCase;
use conformance_core::TestManifest;
use conformance_core::encode_payload;

/// Directive-driven execution sink.
#[derive(Debug, Default)]
pub struct ScriptedSink {
    /// Sources executed, in order.
    pub executed: Vec<String>,
}

impl ExecutionSink for ScriptedSink {
    fn execute(&mut self, source: &str, hook: &dyn FailureHook) -> Result<(), ExecutionError> {
        self.executed.push(source.to_string());
        for line in source.lines() {
            let line = line.trim();
            if let Some(message) = line.strip_prefix("report ") {
                hook.report_failure(message);
            } else if let Some(rest) = line.strip_prefix("throw ") {
                let (kind, message) = rest.split_once(": ").unwrap_or((rest, ""));
                return Err(ExecutionError::Thrown {
                    kind: kind.to_string(),
                    message: message.to_string(),
                });
            } else if let Some(message) = line.strip_prefix("engine ") {
                return Err(ExecutionError::Engine(message.to_string()));
            } else if let Some(message) = line.strip_prefix("panic ") {
                panic!("{message}");
            }
        }
        Ok(())
    }
}

/// Builds a case whose payload encodes `source`.
pub fn case(path: &str, source: &str) -> TestCase {
    TestCase {
        path: path.to_string(),
        code: encode_payload(source),
        negative: None,
    }
}

/// Builds a case with a raw (possibly malformed) payload.
pub fn raw_case(path: &str, code: &str) -> TestCase {
    TestCase {
        path: path.to_string(),
        code: code.to_string(),
        negative: None,
    }
}

/// Builds the three-case manifest: one pass, one hook call, one throw.
pub fn mixed_manifest() -> TestManifest {
    TestManifest::new(
        "mixed",
        vec![
            case("A.js", "pass"),
            case("B.js", "report #1: expected true"),
            case("C.js", "throw TypeError: x is not a function"),
        ],
    )
}

/// Builds the JSON manifest document text for `name` and `cases`.
pub fn manifest_json(name: &str, cases: &[TestCase]) -> String {
    let manifest = TestManifest::new(name, cases.to_vec());
    serde_json::to_string(&manifest.to_document()).unwrap_or_default()
}
