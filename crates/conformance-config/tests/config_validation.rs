//! Section validation tests for conformance-config.
// crates/conformance-config/tests/config_validation.rs
// =============================================================================
// Module: Config Section Validation Tests
// Description: Validate defaults and per-section constraints.
// Purpose: Ensure invalid sections fail closed with field-named errors.
// =============================================================================

use conformance_config::AuditMode;
use conformance_config::HarnessConfig;
use conformance_config::config_toml_example;
use conformance_engine::DEFAULT_FAILURE_MARKER;
use conformance_engine::ScriptMode;

type TestResult = Result<(), String>;

fn assert_invalid(content: &str, needle: &str) -> TestResult {
    match HarnessConfig::from_toml_str(content) {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err(format!("expected invalid config for {content}")),
    }
}

#[test]
fn empty_document_uses_defaults() -> TestResult {
    let config = HarnessConfig::from_toml_str("").map_err(|err| err.to_string())?;
    if !config.run.manifests.is_empty() || config.run.echo_exceptions {
        return Err("unexpected run defaults".to_string());
    }
    if config.run.max_messages_per_case != 16 {
        return Err("unexpected message limit default".to_string());
    }
    if config.engine.script_mode != ScriptMode::Stdin
        || config.engine.failure_marker != DEFAULT_FAILURE_MARKER
    {
        return Err("unexpected engine defaults".to_string());
    }
    if config.audit.mode != AuditMode::None || config.amalgamate.is_some() {
        return Err("unexpected optional section defaults".to_string());
    }
    Ok(())
}

#[test]
fn example_config_is_valid() -> TestResult {
    let config = HarnessConfig::from_toml_str(&config_toml_example()).map_err(|err| err.to_string())?;
    let amalgamate = config.amalgamate.ok_or("example missing amalgamate section")?;
    if amalgamate.rewrites.len() != 1 || amalgamate.rewrites[0].replacement != "v7.h" {
        return Err("example rewrite not parsed".to_string());
    }
    let bundle = config.bundle.ok_or("example missing bundle section")?;
    if bundle.suites.len() != 1 || bundle.suites[0].name != "ch.15.5" {
        return Err("example bundle suites not parsed".to_string());
    }
    if config.engine.script_mode != ScriptMode::File {
        return Err("example script mode not parsed".to_string());
    }
    Ok(())
}

#[test]
fn harness_options_follow_run_section() -> TestResult {
    let config = HarnessConfig::from_toml_str("[run]\necho_exceptions = true\nmax_messages_per_case = 2\n")
        .map_err(|err| err.to_string())?;
    let options = config.run.harness_options();
    if !options.echo_exceptions || options.max_messages_per_case != 2 {
        return Err("options did not follow run section".to_string());
    }
    Ok(())
}

#[test]
fn exclusions_deduplicate() -> TestResult {
    let config = HarnessConfig::from_toml_str("[run]\nexclude = [\"a.js\", \"a.js\", \"b.js\"]\n")
        .map_err(|err| err.to_string())?;
    if config.run.exclusions().len() != 2 {
        return Err("exclusion set should deduplicate".to_string());
    }
    Ok(())
}

#[test]
fn rejects_blank_manifest_path() -> TestResult {
    assert_invalid("[run]\nmanifests = [\"  \"]\n", "run.manifests must be non-empty")
}

#[test]
fn rejects_blank_exclusion() -> TestResult {
    assert_invalid("[run]\nexclude = [\"\"]\n", "run.exclude entries must be non-empty")
}

#[test]
fn rejects_excessive_message_limit() -> TestResult {
    assert_invalid("[run]\nmax_messages_per_case = 5000\n", "run.max_messages_per_case")
}

#[test]
fn rejects_blank_engine_program() -> TestResult {
    assert_invalid("[engine]\ncommand = [\"\", \"-e\"]\n", "engine.command program must be non-empty")
}

#[test]
fn rejects_unsafe_failure_marker() -> TestResult {
    assert_invalid("[engine]\nfailure_marker = \"has \\\"quote\"\n", "engine.failure_marker")
}

#[test]
fn rejects_unknown_script_mode() -> TestResult {
    assert_invalid("[engine]\nscript_mode = \"socket\"\n", "config parse error")
}

#[test]
fn file_audit_requires_path() -> TestResult {
    assert_invalid("[audit]\nmode = \"file\"\n", "audit.path is required")
}

#[test]
fn amalgamate_requires_files() -> TestResult {
    assert_invalid("[amalgamate]\noutput = \"out.c\"\nfiles = []\n", "amalgamate.files must be non-empty")
}

#[test]
fn amalgamate_rejects_empty_rewrite_pattern() -> TestResult {
    assert_invalid(
        "[amalgamate]\noutput = \"out.c\"\nfiles = [\"a.c\"]\n\n[[amalgamate.rewrites]]\npattern = \"\"\nreplacement = \"x\"\n",
        "amalgamate.rewrites patterns must be non-empty",
    )
}

#[test]
fn bundle_rejects_blank_suite_name() -> TestResult {
    assert_invalid(
        "[bundle]\noutput = \"bundle.js\"\n\n[[bundle.suites]]\nname = \"\"\ndir = \"t\"\nfiles = []\n",
        "bundle.suites.name must be non-empty",
    )
}
