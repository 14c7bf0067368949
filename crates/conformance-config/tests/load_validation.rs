//! Config load validation tests for conformance-config.
// crates/conformance-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;

use conformance_config::ConfigError;
use conformance_config::HarnessConfig;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<HarnessConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    assert_invalid(HarnessConfig::load(Some(path)), "config path exceeds max length")?;
    Ok(())
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    assert_invalid(HarnessConfig::load(Some(path)), "config path component too long")?;
    Ok(())
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'a'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(HarnessConfig::load(Some(file.path())), "config file exceeds size limit")?;
    Ok(())
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(HarnessConfig::load(Some(file.path())), "config file must be utf-8")?;
    Ok(())
}

#[test]
fn load_reports_missing_file_as_io() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    assert_invalid(HarnessConfig::load(Some(&path)), "config io error")?;
    Ok(())
}

#[test]
fn load_rejects_malformed_toml() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"[run\nmanifests = ").map_err(|err| err.to_string())?;
    assert_invalid(HarnessConfig::load(Some(file.path())), "config parse error")?;
    Ok(())
}

#[test]
fn load_resolves_relative_paths_against_config_dir() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("conformance.toml");
    std::fs::write(
        &path,
        "[run]\nmanifests = [\"suites/a.json\", \"/abs/b.json\"]\n\n[engine]\nprelude_path = \"prelude.js\"\n",
    )
    .map_err(|err| err.to_string())?;
    let config = HarnessConfig::load(Some(&path)).map_err(|err| err.to_string())?;
    let manifests = config.manifest_paths();
    if manifests != vec![dir.path().join("suites/a.json"), Path::new("/abs/b.json").to_path_buf()] {
        return Err("manifest paths not resolved against config dir".to_string());
    }
    if config.prelude_path() != Some(dir.path().join("prelude.js")) {
        return Err("prelude path not resolved against config dir".to_string());
    }
    Ok(())
}
