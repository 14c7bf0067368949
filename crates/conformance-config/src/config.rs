// conformance-config/src/config.rs
// ============================================================================
// Module: Conformance Configuration
// Description: Configuration loading and validation for harness runs.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: conformance-core, conformance-engine, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Relative paths inside the file are resolved against the directory that
//! holds it, so a config can be run from any working directory.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use conformance_core::HarnessOptions;
use conformance_core::runtime::DEFAULT_MAX_MESSAGES;
use conformance_engine::DEFAULT_FAILURE_MARKER;
use conformance_engine::ScriptMode;
use conformance_engine::validate_marker;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "conformance.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "CONFORMANCE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of manifests in one run.
pub(crate) const MAX_MANIFESTS: usize = 4096;
/// Maximum failure messages retained per case.
pub(crate) const MAX_MESSAGES_PER_CASE: usize = 1024;
/// Maximum number of engine command arguments.
pub(crate) const MAX_COMMAND_ARGS: usize = 64;

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Root configuration document.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HarnessConfig {
    /// Run selection and presentation.
    #[serde(default)]
    pub run: RunConfig,
    /// Engine under test.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Structured audit logging.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Optional amalgamation build step.
    #[serde(default)]
    pub amalgamate: Option<AmalgamateConfig>,
    /// Optional test bundle generation.
    #[serde(default)]
    pub bundle: Option<BundleConfig>,
    /// Directory relative paths resolve against (not serialized).
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl HarnessConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", resolved.display())))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config = Self::from_toml_str(content)?;
        config.base_dir = resolved.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    /// Parses and validates configuration text; relative paths stay relative.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.run.validate()?;
        self.engine.validate()?;
        self.audit.validate()?;
        if let Some(amalgamate) = &self.amalgamate {
            amalgamate.validate()?;
        }
        if let Some(bundle) = &self.bundle {
            bundle.validate()?;
        }
        Ok(())
    }

    /// Resolves a configured path against the config file's directory.
    #[must_use]
    pub fn resolve(&self, value: &str) -> PathBuf {
        let path = Path::new(value);
        if path.is_absolute() { path.to_path_buf() } else { self.base_dir.join(path) }
    }

    /// Returns the configured manifest paths, resolved, in run order.
    #[must_use]
    pub fn manifest_paths(&self) -> Vec<PathBuf> {
        self.run.manifests.iter().map(|manifest| self.resolve(manifest)).collect()
    }

    /// Returns the resolved prelude path, when configured.
    #[must_use]
    pub fn prelude_path(&self) -> Option<PathBuf> {
        self.engine.prelude_path.as_deref().map(|path| self.resolve(path))
    }

    /// Returns the resolved audit log path, when configured.
    #[must_use]
    pub fn audit_path(&self) -> Option<PathBuf> {
        self.audit.path.as_deref().map(|path| self.resolve(path))
    }
}

/// Run selection and presentation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunConfig {
    /// Manifest paths in run order.
    #[serde(default)]
    pub manifests: Vec<String>,
    /// Case paths excluded from every manifest.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Print one line per exception case.
    #[serde(default)]
    pub echo_exceptions: bool,
    /// Failure messages retained per case.
    #[serde(default = "default_max_messages_per_case")]
    pub max_messages_per_case: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            manifests: Vec::new(),
            exclude: Vec::new(),
            echo_exceptions: false,
            max_messages_per_case: default_max_messages_per_case(),
        }
    }
}

impl RunConfig {
    /// Validates run configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.manifests.len() > MAX_MANIFESTS {
            return Err(ConfigError::Invalid(format!(
                "run.manifests exceeds {MAX_MANIFESTS} entries"
            )));
        }
        for manifest in &self.manifests {
            validate_path_string("run.manifests", manifest)?;
        }
        if self.exclude.iter().any(|path| path.trim().is_empty()) {
            return Err(ConfigError::Invalid("run.exclude entries must be non-empty".to_string()));
        }
        if self.max_messages_per_case > MAX_MESSAGES_PER_CASE {
            return Err(ConfigError::Invalid(format!(
                "run.max_messages_per_case must be at most {MAX_MESSAGES_PER_CASE}"
            )));
        }
        Ok(())
    }

    /// Returns the exclusion set.
    #[must_use]
    pub fn exclusions(&self) -> BTreeSet<String> {
        self.exclude.iter().cloned().collect()
    }

    /// Returns the runtime options these settings describe.
    #[must_use]
    pub const fn harness_options(&self) -> HarnessOptions {
        HarnessOptions {
            echo_exceptions: self.echo_exceptions,
            max_messages_per_case: self.max_messages_per_case,
        }
    }
}

/// Engine-under-test settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Program followed by its arguments.
    #[serde(default)]
    pub command: Vec<String>,
    /// Script delivery mode.
    #[serde(default)]
    pub script_mode: ScriptMode,
    /// Optional prelude file replacing the default prelude.
    #[serde(default)]
    pub prelude_path: Option<String>,
    /// Marker identifying failure lines on engine stdout.
    #[serde(default = "default_failure_marker")]
    pub failure_marker: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            script_mode: ScriptMode::default(),
            prelude_path: None,
            failure_marker: default_failure_marker(),
        }
    }
}

impl EngineConfig {
    /// Validates engine configuration.
    ///
    /// An empty command is accepted here; commands that run cases require one.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.command.len() > MAX_COMMAND_ARGS {
            return Err(ConfigError::Invalid(format!(
                "engine.command exceeds {MAX_COMMAND_ARGS} entries"
            )));
        }
        if let Some(program) = self.command.first()
            && program.trim().is_empty()
        {
            return Err(ConfigError::Invalid("engine.command program must be non-empty".to_string()));
        }
        if let Some(path) = &self.prelude_path {
            validate_path_string("engine.prelude_path", path)?;
        }
        if !validate_marker(&self.failure_marker) {
            return Err(ConfigError::Invalid(
                "engine.failure_marker must be 1-64 characters of [A-Za-z0-9_$-]".to_string(),
            ));
        }
        Ok(())
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditMode {
    /// No audit events.
    #[default]
    None,
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to `audit.path`.
    File,
}

/// Structured audit logging settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuditConfig {
    /// Audit sink selection.
    #[serde(default)]
    pub mode: AuditMode,
    /// Audit log path for file mode.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (&self.mode, &self.path) {
            (AuditMode::File, None) => {
                Err(ConfigError::Invalid("audit.path is required when audit.mode = \"file\"".to_string()))
            }
            (_, Some(path)) => validate_path_string("audit.path", path),
            (_, None) => Ok(()),
        }
    }
}

/// One regex rewrite applied to every amalgamated file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RewriteRule {
    /// Regular expression to match.
    pub pattern: String,
    /// Replacement text; `$1` style group references are expanded.
    pub replacement: String,
}

/// Amalgamation build step settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AmalgamateConfig {
    /// Directory the listed files are relative to.
    #[serde(default = "default_base_dir")]
    pub base_dir: String,
    /// Output file.
    pub output: String,
    /// Files concatenated in order.
    pub files: Vec<String>,
    /// Header names whose local include lines are removed.
    #[serde(default)]
    pub strip_includes: Vec<String>,
    /// Rewrites applied before include stripping.
    #[serde(default)]
    pub rewrites: Vec<RewriteRule>,
}

impl AmalgamateConfig {
    /// Validates amalgamation configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("amalgamate.base_dir", &self.base_dir)?;
        validate_path_string("amalgamate.output", &self.output)?;
        if self.files.is_empty() {
            return Err(ConfigError::Invalid("amalgamate.files must be non-empty".to_string()));
        }
        for file in &self.files {
            validate_path_string("amalgamate.files", file)?;
        }
        if self.strip_includes.iter().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "amalgamate.strip_includes entries must be non-empty".to_string(),
            ));
        }
        if self.rewrites.iter().any(|rule| rule.pattern.is_empty()) {
            return Err(ConfigError::Invalid(
                "amalgamate.rewrites patterns must be non-empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// One suite inside a generated test bundle.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BundleSuiteConfig {
    /// Suite name printed by the bundle.
    pub name: String,
    /// Directory the suite files are relative to.
    pub dir: String,
    /// Test files in order.
    pub files: Vec<String>,
}

/// Test bundle generation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BundleConfig {
    /// Output file.
    pub output: String,
    /// Optional header file replacing the default bundle header.
    #[serde(default)]
    pub header_path: Option<String>,
    /// Suites in order.
    #[serde(default)]
    pub suites: Vec<BundleSuiteConfig>,
}

impl BundleConfig {
    /// Validates bundle configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("bundle.output", &self.output)?;
        if let Some(path) = &self.header_path {
            validate_path_string("bundle.header_path", path)?;
        }
        for suite in &self.suites {
            if suite.name.trim().is_empty() {
                return Err(ConfigError::Invalid("bundle.suites.name must be non-empty".to_string()));
            }
            validate_path_string("bundle.suites.dir", &suite.dir)?;
            for file in &suite.files {
                validate_path_string("bundle.suites.files", file)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} component too long")));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default retained failure messages per case.
const fn default_max_messages_per_case() -> usize {
    DEFAULT_MAX_MESSAGES
}

/// Default failure marker.
fn default_failure_marker() -> String {
    DEFAULT_FAILURE_MARKER.to_string()
}

/// Default amalgamation base directory.
fn default_base_dir() -> String {
    ".".to_string()
}
