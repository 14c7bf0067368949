// conformance-cli/src/main.rs
// ============================================================================
// Module: Conformance CLI Entry Point
// Description: Command dispatcher for harness runs and build steps.
// Purpose: Provide a localized CLI over the conformance harness crates.
// Dependencies: clap, conformance-amalgamate, conformance-config, conformance-core, conformance-engine
// ============================================================================

//! ## Overview
//! The `conformance` binary wires configuration into the harness runtime:
//! `run` executes manifests against the configured engine, `amalgamate` and
//! `bundle` produce build artifacts, `manifest pack` authors manifests, and
//! `config` validates or prints configuration. User-facing messages are
//! routed through the i18n catalog; harness progress and summary lines come
//! from the runtime's report output.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use conformance_amalgamate::Amalgamator;
use conformance_amalgamate::BundleSuite;
use conformance_amalgamate::DEFAULT_BUNDLE_HEADER;
use conformance_amalgamate::collect_test_files;
use conformance_amalgamate::pack_manifest;
use conformance_amalgamate::read_header;
use conformance_amalgamate::render_bundle;
use conformance_amalgamate::write_amalgamation;
use conformance_amalgamate::write_bundle;
use conformance_amalgamate::write_manifest;
use conformance_cli::t;
use conformance_config::AuditMode;
use conformance_config::HarnessConfig;
use conformance_config::config_toml_example;
use conformance_core::FileAuditSink;
use conformance_core::FileManifestSource;
use conformance_core::HarnessAuditSink;
use conformance_core::NoopAuditSink;
use conformance_core::RunAggregator;
use conformance_core::RunTally;
use conformance_core::StderrAuditSink;
use conformance_core::WriterReport;
use conformance_engine::CommandEngine;
use conformance_engine::EngineSettings;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "conformance", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run manifests against the configured engine.
    Run(RunCommand),
    /// Concatenate engine sources into one file.
    Amalgamate(AmalgamateCommand),
    /// Concatenate loose test files into one self-counting script.
    Bundle(BundleCommand),
    /// Manifest authoring utilities.
    Manifest {
        /// Selected manifest subcommand.
        #[command(subcommand)]
        command: ManifestCommand,
    },
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `run`.
#[derive(Args, Debug)]
struct RunCommand {
    /// Config file path (defaults to `CONFORMANCE_CONFIG` or `conformance.toml`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Manifest to run; repeatable, replaces `run.manifests`.
    #[arg(long = "manifest", value_name = "PATH")]
    manifests: Vec<PathBuf>,
    /// Print the run report as JSON after the summary.
    #[arg(long)]
    json: bool,
    /// Exit with failure when any case did not pass.
    #[arg(long)]
    strict: bool,
}

/// Arguments for `amalgamate`.
#[derive(Args, Debug)]
struct AmalgamateCommand {
    /// Config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Output path overriding `amalgamate.output`.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

/// Arguments for `bundle`.
#[derive(Args, Debug)]
struct BundleCommand {
    /// Config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Output path overriding `bundle.output`.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

/// Manifest subcommands.
#[derive(Subcommand, Debug)]
enum ManifestCommand {
    /// Encode loose test files into a manifest document.
    Pack(ManifestPackCommand),
}

/// Arguments for `manifest pack`.
#[derive(Args, Debug)]
struct ManifestPackCommand {
    /// Suite name stored in the manifest.
    #[arg(long)]
    name: String,
    /// Directory the test files are relative to.
    #[arg(long = "base-dir", value_name = "DIR")]
    base_dir: PathBuf,
    /// Manifest output path.
    #[arg(long, value_name = "PATH")]
    output: PathBuf,
    /// Test file to leave out; repeatable.
    #[arg(long = "exclude", value_name = "FILE")]
    exclude: Vec<String>,
    /// Test files in order; every script in the base directory when omitted.
    #[arg(value_name = "FILES")]
    files: Vec<String>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a conformance configuration file.
    Validate(ConfigValidateCommand),
    /// Print an example configuration.
    Example,
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Run(command) => command_run(&command),
        Commands::Amalgamate(command) => command_amalgamate(&command),
        Commands::Bundle(command) => command_bundle(&command),
        Commands::Manifest {
            command,
        } => command_manifest(command),
        Commands::Config {
            command,
        } => command_config(command),
    }
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Run Command
// ============================================================================

/// Executes the `run` command.
fn command_run(command: &RunCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let manifests = if command.manifests.is_empty() {
        config.manifest_paths()
    } else {
        command.manifests.clone()
    };
    if manifests.is_empty() {
        return Err(CliError::new(t!("run.no_manifests")));
    }

    let engine = build_engine(&config)?;
    let audit = build_audit_sink(&config)?;
    let source = FileManifestSource::new(manifests).with_exclusions(config.run.exclusions());
    let mut aggregator = RunAggregator::with_options(
        engine,
        WriterReport::new(std::io::stdout()),
        config.run.harness_options(),
    )
    .with_audit(audit);
    let report = aggregator
        .run_source(&source)
        .map_err(|err| CliError::new(t!("run.aborted", error = err)))?;

    if command.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|err| CliError::new(t!("run.report.serialize_failed", error = err)))?;
        write_stdout_line(&json).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }

    if strict_failure(&report.tally, command.strict) {
        write_stderr_line(&t!(
            "run.strict.failed",
            count = report.tally.non_passed(),
            total = report.tally.total_cases
        ))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Builds the engine under test from the `[engine]` section.
fn build_engine(config: &HarnessConfig) -> CliResult<CommandEngine> {
    if config.engine.command.is_empty() {
        return Err(CliError::new(t!("run.engine.missing_command")));
    }
    let prelude = config
        .prelude_path()
        .map(|path| CommandEngine::load_prelude(&path))
        .transpose()
        .map_err(|err| CliError::new(t!("run.engine.prelude_failed", error = err)))?;
    CommandEngine::new(EngineSettings {
        command: config.engine.command.clone(),
        script_mode: config.engine.script_mode,
        prelude,
        failure_marker: config.engine.failure_marker.clone(),
    })
    .map_err(|err| CliError::new(t!("run.engine.invalid", error = err)))
}

/// Builds the audit sink selected by the `[audit]` section.
fn build_audit_sink(config: &HarnessConfig) -> CliResult<Arc<dyn HarnessAuditSink>> {
    match config.audit.mode {
        AuditMode::None => Ok(Arc::new(NoopAuditSink)),
        AuditMode::Stderr => Ok(Arc::new(StderrAuditSink)),
        AuditMode::File => {
            let path = config.audit_path().unwrap_or_default();
            let sink = FileAuditSink::new(&path).map_err(|err| {
                CliError::new(t!("run.audit.open_failed", path = path.display(), error = err))
            })?;
            Ok(Arc::new(sink))
        }
    }
}

/// Returns true when strict mode should turn a completed run into a failure.
const fn strict_failure(tally: &RunTally, strict: bool) -> bool {
    strict && tally.non_passed() > 0
}

// ============================================================================
// SECTION: Build Step Commands
// ============================================================================

/// Executes the `amalgamate` command.
fn command_amalgamate(command: &AmalgamateCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let Some(section) = &config.amalgamate else {
        return Err(CliError::new(t!("amalgamate.missing_section")));
    };
    let amalgamator = Amalgamator::from_config(section)
        .map_err(|err| CliError::new(t!("amalgamate.failed", error = err)))?;
    let text = amalgamator
        .amalgamate(&config.resolve(&section.base_dir), &section.files)
        .map_err(|err| CliError::new(t!("amalgamate.failed", error = err)))?;
    let output = command.output.clone().unwrap_or_else(|| config.resolve(&section.output));
    write_amalgamation(&output, &text)
        .map_err(|err| CliError::new(t!("amalgamate.failed", error = err)))?;
    write_stdout_line(&t!(
        "amalgamate.ok",
        files = section.files.len(),
        path = output.display()
    ))
    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `bundle` command.
fn command_bundle(command: &BundleCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let Some(section) = &config.bundle else {
        return Err(CliError::new(t!("bundle.missing_section")));
    };
    let header = match &section.header_path {
        Some(path) => read_header(&config.resolve(path))
            .map_err(|err| CliError::new(t!("bundle.failed", error = err)))?,
        None => DEFAULT_BUNDLE_HEADER.to_string(),
    };
    let suites = BundleSuite::from_config(section, |dir| config.resolve(dir));
    let text = render_bundle(&header, &suites)
        .map_err(|err| CliError::new(t!("bundle.failed", error = err)))?;
    let output = command.output.clone().unwrap_or_else(|| config.resolve(&section.output));
    write_bundle(&output, &text).map_err(|err| CliError::new(t!("bundle.failed", error = err)))?;
    let files: usize = suites.iter().map(|suite| suite.files.len()).sum();
    write_stdout_line(&t!("bundle.ok", files = files, path = output.display()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Manifest Commands
// ============================================================================

/// Dispatches manifest subcommands.
fn command_manifest(command: ManifestCommand) -> CliResult<ExitCode> {
    match command {
        ManifestCommand::Pack(command) => command_manifest_pack(&command),
    }
}

/// Executes the `manifest pack` command.
fn command_manifest_pack(command: &ManifestPackCommand) -> CliResult<ExitCode> {
    let files = if command.files.is_empty() {
        collect_test_files(&command.base_dir)
            .map_err(|err| CliError::new(t!("manifest.pack.failed", error = err)))?
    } else {
        command.files.clone()
    };
    let exclude: BTreeSet<String> = command.exclude.iter().cloned().collect();
    let manifest = pack_manifest(&command.name, &command.base_dir, &files, &exclude)
        .map_err(|err| CliError::new(t!("manifest.pack.failed", error = err)))?;
    write_manifest(&command.output, &manifest)
        .map_err(|err| CliError::new(t!("manifest.pack.failed", error = err)))?;
    write_stdout_line(&t!(
        "manifest.pack.ok",
        cases = manifest.cases.len(),
        path = command.output.display()
    ))
    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
        ConfigCommand::Example => command_config_example(),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = load_config(command.config.as_deref())?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the config example command.
fn command_config_example() -> CliResult<ExitCode> {
    let mut stdout = std::io::stdout();
    stdout
        .write_all(config_toml_example().as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads configuration with the standard resolution rules.
fn load_config(path: Option<&Path>) -> CliResult<HarnessConfig> {
    HarnessConfig::load(path)
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
