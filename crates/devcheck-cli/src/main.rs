//! devcheck - quality-check orchestrator
//!
//! Runs lint, typecheck, build and test for every sub-application of a
//! repository, in two phases.
//!
//! ## Commands
//!
//! - `check`: run checks and report the verdict
//! - `detect`: list discovered sub-applications and their stacks
//! - `tools`: report whether the tools each stack needs are installed

mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use devcheck_ci::{CheckPipeline, RunOptions};
use devcheck_core::config::timeout_from_secs;
use devcheck_core::{
    discover_sub_apps, probe_tools, validate_repo_root, CheckKind, DevcheckConfig, StackSet,
    METRICS,
};
use tracing::{debug, Level};

use crate::render::{CheckRunJson, CheckRunReport, SubAppListing, ToolListing};

#[derive(Parser)]
#[command(name = "devcheck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Phased lint/typecheck/build/test runner for single- and multi-app repositories", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run quality checks for every sub-application
    Check {
        /// Repository path (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Checks to run (comma-separated: lint,typecheck,build,test)
        #[arg(long, value_delimiter = ',')]
        only: Vec<CheckKind>,

        /// Ask linters to fix what they can
        #[arg(long)]
        fix: bool,

        /// Per-command timeout in seconds (0 disables)
        #[arg(long, env = "DEVCHECK_TIMEOUT_SECS")]
        timeout_secs: Option<u64>,

        /// Config file (default: <path>/.devcheck.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Report format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show discovered sub-applications and their stacks
    Detect {
        /// Repository path (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Report format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Check that the tools required by the detected stacks are installed
    Tools {
        /// Repository path (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Config file (default: <path>/.devcheck.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Report format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    devcheck_core::init_tracing(cli.log_json, level);

    let code = match cli.command {
        Commands::Check {
            path,
            only,
            fix,
            timeout_secs,
            config,
            format,
        } => cmd_check(&path, only, fix, timeout_secs, config.as_deref(), format).await,
        Commands::Detect { path, format } => cmd_detect(&path, format),
        Commands::Tools {
            path,
            config,
            format,
        } => cmd_tools(&path, config.as_deref(), format),
    };

    METRICS.flush();
    code
}

/// Explicit `--config` wins; otherwise the repository's own config file.
fn load_config(repo: &Path, explicit: Option<&Path>) -> Result<DevcheckConfig> {
    match explicit {
        Some(path) => DevcheckConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => DevcheckConfig::load_for_repo(repo).context("Failed to load repository config"),
    }
}

/// Directory name used in report headers.
fn repo_name(path: &Path) -> String {
    path.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| path.display().to_string())
}

/// Run checks and print the report. Exit 0 iff nothing failed.
async fn cmd_check(
    path: &Path,
    only: Vec<CheckKind>,
    fix: bool,
    timeout_secs: Option<u64>,
    config: Option<&Path>,
    format: OutputFormat,
) -> Result<ExitCode> {
    let config = load_config(path, config)?;
    let registry = config.registry().context("Invalid command configuration")?;

    // CLI flag (or DEVCHECK_TIMEOUT_SECS) over config file over default.
    let timeout = match timeout_secs {
        Some(secs) => timeout_from_secs(secs),
        None => config.timeout(),
    };
    let mut options = RunOptions::default().with_fix(fix).with_timeout(timeout);
    if !only.is_empty() {
        options = options.with_only(only);
    }
    debug!(?options, "resolved run options");

    let run = CheckPipeline::with_registry(registry)
        .run(path, &options)
        .await
        .context("Check run failed to start")?;

    match format {
        OutputFormat::Text => print!(
            "{}",
            CheckRunReport {
                repo_name: &repo_name(path),
                run: &run,
            }
        ),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&CheckRunJson::new(&run))?)
        }
    }

    Ok(if run.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Print discovered sub-applications.
fn cmd_detect(path: &Path, format: OutputFormat) -> Result<ExitCode> {
    validate_repo_root(path)?;
    let sub_apps = discover_sub_apps(path);

    match format {
        OutputFormat::Text => print!(
            "{}",
            SubAppListing {
                repo_name: &repo_name(path),
                sub_apps: &sub_apps,
            }
        ),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&sub_apps)?),
    }
    Ok(ExitCode::SUCCESS)
}

/// Print tool availability. Exit 1 if any required tool is missing.
fn cmd_tools(path: &Path, config: Option<&Path>, format: OutputFormat) -> Result<ExitCode> {
    validate_repo_root(path)?;
    let registry = load_config(path, config)?
        .registry()
        .context("Invalid command configuration")?;

    let stacks = all_stacks(&discover_sub_apps(path));
    let tools = probe_tools(&registry, &stacks);

    match format {
        OutputFormat::Text => print!(
            "{}",
            ToolListing {
                repo_name: &repo_name(path),
                stacks: &stacks,
                tools: &tools,
            }
        ),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tools)?),
    }

    Ok(if tools.iter().all(|t| t.found) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Union of every sub-application's stacks, in discovery order.
fn all_stacks(sub_apps: &[devcheck_core::SubApp]) -> StackSet {
    sub_apps
        .iter()
        .flat_map(|app| app.stacks.iter().cloned())
        .collect()
}
