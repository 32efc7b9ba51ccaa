//! Command-line interface for nginit.
//!
//! Global flags (`--verbose`, `--quiet`, `--config`) are turned into a
//! [`CliConfig`] once and passed down explicitly; nothing is communicated
//! through process environment variables.
//!
//! ```bash
//! nginit init --style scss --unit-test-runner jest --e2e-test-runner cypress
//! nginit --verbose init --dry-run
//! nginit --config ./ci-config.toml init --skip-install
//! ```

pub mod init;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Settings derived from the global command-line flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter. `None` falls back to `RUST_LOG`, then `info`.
    pub log_level: Option<String>,
    /// Global configuration file to use instead of the default.
    pub config_path: Option<PathBuf>,
    /// Suppress informational output.
    pub quiet: bool,
}

impl CliConfig {
    /// Installs the tracing subscriber. Later calls are no-ops.
    pub fn init_logging(&self) {
        let filter = match &self.log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        };
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Add Angular support to a JavaScript monorepo workspace.
#[derive(Parser, Debug)]
#[command(
    name = "nginit",
    about = "Add Angular support to a JavaScript monorepo workspace",
    version,
    long_about = "nginit registers Angular generator defaults, adds Angular dependencies and \
                  sets up unit and end-to-end test tooling in an existing workspace."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a global configuration file (default: ~/.nginit/config.toml)
    #[arg(short, long, global = true, env = "NGINIT_CONFIG")]
    config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add Angular support to the workspace
    Init(init::InitCommand),
}

impl Cli {
    /// Runs the parsed command line.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Builds the [`CliConfig`] for the parsed flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
            quiet: self.quiet,
        }
    }

    /// Runs the command with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        match self.command {
            Commands::Init(cmd) => cmd.execute(&config).await,
        }
    }
}
