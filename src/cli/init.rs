//! Add Angular support to an existing workspace.
//!
//! ```bash
//! # Defaults: css, eslint, jest, cypress
//! nginit init
//!
//! # Karma and Protractor, no install
//! nginit init --unit-test-runner karma --e2e-test-runner protractor --skip-install
//!
//! # Show what would change
//! nginit init --path ./my-workspace --style scss --dry-run
//! ```
//!
//! The command edits the workspace configuration and `package.json` through a
//! virtual tree and writes every file once, after all steps succeeded. A
//! failure leaves the workspace untouched. When dependencies changed, the
//! detected package manager runs `install` afterwards unless `--skip-install`
//! is given.

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::CliConfig;
use crate::config::{GlobalConfig, InitDefaults};
use crate::generators::{self, BuiltinGenerators, InitOutcome};
use crate::installer::{Installer, PackageManager};
use crate::schema::{E2eTestRunner, InitOptions, Linter, Style, UnitTestRunner};
use crate::tree::{ChangeKind, Tree};

/// Command adding Angular support to a workspace.
#[derive(Args, Debug, Clone, Default)]
pub struct InitCommand {
    /// Workspace root (defaults to current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Stylesheet format for generated components
    #[arg(long, value_enum)]
    pub style: Option<Style>,

    /// Linter for generated projects
    #[arg(long, value_enum)]
    pub linter: Option<Linter>,

    /// Unit-test runner: jest, karma or none
    ///
    /// Unrecognized values are treated as `none` with a warning.
    #[arg(long, value_name = "RUNNER")]
    pub unit_test_runner: Option<String>,

    /// End-to-end test runner: cypress, protractor or none
    ///
    /// Unrecognized values are treated as `none` with a warning.
    #[arg(long, value_name = "RUNNER")]
    pub e2e_test_runner: Option<String>,

    /// Do not reformat the changed files
    #[arg(long)]
    pub skip_format: bool,

    /// Do not modify package.json
    #[arg(long)]
    pub skip_package_json: bool,

    /// Do not run the package manager after writing changes
    #[arg(long)]
    pub skip_install: bool,

    /// Print the planned changes without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl InitCommand {
    /// Resolves the options for this run. Flags win over configured defaults,
    /// which win over built-in defaults.
    pub fn options(&self, defaults: &InitDefaults) -> InitOptions {
        let unit_test_runner = self
            .unit_test_runner
            .as_deref()
            .or(defaults.unit_test_runner.as_deref())
            .map_or_else(UnitTestRunner::default, UnitTestRunner::parse_lenient);
        let e2e_test_runner = self
            .e2e_test_runner
            .as_deref()
            .or(defaults.e2e_test_runner.as_deref())
            .map_or_else(E2eTestRunner::default, E2eTestRunner::parse_lenient);

        InitOptions {
            style: self.style.or(defaults.style).unwrap_or_default(),
            linter: self.linter.or(defaults.linter).unwrap_or_default(),
            unit_test_runner,
            e2e_test_runner,
            skip_format: self.skip_format,
            skip_package_json: self.skip_package_json,
            skip_install: self.skip_install || self.dry_run,
        }
    }

    /// Loads the global configuration and runs the command.
    pub async fn execute(self, cli: &CliConfig) -> Result<()> {
        let global = GlobalConfig::load_with_optional(cli.config_path.clone()).await?;
        self.execute_with_config(&global, cli.quiet).await
    }

    /// Runs the command with an already loaded configuration.
    pub async fn execute_with_config(self, global: &GlobalConfig, quiet: bool) -> Result<()> {
        let root = match &self.path {
            Some(path) => path.clone(),
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };
        if !root.is_dir() {
            bail!("Workspace directory does not exist: {}", root.display());
        }

        let versions = global.version_registry()?;
        let install_timeout = global.install_timeout()?;
        let options = self.options(&global.defaults);
        tracing::debug!(target: "cli", "Resolved options: {:?}", options);

        let mut tree = Tree::new(&root);
        let mut host = BuiltinGenerators::new(versions.clone());
        let outcome = generators::init(&mut tree, &options, &versions, &mut host)?;

        if self.dry_run {
            print_plan(&tree, &outcome);
            println!("\n{}", "Dry run: no files were written.".yellow());
            return Ok(());
        }

        let changes = tree.changes();
        let written = tree.flush()?;
        if !quiet {
            for change in &changes {
                println!("{} {}", change_label(change.kind), change.path.display());
            }
            if written == 0 {
                println!("{} Workspace already supports Angular", "✓".green());
            } else {
                println!("{} Added Angular support ({written} files changed)", "✓".green());
            }
        }

        if let Some(task) = outcome.install {
            let installer = Installer::new(
                &root,
                global.package_manager.unwrap_or_else(|| PackageManager::detect(&root)),
            )
            .with_timeout(install_timeout);
            installer.run(&task).await?;
            if !quiet {
                println!("{} Installed packages with {}", "✓".green(), installer.package_manager());
            }
        }

        Ok(())
    }
}

fn change_label(kind: ChangeKind) -> colored::ColoredString {
    match kind {
        ChangeKind::Create => kind.to_string().green(),
        ChangeKind::Update => kind.to_string().cyan(),
        ChangeKind::Delete => kind.to_string().red(),
    }
}

fn print_plan(tree: &Tree, outcome: &InitOutcome) {
    println!("{}", "Planned changes:".cyan());
    for change in tree.changes() {
        println!("  {} {}", change_label(change.kind), change.path.display());
    }
    if !outcome.actions.is_empty() {
        println!("{}", "Actions:".cyan());
        for action in &outcome.actions {
            println!("  - {action}");
        }
    }
    if !outcome.dependencies.is_empty() {
        println!("{} {} packages", "Dependencies:".cyan(), outcome.dependencies.len());
    }
}
