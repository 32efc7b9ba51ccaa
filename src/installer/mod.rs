//! Package manager detection and the post-run install.
//!
//! `init` only edits files. When it changed the dependency tables it hands
//! back an [`InstallTask`]; after the tree has been flushed the CLI runs the
//! task through an [`Installer`], which spawns `<package manager> install` in
//! the workspace root.
//!
//! Some Angular tooling needs npm's legacy peer dependency resolution. That
//! requirement travels on the task and is set on the child process
//! environment only; nginit's own environment is never modified.

pub mod command_builder;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_INSTALL_TIMEOUT, LEGACY_PEER_DEPS_ENV};
use command_builder::PackageManagerCommand;

/// Supported package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    /// npm
    #[default]
    Npm,
    /// Yarn
    Yarn,
    /// pnpm
    Pnpm,
}

impl PackageManager {
    /// Detects the package manager from the lockfile in `root`.
    ///
    /// `yarn.lock` selects yarn, `pnpm-lock.yaml` selects pnpm, anything else
    /// falls back to npm.
    pub fn detect(root: &Path) -> Self {
        let detected = if root.join("yarn.lock").is_file() {
            Self::Yarn
        } else if root.join("pnpm-lock.yaml").is_file() {
            Self::Pnpm
        } else {
            Self::Npm
        };
        tracing::debug!(target: "installer", "Detected package manager: {}", detected);
        detected
    }

    /// Executable name.
    pub const fn command(self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
            Self::Pnpm => "pnpm",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// A pending dependency install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstallTask {
    /// Run the install with npm's legacy peer dependency resolution.
    pub legacy_peer_deps: bool,
}

/// Runs [`InstallTask`]s for one workspace.
#[derive(Debug, Clone)]
pub struct Installer {
    root: PathBuf,
    package_manager: PackageManager,
    timeout: Duration,
}

impl Installer {
    /// Installer for the workspace at `root`.
    pub fn new(root: impl Into<PathBuf>, package_manager: PackageManager) -> Self {
        Self {
            root: root.into(),
            package_manager,
            timeout: DEFAULT_INSTALL_TIMEOUT,
        }
    }

    /// Overrides the install timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Package manager this installer runs.
    pub const fn package_manager(&self) -> PackageManager {
        self.package_manager
    }

    /// Command that would run `task`, without executing it.
    pub fn command(&self, task: &InstallTask) -> PackageManagerCommand {
        let mut command = PackageManagerCommand::new(self.package_manager.command())
            .arg("install")
            .current_dir(&self.root)
            .with_timeout(Some(self.timeout));
        if task.legacy_peer_deps {
            command = command.env(LEGACY_PEER_DEPS_ENV, "true");
        }
        command
    }

    /// Runs the install, streaming the package manager's output.
    pub async fn run(&self, task: &InstallTask) -> Result<()> {
        tracing::info!(
            target: "installer",
            "Installing packages with {} in {}",
            self.package_manager,
            self.root.display()
        );
        self.command(task).inherit_stdio().execute().await?;
        Ok(())
    }
}
