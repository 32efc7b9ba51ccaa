//! Global user configuration.
//!
//! Stored at `~/.nginit/config.toml` (`%LOCALAPPDATA%\nginit\config.toml` on
//! Windows) and optional: a missing file means built-in defaults. A different
//! file can be selected with `--config` or the `NGINIT_CONFIG` environment
//! variable.
//!
//! ```toml
//! package_manager = "pnpm"
//! install_timeout_secs = 900
//!
//! [defaults]
//! style = "scss"
//! linter = "eslint"
//! unit_test_runner = "jest"
//! e2e_test_runner = "cypress"
//!
//! [versions]
//! angular = "^12.1.0"
//! ```
//!
//! Command-line flags always win over `[defaults]`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::constants::DEFAULT_INSTALL_TIMEOUT;
use crate::core::NginitError;
use crate::installer::PackageManager;
use crate::schema::{Linter, Style};
use crate::versions::VersionRegistry;

/// Defaults for `init` options not given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InitDefaults {
    /// Default stylesheet format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    /// Default linter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linter: Option<Linter>,
    /// Default unit-test runner. Parsed leniently, like the CLI flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_test_runner: Option<String>,
    /// Default end-to-end test runner. Parsed leniently, like the CLI flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e2e_test_runner: Option<String>,
}

/// Contents of the global configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Option defaults for `init`.
    #[serde(default)]
    pub defaults: InitDefaults,

    /// Package manager to use instead of lockfile detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<PackageManager>,

    /// Install timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_timeout_secs: Option<u64>,

    /// Per-package version overrides, keyed by pin name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub versions: BTreeMap<String, String>,
}

impl GlobalConfig {
    /// Loads from `path` if given, otherwise from the default location.
    ///
    /// An explicit path must exist; the default file may be absent.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(&path).await,
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::load_from(&path).await
                } else {
                    tracing::debug!(target: "config", "No global config at {}", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    /// Loads and parses a specific file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read global config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .map_err(NginitError::from)
            .with_context(|| format!("Failed to parse global config from {}", path.display()))?;
        tracing::debug!(target: "config", "Loaded global config from {}", path.display());
        Ok(config)
    }

    /// Default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("nginit")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".nginit")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Version registry with this configuration's overrides applied.
    pub fn version_registry(&self) -> Result<VersionRegistry> {
        VersionRegistry::from_overrides(&self.versions)
    }

    /// Configured install timeout, or the built-in default.
    pub fn install_timeout(&self) -> Result<Duration> {
        match self.install_timeout_secs {
            None => Ok(DEFAULT_INSTALL_TIMEOUT),
            Some(0) => Err(NginitError::ConfigError {
                message: "install_timeout_secs must be greater than zero".to_string(),
            }
            .into()),
            Some(secs) => Ok(Duration::from_secs(secs)),
        }
    }
}
