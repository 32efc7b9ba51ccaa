//! Builder for package manager invocations.
//!
//! Wraps [`tokio::process::Command`] with the handful of things every install
//! needs: a working directory, per-process environment variables, a timeout,
//! and translation of failures into [`NginitError`] variants.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::process::Command;
use tokio::time::timeout;

use crate::core::NginitError;

/// Captured output of a finished command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

/// Fluent builder for one package manager command.
///
/// ```rust,no_run
/// use nginit_cli::installer::command_builder::PackageManagerCommand;
/// use std::time::Duration;
///
/// # async fn example() -> anyhow::Result<()> {
/// PackageManagerCommand::new("npm")
///     .arg("install")
///     .current_dir("/path/to/workspace")
///     .env("npm_config_legacy_peer_deps", "true")
///     .with_timeout(Some(Duration::from_secs(600)))
///     .execute()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PackageManagerCommand {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    env_vars: Vec<(String, String)>,
    capture_output: bool,
    timeout_duration: Option<Duration>,
}

impl PackageManagerCommand {
    /// Command running `program`, looked up on `PATH` at execution time.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            env_vars: Vec::new(),
            capture_output: true,
            timeout_duration: None,
        }
    }

    /// Adds one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the working directory.
    #[must_use]
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Sets an environment variable on the child process only.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Streams output to the terminal instead of capturing it.
    #[must_use]
    pub const fn inherit_stdio(mut self) -> Self {
        self.capture_output = false;
        self
    }

    /// Sets the timeout. `None` waits forever.
    #[must_use]
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Arguments as they will be passed to the program.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Environment variables set on the child.
    pub fn get_envs(&self) -> &[(String, String)] {
        &self.env_vars
    }

    /// Runs the command and waits for it.
    ///
    /// # Errors
    ///
    /// - [`NginitError::PackageManagerNotFound`] if the program cannot be found
    /// - [`NginitError::InstallTimedOut`] if the timeout elapses
    /// - [`NginitError::InstallFailed`] on a non-zero exit status
    pub async fn execute(self) -> Result<CommandOutput> {
        let start = std::time::Instant::now();
        let executable =
            which::which(&self.program).map_err(|_| NginitError::PackageManagerNotFound {
                name: self.program.clone(),
            })?;
        let command_line = format!("{} {}", self.program, self.args.join(" "));

        let mut cmd = Command::new(&executable);
        cmd.args(&self.args);
        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.env_vars {
            tracing::trace!(target: "installer", "Setting env var: {}={}", key, value);
            cmd.env(key, value);
        }
        if self.capture_output {
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());
        } else {
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());
        }
        cmd.kill_on_drop(true);

        tracing::debug!(target: "installer", "Executing command: {}", command_line);

        let output_future = cmd.output();
        let output = if let Some(duration) = self.timeout_duration {
            if let Ok(result) = timeout(duration, output_future).await {
                result.with_context(|| format!("Failed to execute {command_line}"))?
            } else {
                tracing::warn!(
                    target: "installer",
                    "Command timed out after {} seconds: {}",
                    duration.as_secs(),
                    command_line
                );
                return Err(NginitError::InstallTimedOut {
                    package_manager: self.program,
                    seconds: duration.as_secs(),
                }
                .into());
            }
        } else {
            output_future.await.with_context(|| format!("Failed to execute {command_line}"))?
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(
                target: "installer",
                "Command failed with exit code: {:?}",
                output.status.code()
            );
            return Err(NginitError::InstallFailed {
                package_manager: self.program,
                stderr: if stderr.trim().is_empty() {
                    stdout
                } else {
                    stderr
                },
            }
            .into());
        }

        if !stdout.is_empty() {
            tracing::debug!(target: "installer", "{}", stdout.trim());
        }
        tracing::debug!(
            target: "installer::perf",
            "{} took {:.2}s",
            command_line,
            start.elapsed().as_secs_f64()
        );

        Ok(CommandOutput {
            stdout,
            stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_args_and_env() {
        let cmd = PackageManagerCommand::new("npm")
            .arg("install")
            .args(["--no-audit", "--no-fund"])
            .env("npm_config_legacy_peer_deps", "true");
        assert_eq!(cmd.get_args(), ["install", "--no-audit", "--no-fund"]);
        assert_eq!(
            cmd.get_envs(),
            [("npm_config_legacy_peer_deps".to_string(), "true".to_string())]
        );
    }

    #[tokio::test]
    async fn test_missing_program() {
        let err = PackageManagerCommand::new("nginit-definitely-not-a-package-manager")
            .arg("install")
            .execute()
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NginitError>(),
            Some(NginitError::PackageManagerNotFound { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_env_reaches_child_only() {
        let output = PackageManagerCommand::new("sh")
            .args(["-c", "printf %s \"$NGINIT_TEST_CHILD_ONLY\""])
            .env("NGINIT_TEST_CHILD_ONLY", "yes")
            .execute()
            .await
            .unwrap();
        assert_eq!(output.stdout, "yes");
        assert!(std::env::var("NGINIT_TEST_CHILD_ONLY").is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_debug_logging_formats_command_line() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let output = PackageManagerCommand::new("sh")
            .args(["-c", "echo done"])
            .with_timeout(Some(Duration::from_secs(30)))
            .execute()
            .await
            .unwrap();
        assert_eq!(output.stdout.trim(), "done");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_install_failed() {
        let err = PackageManagerCommand::new("sh")
            .args(["-c", "echo broken >&2; exit 3"])
            .execute()
            .await
            .unwrap_err();
        match err.downcast_ref::<NginitError>() {
            Some(NginitError::InstallFailed {
                stderr, ..
            }) => assert!(stderr.contains("broken")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout() {
        let err = PackageManagerCommand::new("sh")
            .args(["-c", "sleep 5"])
            .with_timeout(Some(Duration::from_millis(100)))
            .execute()
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NginitError>(),
            Some(NginitError::InstallTimedOut { .. })
        ));
    }
}
