//! Error handling for nginit
//!
//! This module provides the error taxonomy and user-friendly error reporting
//! for the Angular workspace initializer. The error system follows two rules:
//! 1. **Strongly-typed errors** for the failure modes callers may want to match on
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Error Categories
//!
//! - **Malformed input configuration** (fatal): [`NginitError::ManifestNotFound`],
//!   [`NginitError::WorkspaceConfigNotFound`], [`NginitError::InvalidJson`],
//!   [`NginitError::MalformedConfig`]
//! - **Collaborator failures** (propagated, abort the remaining steps):
//!   [`NginitError::SubGeneratorFailed`], [`NginitError::PackageManagerNotFound`],
//!   [`NginitError::InstallFailed`], [`NginitError::InstallTimedOut`]
//! - **Global configuration**: [`NginitError::ConfigError`]
//!
//! An unrecognized test-runner value is deliberately *not* an error: it parses
//! to the `None` runner and the step becomes a no-op.
//!
//! Functions throughout the crate return [`anyhow::Result`] and attach context
//! at I/O boundaries. [`user_friendly_error`] turns any such error into an
//! [`ErrorContext`] for display.
//!
//! # Examples
//!
//! ```rust,no_run
//! use nginit_cli::core::{NginitError, ErrorContext};
//!
//! let context = ErrorContext::new(NginitError::ManifestNotFound {
//!     path: "package.json".to_string(),
//! })
//! .with_suggestion("Run nginit from the root of a JavaScript workspace");
//!
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for nginit operations
#[derive(Error, Debug)]
pub enum NginitError {
    /// `package.json` is missing from the workspace root
    #[error("No package.json found at {path}")]
    ManifestNotFound {
        /// Path that was checked
        path: String,
    },

    /// Neither `workspace.json` nor `angular.json` exists
    #[error("No workspace configuration (workspace.json or angular.json) found in {root}")]
    WorkspaceConfigNotFound {
        /// Workspace root that was searched
        root: String,
    },

    /// A configuration file is not valid JSON
    #[error("Invalid JSON in {file}: {reason}")]
    InvalidJson {
        /// File that failed to parse
        file: String,
        /// Parser message
        reason: String,
    },

    /// A configuration file parsed but a key has the wrong shape
    ///
    /// Raised for instance when `scripts` is not an object, or when a
    /// generator defaults entry is a string instead of an options record.
    #[error("Malformed {file}: expected `{key}` to be {expected}")]
    MalformedConfig {
        /// File containing the malformed key
        file: String,
        /// JSON path of the offending key
        key: String,
        /// Human readable description of the expected shape
        expected: String,
    },

    /// A sub-generator (Jest, Karma, Cypress) failed
    #[error("Generator '{generator}' failed: {reason}")]
    SubGeneratorFailed {
        /// Sub-generator name
        generator: String,
        /// Failure description
        reason: String,
    },

    /// The package manager executable is not on PATH
    #[error("Package manager '{name}' was not found on PATH")]
    PackageManagerNotFound {
        /// Executable name
        name: String,
    },

    /// The package manager exited with a non-zero status
    #[error("{package_manager} install failed")]
    InstallFailed {
        /// Executable name
        package_manager: String,
        /// Captured standard error
        stderr: String,
    },

    /// The package manager did not finish within the configured timeout
    #[error("{package_manager} install timed out after {seconds} seconds")]
    InstallTimedOut {
        /// Executable name
        package_manager: String,
        /// Timeout in seconds
        seconds: u64,
    },

    /// Global configuration is invalid
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Error message
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for NginitError {
    fn clone(&self) -> Self {
        match self {
            Self::ManifestNotFound {
                path,
            } => Self::ManifestNotFound {
                path: path.clone(),
            },
            Self::WorkspaceConfigNotFound {
                root,
            } => Self::WorkspaceConfigNotFound {
                root: root.clone(),
            },
            Self::InvalidJson {
                file,
                reason,
            } => Self::InvalidJson {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::MalformedConfig {
                file,
                key,
                expected,
            } => Self::MalformedConfig {
                file: file.clone(),
                key: key.clone(),
                expected: expected.clone(),
            },
            Self::SubGeneratorFailed {
                generator,
                reason,
            } => Self::SubGeneratorFailed {
                generator: generator.clone(),
                reason: reason.clone(),
            },
            Self::PackageManagerNotFound {
                name,
            } => Self::PackageManagerNotFound {
                name: name.clone(),
            },
            Self::InstallFailed {
                package_manager,
                stderr,
            } => Self::InstallFailed {
                package_manager: package_manager.clone(),
                stderr: stderr.clone(),
            },
            Self::InstallTimedOut {
                package_manager,
                seconds,
            } => Self::InstallTimedOut {
                package_manager: package_manager.clone(),
                seconds: *seconds,
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            // For errors that don't implement Clone, convert to Other
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

impl NginitError {
    /// Shorthand for [`NginitError::MalformedConfig`].
    pub fn malformed(
        file: impl Into<String>,
        key: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::MalformedConfig {
            file: file.into(),
            key: key.into(),
            expected: expected.into(),
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// Pairs an [`NginitError`] with optional details (why it happened) and a
/// suggestion (what to do about it).
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying nginit error
    pub error: NginitError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`NginitError`]
    #[must_use]
    pub const fn new(error: NginitError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes, in order: an [`ErrorContext`] already attached to the error,
/// any [`NginitError`] in the error chain, [`std::io::Error`] and
/// [`serde_json::Error`]. Anything else is wrapped as
/// [`NginitError::Other`] with the full context chain as the message.
///
/// # Examples
///
/// ```rust,no_run
/// use nginit_cli::core::{NginitError, user_friendly_error};
///
/// let error = NginitError::PackageManagerNotFound { name: "pnpm".to_string() };
/// let context = user_friendly_error(anyhow::Error::from(error));
///
/// context.display(); // Shows installation suggestions
/// ```
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(ctx) = error.downcast_ref::<ErrorContext>() {
        return ErrorContext {
            error: ctx.error.clone(),
            suggestion: ctx.suggestion.clone(),
            details: ctx.details.clone(),
        };
    }

    for cause in error.chain() {
        if let Some(nginit_error) = cause.downcast_ref::<NginitError>() {
            let (suggestion, details) = guidance_for(nginit_error);
            return ErrorContext {
                error: nginit_error.clone(),
                suggestion,
                details,
            };
        }
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(NginitError::Other {
                    message: format!("Permission denied: {io_error}"),
                })
                .with_suggestion("Check file ownership of the workspace or run from a writable checkout")
                .with_details("nginit rewrites package.json and the workspace configuration in place");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(NginitError::Other {
                    message: format!("File not found: {io_error}"),
                })
                .with_suggestion("Check that the workspace path is correct");
            }
            _ => {}
        }
    }

    if let Some(json_error) = error.downcast_ref::<serde_json::Error>() {
        return create_error_context(NginitError::InvalidJson {
            file: "unknown".to_string(),
            reason: json_error.to_string(),
        });
    }

    // Keep the whole context chain so "Failed to read X: <cause>" survives
    let message = format!("{error:#}");
    ErrorContext::new(NginitError::Other {
        message,
    })
}

fn create_error_context(error: NginitError) -> ErrorContext {
    let (suggestion, details) = guidance_for(&error);
    ErrorContext {
        error,
        suggestion,
        details,
    }
}

/// Suggestion and details shown for an error.
fn guidance_for(error: &NginitError) -> (Option<String>, Option<String>) {
    match error {
        NginitError::ManifestNotFound { .. } => (
            Some("Run nginit from the root of a JavaScript workspace, or pass --path <dir>".to_string()),
            Some("Angular dependencies are added to the package.json at the workspace root".to_string()),
        ),

        NginitError::WorkspaceConfigNotFound { .. } => (
            Some("Create a workspace.json (or angular.json) with at least `{ \"version\": 2, \"projects\": {} }`".to_string()),
            Some("Generator defaults and the default collection are stored in the workspace configuration".to_string()),
        ),

        NginitError::InvalidJson { file, .. } => (
            Some(format!("Fix the JSON syntax in {file}. Comments and trailing commas are not allowed")),
            None,
        ),

        NginitError::MalformedConfig { file, key, .. } => (
            Some(format!("Edit {file} so that `{key}` has the expected shape, then re-run")),
            Some("No files were written; nginit only writes once every step has succeeded".to_string()),
        ),

        NginitError::SubGeneratorFailed { .. } => (
            Some("Re-run with --verbose to see which file the generator was editing".to_string()),
            Some("Steps after the failing generator were skipped and nothing was written to disk".to_string()),
        ),

        NginitError::PackageManagerNotFound { name } => (
            Some(format!(
                "Install {name}, set `package_manager` in ~/.nginit/config.toml, or re-run with --skip-install"
            )),
            Some("Configuration files were updated; only the dependency installation was skipped".to_string()),
        ),

        NginitError::InstallFailed { package_manager, stderr } => {
            let details = if stderr.trim().is_empty() {
                "The package manager produced no error output".to_string()
            } else {
                stderr.trim().to_string()
            };
            (Some(format!("Run `{package_manager} install` manually to see the full log")), Some(details))
        }

        NginitError::InstallTimedOut { .. } => (
            Some("Raise `install_timeout_secs` in ~/.nginit/config.toml or install manually".to_string()),
            None,
        ),

        NginitError::ConfigError { .. } => {
            (Some("Check ~/.nginit/config.toml (or the file passed with --config)".to_string()), None)
        }

        NginitError::TomlError(_) => {
            (Some("Check the TOML syntax in your nginit configuration file".to_string()), None)
        }

        NginitError::IoError(_) | NginitError::Other { .. } => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = NginitError::ManifestNotFound {
            path: "/tmp/ws/package.json".to_string(),
        };
        assert_eq!(error.to_string(), "No package.json found at /tmp/ws/package.json");

        let error = NginitError::malformed("package.json", "scripts", "an object");
        assert_eq!(error.to_string(), "Malformed package.json: expected `scripts` to be an object");
    }

    #[test]
    fn test_clone_non_cloneable_variants() {
        let io = NginitError::from(std::io::Error::other("disk on fire"));
        match io.clone() {
            NginitError::Other {
                message,
            } => assert!(message.contains("disk on fire")),
            other => panic!("Expected Other, got {other:?}"),
        }
    }

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext::new(NginitError::PackageManagerNotFound {
            name: "pnpm".to_string(),
        })
        .with_suggestion("Install pnpm")
        .with_details("Needed for install");

        let rendered = format!("{ctx}");
        assert!(rendered.contains("Package manager 'pnpm' was not found"));
        assert!(rendered.contains("Details: Needed for install"));
        assert!(rendered.contains("Suggestion: Install pnpm"));
    }

    #[test]
    fn test_user_friendly_error_finds_nginit_error_in_chain() {
        let error = anyhow::Error::from(NginitError::SubGeneratorFailed {
            generator: "karma".to_string(),
            reason: "boom".to_string(),
        })
        .context("Failed to set up unit-test tooling");

        let ctx = user_friendly_error(error);
        assert!(matches!(ctx.error, NginitError::SubGeneratorFailed { .. }));
        assert!(ctx.suggestion.is_some());
        assert!(ctx.details.is_some());
    }

    #[test]
    fn test_user_friendly_error_generic_keeps_chain() {
        let error = anyhow::anyhow!("root cause").context("outer step");
        let ctx = user_friendly_error(error);
        match ctx.error {
            NginitError::Other {
                message,
            } => {
                assert!(message.contains("outer step"));
                assert!(message.contains("root cause"));
            }
            other => panic!("Expected Other, got {other:?}"),
        }
    }

    #[test]
    fn test_toml_error_keeps_suggestion() {
        let toml_error = toml::from_str::<toml::Table>("a = [").unwrap_err();
        let error = anyhow::Error::from(NginitError::from(toml_error)).context("Failed to parse config");
        let ctx = user_friendly_error(error);
        assert!(ctx.suggestion.unwrap().contains("TOML syntax"));
    }

    #[test]
    fn test_install_failed_context_uses_stderr() {
        let ctx = create_error_context(NginitError::InstallFailed {
            package_manager: "npm".to_string(),
            stderr: "ERESOLVE unable to resolve dependency tree\n".to_string(),
        });
        assert_eq!(ctx.details.as_deref(), Some("ERESOLVE unable to resolve dependency tree"));
        assert!(ctx.suggestion.unwrap().contains("npm install"));
    }
}
