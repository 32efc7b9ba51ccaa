//! Options accepted by the `init` generator.
//!
//! [`InitOptions`] is built once per invocation from the command line and the
//! global configuration, then handed read-only to the pipeline. Style and
//! linter are strict (clap rejects unknown values); the two test-runner
//! options are lenient because workspace tooling frequently forwards values
//! from older presets. An unrecognized runner is logged and treated as
//! "no runner".

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stylesheet format for generated components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Plain CSS.
    #[default]
    Css,
    /// Sass (SCSS syntax).
    Scss,
    /// Less.
    Less,
    /// Stylus.
    Styl,
}

impl Style {
    /// Value written into the workspace generator defaults.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::Scss => "scss",
            Self::Less => "less",
            Self::Styl => "styl",
        }
    }
}

/// Linter configured for generated projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Linter {
    /// ESLint.
    #[default]
    Eslint,
    /// TSLint.
    Tslint,
    /// No linter.
    None,
}

impl Linter {
    /// Value written into the workspace generator defaults.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eslint => "eslint",
            Self::Tslint => "tslint",
            Self::None => "none",
        }
    }
}

/// Unit-test runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitTestRunner {
    /// Jest with `jest-preset-angular`.
    #[default]
    Jest,
    /// Karma with Jasmine.
    Karma,
    /// No unit-test tooling.
    None,
}

impl UnitTestRunner {
    /// Value written into the workspace generator defaults.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Jest => "jest",
            Self::Karma => "karma",
            Self::None => "none",
        }
    }

    /// Parses a runner name, mapping anything unrecognized to [`Self::None`].
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nginit_cli::schema::UnitTestRunner;
    ///
    /// assert_eq!(UnitTestRunner::parse_lenient("Karma"), UnitTestRunner::Karma);
    /// assert_eq!(UnitTestRunner::parse_lenient("mocha"), UnitTestRunner::None);
    /// ```
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "jest" => Self::Jest,
            "karma" => Self::Karma,
            "none" | "" => Self::None,
            other => {
                tracing::warn!(
                    target: "schema",
                    "Unrecognized unit test runner '{}', no unit test tooling will be added",
                    other
                );
                Self::None
            }
        }
    }
}

/// End-to-end test runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum E2eTestRunner {
    /// Cypress.
    #[default]
    Cypress,
    /// Protractor with Jasmine.
    Protractor,
    /// No end-to-end tooling.
    None,
}

impl E2eTestRunner {
    /// Value written into the workspace generator defaults.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cypress => "cypress",
            Self::Protractor => "protractor",
            Self::None => "none",
        }
    }

    /// Parses a runner name, mapping anything unrecognized to [`Self::None`].
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "cypress" => Self::Cypress,
            "protractor" => Self::Protractor,
            "none" | "" => Self::None,
            other => {
                tracing::warn!(
                    target: "schema",
                    "Unrecognized e2e test runner '{}', no e2e tooling will be added",
                    other
                );
                Self::None
            }
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(Style, Linter, UnitTestRunner, E2eTestRunner);

/// Options for one `init` invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InitOptions {
    /// Stylesheet format recorded in the generator defaults.
    pub style: Style,
    /// Linter recorded in the generator defaults.
    pub linter: Linter,
    /// Unit-test runner to configure.
    pub unit_test_runner: UnitTestRunner,
    /// End-to-end test runner to configure.
    pub e2e_test_runner: E2eTestRunner,
    /// Skip the final formatting pass.
    pub skip_format: bool,
    /// Leave `package.json` alone (no post-install script, no dependency edits).
    pub skip_package_json: bool,
    /// Do not run the package manager after writing changes.
    pub skip_install: bool,
}
