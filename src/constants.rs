//! Global constants used throughout the nginit codebase.
//!
//! This module contains well-known file names, generator and collection
//! identifiers, the post-install command, the pinned version table and the
//! timeouts used when talking to the package manager. Defining them centrally
//! keeps the overlay logic free of magic strings.

use std::time::Duration;

/// Package manifest at the workspace root.
pub const PACKAGE_JSON: &str = "package.json";

/// Workspace configuration files, in discovery order.
pub const WORKSPACE_CONFIG_FILES: &[&str] = &["workspace.json", "angular.json"];

/// Collection registered as the default provider for scaffolding operations.
pub const ANGULAR_COLLECTION: &str = "@nrwl/angular";

/// Generic workspace collection that a framework collection may replace.
pub const WORKSPACE_COLLECTION: &str = "@nrwl/workspace";

/// Generator receiving style, linter and both test runners.
pub const APPLICATION_GENERATOR: &str = "@nrwl/angular:application";

/// Generator receiving style, linter and the unit-test runner.
pub const LIBRARY_GENERATOR: &str = "@nrwl/angular:library";

/// Generator receiving only the style.
pub const COMPONENT_GENERATOR: &str = "@nrwl/angular:component";

/// Command appended to the `postinstall` script.
pub const NGCC_COMMAND: &str = "ngcc --properties es2015 browser module main";

/// Substring marking a postinstall script that already runs ngcc.
pub const NGCC_MARKER: &str = "ngcc";

/// Separator used when appending to an existing postinstall script.
pub const SCRIPT_SEPARATOR: &str = " && ";

/// Dev dependency whose presence means Jest is already initialized.
pub const JEST_INTEGRATION_PACKAGE: &str = "@nrwl/jest";

/// Dev dependency whose presence means Cypress is already initialized.
pub const CYPRESS_INTEGRATION_PACKAGE: &str = "@nrwl/cypress";

/// Dev dependency whose presence means Protractor is already configured.
pub const PROTRACTOR_PACKAGE: &str = "protractor";

/// Environment variable handed to the install child process when a planned
/// dependency requires npm's legacy peer dependency resolution.
pub const LEGACY_PEER_DEPS_ENV: &str = "npm_config_legacy_peer_deps";

/// Default timeout for the package manager install (10 minutes).
///
/// Fresh Angular workspaces pull several hundred packages; slow mirrors and
/// CI caches regularly need more than a few minutes.
pub const DEFAULT_INSTALL_TIMEOUT: Duration = Duration::from_secs(600);

/// Pinned package versions, keyed by the name used in [`crate::config`]'s
/// `[versions]` override table.
pub mod versions {
    /// Angular framework packages.
    pub const ANGULAR: &str = "^12.0.0";
    /// RxJS.
    pub const RXJS: &str = "~6.6.3";
    /// tslib runtime helpers.
    pub const TSLIB: &str = "^2.0.0";
    /// zone.js.
    pub const ZONE_JS: &str = "~0.11.4";
    /// jest-preset-angular.
    pub const JEST_PRESET_ANGULAR: &str = "8.4.0";
    /// Nx plugins (`@nrwl/jest`, `@nrwl/cypress`).
    pub const NX: &str = "12.3.4";
    /// Jest.
    pub const JEST: &str = "26.2.2";
    /// Jest type definitions.
    pub const JEST_TYPES: &str = "26.0.8";
    /// ts-jest.
    pub const TS_JEST: &str = "26.5.5";
    /// Cypress.
    pub const CYPRESS: &str = "^7.3.0";
    /// Karma.
    pub const KARMA: &str = "~6.3.0";
    /// karma-chrome-launcher.
    pub const KARMA_CHROME_LAUNCHER: &str = "~3.1.0";
    /// karma-coverage.
    pub const KARMA_COVERAGE: &str = "~2.0.3";
    /// karma-jasmine.
    pub const KARMA_JASMINE: &str = "~4.0.0";
    /// karma-jasmine-html-reporter.
    pub const KARMA_JASMINE_HTML_REPORTER: &str = "^1.5.0";
    /// Protractor.
    pub const PROTRACTOR: &str = "~7.0.0";
    /// jasmine-core.
    pub const JASMINE_CORE: &str = "~3.6.0";
    /// jasmine-spec-reporter.
    pub const JASMINE_SPEC_REPORTER: &str = "~5.0.0";
    /// `@types/jasmine`.
    pub const JASMINE_TYPES: &str = "~3.6.0";
    /// `@types/jasminewd2`.
    pub const JASMINEWD2_TYPES: &str = "~2.0.3";
}
