//! nginit - add Angular support to a JavaScript monorepo workspace
//!
//! `nginit init` overlays Angular configuration onto an existing workspace:
//!
//! - default options for the Angular application, library and component
//!   generators in `workspace.json` / `angular.json`
//! - `@nrwl/angular` as the default collection
//! - an `ngcc` post-install script and the Angular dependencies in
//!   `package.json`
//! - unit-test tooling (Jest or Karma) and end-to-end tooling (Cypress or
//!   Protractor)
//!
//! Every edit goes through a virtual [`tree::Tree`] and reaches the disk in a
//! single flush once all steps succeeded.
//!
//! # Modules
//!
//! - [`overlay`] - what `init` changes: generator defaults, post-install
//!   script, dependency plans and test-runner actions
//! - [`generators`] - the `init` pipeline and the Jest, Karma and Cypress
//!   sub-generators
//! - [`schema`] - `init` options
//! - [`manifest`] - `package.json` view and dependency sets
//! - [`workspace`] - workspace configuration view
//! - [`tree`] - virtual file tree
//! - [`formatter`] - formatting of changed files
//! - [`installer`] - package manager detection and install
//! - [`versions`] - pinned package versions
//! - [`config`] - global configuration (`~/.nginit/config.toml`)
//! - [`core`] - error types
//! - [`cli`] - command-line interface
//! - [`utils`] - file system helpers
//!
//! # Example
//!
//! ```rust,no_run
//! use nginit_cli::generators::{self, BuiltinGenerators};
//! use nginit_cli::schema::{InitOptions, Style};
//! use nginit_cli::tree::Tree;
//! use nginit_cli::versions::VersionRegistry;
//!
//! # fn example() -> anyhow::Result<()> {
//! let versions = VersionRegistry::new();
//! let options = InitOptions { style: Style::Scss, ..InitOptions::default() };
//! let mut tree = Tree::new("/path/to/workspace");
//! let outcome = generators::init(
//!     &mut tree,
//!     &options,
//!     &versions,
//!     &mut BuiltinGenerators::new(versions.clone()),
//! )?;
//! tree.flush()?;
//! println!("{} actions, install needed: {}", outcome.actions.len(), outcome.install.is_some());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod formatter;
pub mod generators;
pub mod installer;
pub mod manifest;
pub mod overlay;
pub mod schema;
pub mod tree;
pub mod utils;
pub mod versions;
pub mod workspace;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
