//! Configuration overlay for Angular support.
//!
//! The functions here decide *what* `init` changes; the pipeline in
//! [`crate::generators`] decides *when*. Edits to the workspace configuration
//! and `package.json` are applied to typed views in place, while anything with
//! a side effect beyond those two documents is returned as an [`Action`] for
//! the pipeline to execute.
//!
//! Every function is idempotent: running `init` twice produces the same
//! documents as running it once.
//!
//! # Generator defaults
//!
//! | generator | keys |
//! |---|---|
//! | `@nrwl/angular:application` | style, linter, unitTestRunner, e2eTestRunner |
//! | `@nrwl/angular:library` | style, linter, unitTestRunner |
//! | `@nrwl/angular:component` | style |
//!
//! Defaults only fill gaps. A key the user already set is never overwritten.

use std::collections::BTreeSet;
use std::fmt;

use anyhow::Result;
use serde_json::{Map, Value};

use crate::constants::{
    ANGULAR_COLLECTION, APPLICATION_GENERATOR, COMPONENT_GENERATOR, CYPRESS_INTEGRATION_PACKAGE,
    JEST_INTEGRATION_PACKAGE, LIBRARY_GENERATOR, NGCC_COMMAND, NGCC_MARKER, PROTRACTOR_PACKAGE,
    SCRIPT_SEPARATOR, WORKSPACE_COLLECTION,
};
use crate::manifest::{DependencySet, PackageJson};
use crate::schema::{E2eTestRunner, InitOptions, UnitTestRunner};
use crate::versions::{Pin, VersionRegistry};
use crate::workspace::WorkspaceDefaults;

/// Sub-generator the overlay can ask the host to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubGenerator {
    /// Karma and Jasmine setup.
    Karma,
    /// Jest workspace initialization.
    Jest,
    /// Cypress workspace initialization.
    Cypress,
}

impl SubGenerator {
    /// Short name used in logs and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Karma => "karma",
            Self::Jest => "jest",
            Self::Cypress => "cypress",
        }
    }
}

impl fmt::Display for SubGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A side effect planned by the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Add packages to `package.json`.
    AddDependencies {
        /// Packages to add.
        dependencies: DependencySet,
        /// The install that follows must run with npm's legacy peer
        /// dependency resolution.
        legacy_peer_deps: bool,
    },
    /// Run a sub-generator against the tree.
    RunGenerator(SubGenerator),
}

impl Action {
    /// Plain `AddDependencies` without the legacy peer-deps flag.
    pub fn add(dependencies: DependencySet) -> Self {
        Self::AddDependencies {
            dependencies,
            legacy_peer_deps: false,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddDependencies {
                dependencies,
                legacy_peer_deps,
            } => {
                let names: Vec<&str> = dependencies
                    .runtime
                    .keys()
                    .chain(dependencies.development.keys())
                    .map(String::as_str)
                    .collect();
                write!(f, "add dependencies: {}", names.join(", "))?;
                if *legacy_peer_deps {
                    f.write_str(" (legacy peer deps)")?;
                }
                Ok(())
            }
            Self::RunGenerator(generator) => write!(f, "run {generator} generator"),
        }
    }
}

/// Default option fragments for the three Angular generators.
pub fn default_fragments(options: &InitOptions) -> [(&'static str, Map<String, Value>); 3] {
    let style = || ("style".to_string(), Value::from(options.style.as_str()));
    let linter = || ("linter".to_string(), Value::from(options.linter.as_str()));
    let unit = || ("unitTestRunner".to_string(), Value::from(options.unit_test_runner.as_str()));
    let e2e = || ("e2eTestRunner".to_string(), Value::from(options.e2e_test_runner.as_str()));

    [
        (APPLICATION_GENERATOR, [style(), linter(), unit(), e2e()].into_iter().collect()),
        (LIBRARY_GENERATOR, [style(), linter(), unit()].into_iter().collect()),
        (COMPONENT_GENERATOR, [style()].into_iter().collect()),
    ]
}

/// Registers Angular generator defaults and the default collection.
///
/// Existing keys in each generator's options are kept; missing keys are
/// filled from `options`. Default keys lead the resulting record, followed by
/// any other keys the user configured. Afterwards `@nrwl/angular` becomes the
/// default collection (see [`set_default_collection`]).
pub fn apply_defaults(workspace: &mut WorkspaceDefaults, options: &InitOptions) -> Result<()> {
    for (generator, fragment) in default_fragments(options) {
        let complete = workspace
            .generator_options(generator)?
            .is_some_and(|existing| fragment.keys().all(|key| existing.contains_key(key)));
        if complete {
            continue;
        }
        let existing = workspace.generator_options_mut(generator)?;
        let mut merged = fragment;
        merged.extend(std::mem::take(existing));
        *existing = merged;
    }
    set_default_collection(workspace, ANGULAR_COLLECTION)?;
    Ok(())
}

/// Makes `collection` the default collection.
///
/// The marker is written when it is absent or still points at the generic
/// `@nrwl/workspace` collection. A different collection the user picked is
/// kept. Returns true if the marker changed.
pub fn set_default_collection(workspace: &mut WorkspaceDefaults, collection: &str) -> Result<bool> {
    match workspace.default_collection()? {
        Some(current) if current == collection => Ok(false),
        None | Some(WORKSPACE_COLLECTION) => {
            tracing::debug!(target: "overlay", "Setting default collection to {}", collection);
            workspace.set_default_collection(collection)?;
            Ok(true)
        }
        Some(current) => {
            tracing::debug!(
                target: "overlay",
                "Keeping default collection {} (not replacing with {})",
                current,
                collection
            );
            Ok(false)
        }
    }
}

/// Ensures `scripts.postinstall` runs ngcc.
///
/// A missing script is set to the ngcc command; a script without ngcc gets
/// the command appended with ` && `; a script that already mentions ngcc is
/// left alone. Returns true if the manifest changed.
pub fn ensure_post_install(manifest: &mut PackageJson) -> Result<bool> {
    let updated = match manifest.postinstall()? {
        None | Some("") => NGCC_COMMAND.to_string(),
        Some(script) if script.contains(NGCC_MARKER) => return Ok(false),
        Some(script) => format!("{script}{SCRIPT_SEPARATOR}{NGCC_COMMAND}"),
    };
    tracing::debug!(target: "overlay", "postinstall: {}", updated);
    manifest.set_postinstall(updated)?;
    Ok(true)
}

/// Angular runtime and build dependencies.
pub fn plan_dependencies(versions: &VersionRegistry) -> DependencySet {
    let angular = versions.get(Pin::Angular);
    let mut set = DependencySet::new();
    for package in [
        "@angular/animations",
        "@angular/common",
        "@angular/compiler",
        "@angular/core",
        "@angular/forms",
        "@angular/platform-browser",
        "@angular/platform-browser-dynamic",
        "@angular/router",
    ] {
        set = set.runtime(package, angular);
    }
    set.runtime("rxjs", versions.get(Pin::Rxjs))
        .runtime("tslib", versions.get(Pin::Tslib))
        .runtime("zone.js", versions.get(Pin::ZoneJs))
        .dev("@angular/compiler-cli", angular)
        .dev("@angular/language-service", angular)
        .dev("@angular-devkit/build-angular", angular)
}

/// Actions configuring the unit-test runner.
///
/// `dev_dependencies` is the current set of `devDependencies` names.
pub fn plan_unit_test_tooling(
    runner: UnitTestRunner,
    dev_dependencies: &BTreeSet<String>,
    versions: &VersionRegistry,
) -> Vec<Action> {
    match runner {
        UnitTestRunner::Karma => vec![Action::RunGenerator(SubGenerator::Karma)],
        UnitTestRunner::Jest => {
            // jest-preset-angular 8.x declares peer ranges npm 7 rejects
            let mut actions = vec![Action::AddDependencies {
                dependencies: DependencySet::new()
                    .dev("jest-preset-angular", versions.get(Pin::JestPresetAngular)),
                legacy_peer_deps: true,
            }];
            if !dev_dependencies.contains(JEST_INTEGRATION_PACKAGE) {
                actions.push(Action::RunGenerator(SubGenerator::Jest));
            }
            actions
        }
        UnitTestRunner::None => Vec::new(),
    }
}

/// Actions configuring the end-to-end test runner.
pub fn plan_e2e_test_tooling(
    runner: E2eTestRunner,
    dev_dependencies: &BTreeSet<String>,
    versions: &VersionRegistry,
) -> Vec<Action> {
    match runner {
        E2eTestRunner::Protractor if !dev_dependencies.contains(PROTRACTOR_PACKAGE) => {
            vec![Action::add(
                DependencySet::new()
                    .dev(PROTRACTOR_PACKAGE, versions.get(Pin::Protractor))
                    .dev("jasmine-core", versions.get(Pin::JasmineCore))
                    .dev("jasmine-spec-reporter", versions.get(Pin::JasmineSpecReporter))
                    .dev("@types/jasmine", versions.get(Pin::JasmineTypes))
                    .dev("@types/jasminewd2", versions.get(Pin::Jasminewd2Types)),
            )]
        }
        E2eTestRunner::Cypress if !dev_dependencies.contains(CYPRESS_INTEGRATION_PACKAGE) => {
            vec![Action::RunGenerator(SubGenerator::Cypress)]
        }
        E2eTestRunner::Protractor | E2eTestRunner::Cypress | E2eTestRunner::None => Vec::new(),
    }
}
