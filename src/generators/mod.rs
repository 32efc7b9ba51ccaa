//! The `init` pipeline and the built-in sub-generators.
//!
//! [`init`] runs the overlay steps in a fixed order against a [`Tree`]:
//!
//! 1. generator defaults and default collection
//! 2. ngcc post-install script
//! 3. Angular dependencies
//! 4. unit-test tooling
//! 5. end-to-end tooling
//! 6. formatting
//!
//! Each step reads the tree as left by the previous one, plans, and executes
//! its actions before the next step starts. The first error stops the
//! pipeline. Edits already staged in the tree stay there; the caller decides
//! whether to flush them, so a failed run normally writes nothing.
//!
//! Sub-generators are reached through [`GeneratorHost`]. [`BuiltinGenerators`]
//! is the production implementation; tests substitute a recording host.

mod cypress;
mod jest;
mod karma;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::constants::PACKAGE_JSON;
use crate::core::NginitError;
use crate::formatter;
use crate::installer::InstallTask;
use crate::manifest::{DependencyKind, DependencySet, PackageJson};
use crate::overlay::{self, Action, SubGenerator};
use crate::schema::{E2eTestRunner, InitOptions, UnitTestRunner};
use crate::tree::Tree;
use crate::versions::VersionRegistry;
use crate::workspace::WorkspaceDefaults;

/// Runs sub-generators on behalf of the pipeline.
pub trait GeneratorHost {
    /// Runs `generator` against `tree`.
    fn run(&mut self, generator: SubGenerator, tree: &mut Tree) -> Result<()>;
}

/// Sub-generators shipped with nginit.
#[derive(Debug, Clone, Default)]
pub struct BuiltinGenerators {
    versions: VersionRegistry,
}

impl BuiltinGenerators {
    /// Creates the built-in host using `versions` for every pinned package.
    pub fn new(versions: VersionRegistry) -> Self {
        Self {
            versions,
        }
    }
}

impl GeneratorHost for BuiltinGenerators {
    fn run(&mut self, generator: SubGenerator, tree: &mut Tree) -> Result<()> {
        match generator {
            SubGenerator::Karma => karma::run(tree, &self.versions),
            SubGenerator::Jest => jest::run(tree, &self.versions),
            SubGenerator::Cypress => cypress::run(tree, &self.versions),
        }
    }
}

/// Loads `package.json` for a sub-generator, reporting absence as a failure
/// of that generator.
fn load_manifest(generator: SubGenerator, tree: &Tree) -> Result<PackageJson> {
    if !tree.exists(PACKAGE_JSON) {
        return Err(NginitError::SubGeneratorFailed {
            generator: generator.name().to_string(),
            reason: format!("{PACKAGE_JSON} not found in {}", tree.root().display()),
        }
        .into());
    }
    PackageJson::load(tree)
}

/// Result of a successful `init` run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitOutcome {
    /// Actions executed, in order.
    pub actions: Vec<Action>,
    /// Every dependency the pipeline itself added, merged across actions.
    pub dependencies: DependencySet,
    /// Install to run after the tree is flushed, if dependencies changed.
    pub install: Option<InstallTask>,
    /// Number of files rewritten by the formatting pass.
    pub formatted: usize,
}

struct Pipeline<'a> {
    tree: &'a mut Tree,
    options: &'a InitOptions,
    host: &'a mut dyn GeneratorHost,
    outcome: InitOutcome,
    legacy_peer_deps: bool,
}

impl Pipeline<'_> {
    fn execute(&mut self, actions: Vec<Action>) -> Result<()> {
        for action in actions {
            match &action {
                Action::AddDependencies {
                    dependencies,
                    legacy_peer_deps,
                } => {
                    if self.options.skip_package_json {
                        tracing::debug!(target: "generators", "Skipping ({}): --skip-package-json", action);
                        continue;
                    }
                    let mut manifest = PackageJson::load(self.tree)?;
                    if dependencies.apply_to(&mut manifest)? {
                        manifest.save(self.tree)?;
                    }
                    self.outcome.dependencies.merge(dependencies);
                    self.legacy_peer_deps |= *legacy_peer_deps;
                }
                Action::RunGenerator(generator) => {
                    tracing::info!(target: "generators", "Running {} generator", generator);
                    self.host
                        .run(*generator, self.tree)
                        .with_context(|| format!("Failed to run the {generator} generator"))?;
                }
            }
            self.outcome.actions.push(action);
        }
        Ok(())
    }

    fn dev_dependencies(&self) -> Result<std::collections::BTreeSet<String>> {
        PackageJson::load(self.tree)?.dependency_names(DependencyKind::Development)
    }
}

/// Snapshot of both dependency tables, used to decide whether an install is
/// needed.
fn dependency_snapshot(tree: &Tree) -> Result<Option<(Value, Value)>> {
    if !tree.exists(PACKAGE_JSON) {
        return Ok(None);
    }
    let manifest = PackageJson::load(tree)?;
    let table = |kind: DependencyKind| {
        manifest.as_value().get(kind.key()).cloned().unwrap_or(Value::Null)
    };
    Ok(Some((table(DependencyKind::Runtime), table(DependencyKind::Development))))
}

/// Adds Angular support to the workspace in `tree`.
///
/// Changes are staged in `tree` only; call [`Tree::flush`] to write them.
///
/// # Errors
///
/// Malformed workspace configuration or `package.json`, and any error from a
/// sub-generator. The error is returned as soon as it happens and later steps
/// do not run.
pub fn init(
    tree: &mut Tree,
    options: &InitOptions,
    versions: &VersionRegistry,
    host: &mut dyn GeneratorHost,
) -> Result<InitOutcome> {
    let before = dependency_snapshot(tree)?;
    let mut pipeline = Pipeline {
        tree,
        options,
        host,
        outcome: InitOutcome::default(),
        legacy_peer_deps: false,
    };

    let mut workspace = WorkspaceDefaults::load(pipeline.tree)?;
    overlay::apply_defaults(&mut workspace, options)?;
    workspace.save(pipeline.tree)?;

    if options.skip_package_json {
        tracing::debug!(target: "generators", "Skipping post-install script: --skip-package-json");
    } else {
        let mut manifest = PackageJson::load(pipeline.tree)?;
        if overlay::ensure_post_install(&mut manifest)? {
            manifest.save(pipeline.tree)?;
        }
    }

    pipeline.execute(vec![Action::add(overlay::plan_dependencies(versions))])?;

    if options.unit_test_runner != UnitTestRunner::None {
        let dev = pipeline.dev_dependencies()?;
        let actions = overlay::plan_unit_test_tooling(options.unit_test_runner, &dev, versions);
        pipeline.execute(actions)?;
    }

    if options.e2e_test_runner != E2eTestRunner::None {
        let dev = pipeline.dev_dependencies()?;
        let actions = overlay::plan_e2e_test_tooling(options.e2e_test_runner, &dev, versions);
        pipeline.execute(actions)?;
    }

    if options.skip_format {
        tracing::debug!(target: "generators", "Skipping formatting: --skip-format");
    } else {
        pipeline.outcome.formatted = formatter::format_files(pipeline.tree)?;
    }

    let mut outcome = pipeline.outcome;
    let after = dependency_snapshot(pipeline.tree)?;
    if options.skip_install {
        tracing::debug!(target: "generators", "Skipping install: --skip-install");
    } else if before != after {
        outcome.install = Some(InstallTask {
            legacy_peer_deps: pipeline.legacy_peer_deps,
        });
    }
    Ok(outcome)
}
