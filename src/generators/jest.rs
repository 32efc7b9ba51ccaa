//! Jest workspace initialization.

use anyhow::Result;

use crate::constants::JEST_INTEGRATION_PACKAGE;
use crate::manifest::{DependencyKind, DependencySet};
use crate::overlay::SubGenerator;
use crate::tree::Tree;
use crate::versions::{Pin, VersionRegistry};

const JEST_CONFIG: &str = "jest.config.js";
const JEST_PRESET: &str = "jest.preset.js";

const JEST_CONFIG_CONTENT: &str = "module.exports = { projects: [] };\n";
const JEST_PRESET_CONTENT: &str = "const nxPreset = require('@nrwl/jest/preset');\n\nmodule.exports = { ...nxPreset };\n";

pub(super) fn run(tree: &mut Tree, versions: &VersionRegistry) -> Result<()> {
    if !tree.exists(JEST_CONFIG) {
        tree.write(JEST_CONFIG, JEST_CONFIG_CONTENT)?;
    }
    if !tree.exists(JEST_PRESET) {
        tree.write(JEST_PRESET, JEST_PRESET_CONTENT)?;
    }

    let mut manifest = super::load_manifest(SubGenerator::Jest, tree)?;
    let mut changed = manifest.remove_dependency(DependencyKind::Runtime, JEST_INTEGRATION_PACKAGE)?;
    let tooling = DependencySet::new()
        .dev(JEST_INTEGRATION_PACKAGE, versions.get(Pin::Nx))
        .dev("jest", versions.get(Pin::Jest))
        .dev("@types/jest", versions.get(Pin::JestTypes))
        .dev("ts-jest", versions.get(Pin::TsJest));
    changed |= tooling.apply_to(&mut manifest)?;
    if changed {
        manifest.save(tree)?;
    }
    Ok(())
}
