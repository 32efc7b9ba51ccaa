//! Cypress workspace initialization.

use anyhow::Result;

use crate::constants::CYPRESS_INTEGRATION_PACKAGE;
use crate::manifest::{DependencyKind, DependencySet};
use crate::overlay::SubGenerator;
use crate::tree::Tree;
use crate::versions::{Pin, VersionRegistry};

pub(super) fn run(tree: &mut Tree, versions: &VersionRegistry) -> Result<()> {
    let mut manifest = super::load_manifest(SubGenerator::Cypress, tree)?;
    let mut changed =
        manifest.remove_dependency(DependencyKind::Runtime, CYPRESS_INTEGRATION_PACKAGE)?;
    let tooling = DependencySet::new()
        .dev(CYPRESS_INTEGRATION_PACKAGE, versions.get(Pin::Nx))
        .dev("cypress", versions.get(Pin::Cypress));
    changed |= tooling.apply_to(&mut manifest)?;
    if changed {
        manifest.save(tree)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::PackageJson;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_cypress_init() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("package.json"),
            r#"{"dependencies":{"@nrwl/cypress":"12.0.0"}}"#,
        )
        .unwrap();
        let mut tree = Tree::new(temp.path());
        run(&mut tree, &VersionRegistry::new()).unwrap();

        let manifest = PackageJson::load(&tree).unwrap();
        assert!(manifest.has_dev_dependency("@nrwl/cypress").unwrap());
        assert!(manifest.has_dev_dependency("cypress").unwrap());
        assert!(manifest.dependency_names(DependencyKind::Runtime).unwrap().is_empty());
    }
}
