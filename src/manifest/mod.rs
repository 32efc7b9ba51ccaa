//! The workspace package manifest (`package.json`).
//!
//! [`PackageJson`] is a typed view over the raw JSON document. It keeps the
//! original [`Value`] so fields nginit does not know about, and the order of
//! every key, survive a load/save round trip untouched. Accessors validate the
//! shape of the keys they touch and report [`NginitError::MalformedConfig`]
//! instead of silently overwriting something unexpected.
//!
//! Dependency edits go through [`DependencySet`].

mod dependency_set;

pub use dependency_set::DependencySet;

use std::collections::BTreeSet;

use anyhow::Result;
use serde_json::{Map, Value};

use crate::constants::PACKAGE_JSON;
use crate::core::NginitError;
use crate::tree::Tree;

/// One of the two dependency tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    /// `dependencies`
    Runtime,
    /// `devDependencies`
    Development,
}

impl DependencyKind {
    /// JSON key of the table.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Runtime => "dependencies",
            Self::Development => "devDependencies",
        }
    }
}

/// Typed view over `package.json`.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageJson {
    value: Value,
}

impl PackageJson {
    /// Wraps a parsed document. The root must be a JSON object.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(NginitError::malformed(PACKAGE_JSON, "<root>", "an object").into());
        }
        Ok(Self {
            value,
        })
    }

    /// Loads `package.json` from the tree.
    ///
    /// # Errors
    ///
    /// [`NginitError::ManifestNotFound`] when the file is missing,
    /// [`NginitError::InvalidJson`] when it does not parse.
    pub fn load(tree: &Tree) -> Result<Self> {
        if !tree.exists(PACKAGE_JSON) {
            return Err(NginitError::ManifestNotFound {
                path: tree.root().join(PACKAGE_JSON).display().to_string(),
            }
            .into());
        }
        Self::from_value(tree.read_json(PACKAGE_JSON)?)
    }

    /// Stages the document in the tree.
    pub fn save(&self, tree: &mut Tree) -> Result<()> {
        tree.write_json(PACKAGE_JSON, &self.value)
    }

    /// Raw document.
    pub fn as_value(&self) -> &Value {
        &self.value
    }

    /// Returns the object stored under `key`, creating it when absent.
    fn object_mut(&mut self, key: &str) -> Result<&mut Map<String, Value>> {
        let root = self
            .value
            .as_object_mut()
            .ok_or_else(|| NginitError::malformed(PACKAGE_JSON, "<root>", "an object"))?;
        let entry = root.entry(key.to_string()).or_insert_with(|| Value::Object(Map::new()));
        if entry.is_null() {
            *entry = Value::Object(Map::new());
        }
        match entry {
            Value::Object(map) => Ok(map),
            _ => Err(NginitError::malformed(PACKAGE_JSON, key, "an object").into()),
        }
    }

    fn object(&self, key: &str) -> Result<Option<&Map<String, Value>>> {
        match self.value.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(_) => Err(NginitError::malformed(PACKAGE_JSON, key, "an object").into()),
        }
    }

    /// Current `scripts.postinstall`, if any.
    pub fn postinstall(&self) -> Result<Option<&str>> {
        let Some(scripts) = self.object("scripts")? else {
            return Ok(None);
        };
        match scripts.get("postinstall") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(script)) => Ok(Some(script.as_str())),
            Some(_) => Err(NginitError::malformed(PACKAGE_JSON, "scripts.postinstall", "a string").into()),
        }
    }

    /// Sets `scripts.postinstall`, creating `scripts` when needed.
    pub fn set_postinstall(&mut self, script: impl Into<String>) -> Result<()> {
        self.object_mut("scripts")?.insert("postinstall".to_string(), Value::String(script.into()));
        Ok(())
    }

    /// Package names in one dependency table.
    pub fn dependency_names(&self, kind: DependencyKind) -> Result<BTreeSet<String>> {
        Ok(self.object(kind.key())?.map(|table| table.keys().cloned().collect()).unwrap_or_default())
    }

    /// Version requirement of `name` in one dependency table.
    pub fn dependency_version(&self, kind: DependencyKind, name: &str) -> Result<Option<&str>> {
        let Some(table) = self.object(kind.key())? else {
            return Ok(None);
        };
        match table.get(name) {
            None => Ok(None),
            Some(Value::String(version)) => Ok(Some(version.as_str())),
            Some(_) => Err(NginitError::malformed(
                PACKAGE_JSON,
                format!("{}.{name}", kind.key()),
                "a version string",
            )
            .into()),
        }
    }

    /// Returns true if `name` is listed in `devDependencies`.
    pub fn has_dev_dependency(&self, name: &str) -> Result<bool> {
        Ok(self.dependency_version(DependencyKind::Development, name)?.is_some())
    }

    /// Inserts or replaces a dependency. Returns true if the table changed.
    pub fn set_dependency(&mut self, kind: DependencyKind, name: &str, version: &str) -> Result<bool> {
        let table = self.object_mut(kind.key())?;
        let changed = table.get(name).and_then(Value::as_str) != Some(version);
        if changed {
            table.insert(name.to_string(), Value::String(version.to_string()));
        }
        Ok(changed)
    }

    /// Removes a dependency. Returns true if it was present.
    pub fn remove_dependency(&mut self, kind: DependencyKind, name: &str) -> Result<bool> {
        if self.object(kind.key())?.is_none() {
            return Ok(false);
        }
        Ok(self.object_mut(kind.key())?.shift_remove(name).is_some())
    }

    /// Sorts a dependency table by package name, if present.
    pub fn sort_dependencies(&mut self, kind: DependencyKind) -> Result<()> {
        if self.object(kind.key())?.is_none() {
            return Ok(());
        }
        let table = self.object_mut(kind.key())?;
        let mut entries: Vec<(String, Value)> = std::mem::take(table).into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        *table = entries.into_iter().collect();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn manifest(value: Value) -> PackageJson {
        PackageJson::from_value(value).unwrap()
    }

    #[test]
    fn test_load_missing_manifest() {
        let temp = TempDir::new().unwrap();
        let tree = Tree::new(temp.path());
        let err = PackageJson::load(&tree).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NginitError>(),
            Some(NginitError::ManifestNotFound { .. })
        ));
    }

    #[test]
    fn test_round_trip_keeps_unknown_fields_and_order() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("package.json"),
            r#"{"name":"ws","private":true,"workspaces":["apps/*"],"license":"MIT"}"#,
        )
        .unwrap();
        let mut tree = Tree::new(temp.path());
        let mut pkg = PackageJson::load(&tree).unwrap();
        pkg.set_postinstall("echo hi").unwrap();
        pkg.save(&mut tree).unwrap();

        let text = tree.read_to_string("package.json").unwrap().unwrap();
        let name = text.find("\"name\"").unwrap();
        let license = text.find("\"license\"").unwrap();
        let scripts = text.find("\"scripts\"").unwrap();
        assert!(name < license && license < scripts);
        assert!(text.contains("\"workspaces\""));
    }

    #[test]
    fn test_non_object_root_rejected() {
        assert!(PackageJson::from_value(json!([1, 2])).is_err());
    }

    #[test]
    fn test_scripts_must_be_object() {
        let mut pkg = manifest(json!({"scripts": "oops"}));
        assert!(pkg.postinstall().is_err());
        let err = pkg.set_postinstall("ngcc").unwrap_err();
        assert!(err.to_string().contains("scripts"));
    }

    #[test]
    fn test_dependency_edits() {
        let mut pkg = manifest(json!({"devDependencies": {"zeta": "1", "alpha": "2"}}));
        assert!(pkg.has_dev_dependency("zeta").unwrap());
        assert!(!pkg.has_dev_dependency("beta").unwrap());

        assert!(pkg.set_dependency(DependencyKind::Development, "beta", "3").unwrap());
        assert!(!pkg.set_dependency(DependencyKind::Development, "beta", "3").unwrap());
        pkg.sort_dependencies(DependencyKind::Development).unwrap();
        let names: Vec<_> =
            pkg.as_value()["devDependencies"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(names, vec!["alpha", "beta", "zeta"]);

        assert!(pkg.remove_dependency(DependencyKind::Development, "alpha").unwrap());
        assert!(!pkg.remove_dependency(DependencyKind::Runtime, "alpha").unwrap());
        assert!(pkg.as_value().get("dependencies").is_none());
    }

    #[test]
    fn test_non_string_version_is_malformed() {
        let pkg = manifest(json!({"dependencies": {"rxjs": 6}}));
        let err = pkg.dependency_version(DependencyKind::Runtime, "rxjs").unwrap_err();
        assert!(err.to_string().contains("dependencies.rxjs"));
    }
}
