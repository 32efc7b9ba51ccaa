use std::collections::BTreeMap;

use anyhow::Result;

use super::{DependencyKind, PackageJson};

/// Runtime and development dependencies to add to a manifest.
///
/// Both tables are ordered by package name. Inserting a package that is
/// already present replaces its version, so merging is last-write-wins and
/// merging the same set twice changes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    /// Entries for `dependencies`.
    pub runtime: BTreeMap<String, String>,
    /// Entries for `devDependencies`.
    pub development: BTreeMap<String, String>,
}

impl DependencySet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a runtime dependency.
    #[must_use]
    pub fn runtime(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.runtime.insert(name.into(), version.into());
        self
    }

    /// Adds a development dependency.
    #[must_use]
    pub fn dev(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.development.insert(name.into(), version.into());
        self
    }

    /// Merges `other` into `self`; entries from `other` win.
    pub fn merge(&mut self, other: &Self) {
        for (name, version) in &other.runtime {
            self.runtime.insert(name.clone(), version.clone());
        }
        for (name, version) in &other.development {
            self.development.insert(name.clone(), version.clone());
        }
    }

    /// Returns true if neither table has entries.
    pub fn is_empty(&self) -> bool {
        self.runtime.is_empty() && self.development.is_empty()
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.runtime.len() + self.development.len()
    }

    /// Writes every entry into `manifest` and sorts the touched tables.
    ///
    /// The planned version replaces whatever the manifest had. Returns true
    /// if any entry was added or changed.
    pub fn apply_to(&self, manifest: &mut PackageJson) -> Result<bool> {
        let mut changed = false;
        for (kind, table) in [
            (DependencyKind::Runtime, &self.runtime),
            (DependencyKind::Development, &self.development),
        ] {
            if table.is_empty() {
                continue;
            }
            for (name, version) in table {
                if manifest.set_dependency(kind, name, version)? {
                    tracing::debug!(target: "manifest", "{} {}@{}", kind.key(), name, version);
                    changed = true;
                }
            }
            manifest.sort_dependencies(kind)?;
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_apply_inserts_and_sorts() {
        let mut manifest = PackageJson::from_value(json!({
            "name": "ws",
            "dependencies": {"zone.js": "~0.10.0", "@nrwl/workspace": "12.3.4"}
        }))
        .unwrap();
        let set = DependencySet::new()
            .runtime("zone.js", "~0.11.4")
            .runtime("@angular/core", "^12.0.0")
            .dev("@angular/compiler-cli", "^12.0.0");

        assert!(set.apply_to(&mut manifest).unwrap());

        let deps = manifest.as_value()["dependencies"].as_object().unwrap();
        let names: Vec<_> = deps.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["@angular/core", "@nrwl/workspace", "zone.js"]);
        assert_eq!(deps["zone.js"], "~0.11.4");
        assert_eq!(manifest.as_value()["devDependencies"]["@angular/compiler-cli"], "^12.0.0");

        assert!(!set.apply_to(&mut manifest).unwrap());
    }

    #[test]
    fn test_empty_set_leaves_manifest_alone() {
        let mut manifest = PackageJson::from_value(json!({"name": "ws"})).unwrap();
        assert!(!DependencySet::new().apply_to(&mut manifest).unwrap());
        assert_eq!(manifest.as_value(), &json!({"name": "ws"}));
    }

    fn table() -> impl Strategy<Value = BTreeMap<String, String>> {
        prop::collection::btree_map("[a-e]{1,3}", "[0-9]\\.[0-9]", 0..6)
    }

    fn dependency_set() -> impl Strategy<Value = DependencySet> {
        (table(), table()).prop_map(|(runtime, development)| DependencySet {
            runtime,
            development,
        })
    }

    proptest! {
        #[test]
        fn merge_is_idempotent(a in dependency_set(), b in dependency_set()) {
            let mut once = a.clone();
            once.merge(&b);
            let mut twice = once.clone();
            twice.merge(&b);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn merge_is_last_write_wins(a in dependency_set(), b in dependency_set()) {
            let mut merged = a.clone();
            merged.merge(&b);
            for (name, version) in &b.runtime {
                prop_assert_eq!(merged.runtime.get(name), Some(version));
            }
            for (name, version) in &b.development {
                prop_assert_eq!(merged.development.get(name), Some(version));
            }
            for name in a.runtime.keys() {
                prop_assert!(merged.runtime.contains_key(name));
            }
        }
    }
}
