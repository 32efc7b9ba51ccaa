//! Workspace configuration (`workspace.json` or `angular.json`).
//!
//! Only two parts of the document matter to nginit: the per-generator default
//! options and the `cli.defaultCollection` marker. [`WorkspaceDefaults`] gives
//! typed access to those and leaves the rest of the document (projects,
//! targets, unknown keys) exactly as it was.
//!
//! Nx workspaces store generator defaults under `generators`; workspaces that
//! started life as an Angular CLI project may still use `schematics`. An
//! existing `schematics` table is edited in place rather than duplicated.

use std::path::PathBuf;

use anyhow::Result;
use serde_json::{Map, Value};

use crate::constants::WORKSPACE_CONFIG_FILES;
use crate::core::NginitError;
use crate::tree::Tree;

const GENERATORS_KEY: &str = "generators";
const LEGACY_GENERATORS_KEY: &str = "schematics";

/// Finds the workspace configuration file in the tree.
pub fn locate(tree: &Tree) -> Result<PathBuf> {
    WORKSPACE_CONFIG_FILES
        .iter()
        .map(PathBuf::from)
        .find(|candidate| tree.exists(candidate))
        .ok_or_else(|| {
            NginitError::WorkspaceConfigNotFound {
                root: tree.root().display().to_string(),
            }
            .into()
        })
}

/// Typed view over the workspace configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceDefaults {
    path: PathBuf,
    value: Value,
}

impl WorkspaceDefaults {
    /// Wraps a parsed document read from `path`.
    pub fn from_value(path: impl Into<PathBuf>, value: Value) -> Result<Self> {
        let path = path.into();
        if !value.is_object() {
            return Err(NginitError::malformed(path.display().to_string(), "<root>", "an object").into());
        }
        Ok(Self {
            path,
            value,
        })
    }

    /// Locates and loads the workspace configuration.
    pub fn load(tree: &Tree) -> Result<Self> {
        let path = locate(tree)?;
        tracing::debug!(target: "workspace", "Using workspace configuration {}", path.display());
        let value = tree.read_json(&path)?;
        Self::from_value(path, value)
    }

    /// Stages the document back into the tree.
    pub fn save(&self, tree: &mut Tree) -> Result<()> {
        tree.write_json(&self.path, &self.value)
    }

    /// Raw document.
    pub fn as_value(&self) -> &Value {
        &self.value
    }

    fn malformed(&self, key: impl Into<String>, expected: &str) -> anyhow::Error {
        NginitError::malformed(self.path.display().to_string(), key, expected).into()
    }

    fn generators_key(&self) -> &'static str {
        if self.value.get(GENERATORS_KEY).is_none() && self.value.get(LEGACY_GENERATORS_KEY).is_some() {
            LEGACY_GENERATORS_KEY
        } else {
            GENERATORS_KEY
        }
    }

    fn root_mut(&mut self) -> Result<&mut Map<String, Value>> {
        let error = self.malformed("<root>", "an object");
        self.value.as_object_mut().ok_or(error)
    }

    /// Default options registered for `generator`, if any.
    ///
    /// # Errors
    ///
    /// [`NginitError::MalformedConfig`] when the generators table or the
    /// entry itself is not an object.
    pub fn generator_options(&self, generator: &str) -> Result<Option<&Map<String, Value>>> {
        let key = self.generators_key();
        let generators = match self.value.get(key) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Object(map)) => map,
            Some(_) => return Err(self.malformed(key, "an object")),
        };
        match generators.get(generator) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(options)) => Ok(Some(options)),
            Some(_) => Err(self.malformed(format!("{key}.{generator}"), "an options object")),
        }
    }

    /// Default options for `generator`, creating empty records as needed.
    pub fn generator_options_mut(&mut self, generator: &str) -> Result<&mut Map<String, Value>> {
        let key = self.generators_key();
        let table_error = self.malformed(key, "an object");
        let entry_error = self.malformed(format!("{key}.{generator}"), "an options object");

        let generators = self.root_mut()?.entry(key).or_insert_with(|| Value::Object(Map::new()));
        if generators.is_null() {
            *generators = Value::Object(Map::new());
        }
        let generators = generators.as_object_mut().ok_or(table_error)?;

        let options = generators.entry(generator).or_insert_with(|| Value::Object(Map::new()));
        if options.is_null() {
            *options = Value::Object(Map::new());
        }
        options.as_object_mut().ok_or(entry_error)
    }

    /// Current `cli.defaultCollection`.
    pub fn default_collection(&self) -> Result<Option<&str>> {
        let cli = match self.value.get("cli") {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Object(cli)) => cli,
            Some(_) => return Err(self.malformed("cli", "an object")),
        };
        match cli.get("defaultCollection") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(collection)) => Ok(Some(collection.as_str())),
            Some(_) => Err(self.malformed("cli.defaultCollection", "a string")),
        }
    }

    /// Writes `cli.defaultCollection`, creating `cli` when needed.
    pub fn set_default_collection(&mut self, collection: &str) -> Result<()> {
        let cli_error = self.malformed("cli", "an object");
        let cli = self.root_mut()?.entry("cli").or_insert_with(|| Value::Object(Map::new()));
        if cli.is_null() {
            *cli = Value::Object(Map::new());
        }
        cli.as_object_mut()
            .ok_or(cli_error)?
            .insert("defaultCollection".to_string(), Value::String(collection.to_string()));
        Ok(())
    }
}
