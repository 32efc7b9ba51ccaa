//! Test fixtures for workspace files
//!
//! Sample `package.json` and `workspace.json` documents shaped like a fresh Nx
//! workspace without Angular support.

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};

/// A JSON file written into a test workspace.
#[derive(Clone, Debug)]
pub struct JsonFixture {
    /// File name relative to the workspace root
    pub name: String,
    /// Document
    pub content: Value,
}

impl JsonFixture {
    /// `package.json` of a fresh Nx workspace
    pub fn package_json() -> Self {
        Self {
            name: "package.json".to_string(),
            content: json!({
                "name": "acme",
                "version": "0.0.0",
                "license": "MIT",
                "scripts": {
                    "build": "nx build",
                    "test": "nx test"
                },
                "private": true,
                "dependencies": {},
                "devDependencies": {
                    "@nrwl/cli": "12.3.4",
                    "@nrwl/tao": "12.3.4",
                    "@nrwl/workspace": "12.3.4",
                    "typescript": "~4.2.4"
                }
            }),
        }
    }

    /// `package.json` with additional dev dependencies
    pub fn package_json_with_dev_dependencies(extra: &[(&str, &str)]) -> Self {
        let mut fixture = Self::package_json();
        if let Some(dev) = fixture.content["devDependencies"].as_object_mut() {
            for (name, version) in extra {
                dev.insert((*name).to_string(), Value::from(*version));
            }
        }
        fixture
    }

    /// `workspace.json` of a fresh Nx workspace
    pub fn workspace_json() -> Self {
        Self {
            name: "workspace.json".to_string(),
            content: json!({
                "version": 2,
                "projects": {},
                "cli": {
                    "defaultCollection": "@nrwl/workspace"
                }
            }),
        }
    }

    /// Writes the fixture compactly, the way hand-edited files often look
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.name);
        let text = serde_json::to_string(&self.content)?;
        fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}
