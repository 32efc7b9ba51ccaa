//! Temporary workspace directories for tests

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use super::fixtures::JsonFixture;
use crate::tree::Tree;

/// A workspace in a temporary directory, removed on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Empty directory
    pub fn empty() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new().context("Failed to create temp dir")?,
        })
    }

    /// Fresh Nx workspace with `package.json` and `workspace.json`
    pub fn nx() -> Result<Self> {
        Self::nx_with_dev_dependencies(&[])
    }

    /// Nx workspace whose `package.json` also lists `extra` dev dependencies
    pub fn nx_with_dev_dependencies(extra: &[(&str, &str)]) -> Result<Self> {
        let ws = Self::empty()?;
        JsonFixture::package_json_with_dev_dependencies(extra).write_to(ws.path())?;
        JsonFixture::workspace_json().write_to(ws.path())?;
        Ok(ws)
    }

    /// Workspace root
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Fresh tree over the workspace
    pub fn tree(&self) -> Tree {
        Tree::new(self.path())
    }

    /// Writes a file, panicking on failure
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, content).expect("write test file");
    }

    /// Reads a file from disk, panicking if it is missing
    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path().join(relative)).expect("read test file")
    }

    /// Reads and parses a JSON file from disk
    pub fn read_json(&self, relative: &str) -> Value {
        serde_json::from_str(&self.read(relative)).expect("parse test JSON")
    }
}
