//! Virtual file tree.
//!
//! Generators never touch the disk directly. They read and write through a
//! [`Tree`], which overlays pending changes on top of the workspace directory:
//! reads see earlier writes, deletes hide files, and nothing reaches the disk
//! until [`Tree::flush`] is called. This is what makes `--dry-run` possible and
//! keeps a failed run from leaving half-written configuration behind.
//!
//! All paths are relative to the tree root.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::Value;

use crate::core::NginitError;
use crate::utils::fs::{atomic_write, to_pretty_json};

/// Kind of a pending change, relative to what is on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// File does not exist on disk yet.
    Create,
    /// File exists on disk with different content.
    Update,
    /// File exists on disk and will be removed.
    Delete,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("CREATE"),
            Self::Update => f.write_str("UPDATE"),
            Self::Delete => f.write_str("DELETE"),
        }
    }
}

/// A pending change reported by [`Tree::changes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Path relative to the tree root.
    pub path: PathBuf,
    /// What flushing will do to the file.
    pub kind: ChangeKind,
}

/// In-memory overlay of file changes over a workspace directory.
#[derive(Debug)]
pub struct Tree {
    root: PathBuf,
    // `None` marks a deletion.
    pending: BTreeMap<PathBuf, Option<Vec<u8>>>,
}

impl Tree {
    /// Creates a tree rooted at `root`. The directory is not read until a
    /// file is requested.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pending: BTreeMap::new(),
        }
    }

    /// Workspace directory backing this tree.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key(path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            bail!("Tree paths must be relative to the workspace root: {}", path.display());
        }
        Ok(path.components().collect())
    }

    /// Reads a file, returning `None` when it does not exist.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<Option<Vec<u8>>> {
        let key = Self::key(path.as_ref())?;
        if let Some(entry) = self.pending.get(&key) {
            return Ok(entry.clone());
        }
        let disk_path = self.root.join(&key);
        if !disk_path.is_file() {
            return Ok(None);
        }
        let bytes = fs::read(&disk_path)
            .with_context(|| format!("Failed to read file: {}", disk_path.display()))?;
        Ok(Some(bytes))
    }

    /// Reads a file as UTF-8 text.
    pub fn read_to_string(&self, path: impl AsRef<Path>) -> Result<Option<String>> {
        let path = path.as_ref();
        match self.read(path)? {
            Some(bytes) => {
                let text = String::from_utf8(bytes)
                    .with_context(|| format!("File is not valid UTF-8: {}", path.display()))?;
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }

    /// Returns true if the file exists in the tree.
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        let Ok(key) = Self::key(path.as_ref()) else {
            return false;
        };
        match self.pending.get(&key) {
            Some(entry) => entry.is_some(),
            None => self.root.join(&key).is_file(),
        }
    }

    /// Stages new content for a file.
    pub fn write(&mut self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) -> Result<()> {
        let key = Self::key(path.as_ref())?;
        tracing::trace!(target: "tree", "write {}", key.display());
        self.pending.insert(key, Some(content.into()));
        Ok(())
    }

    /// Stages a deletion. Deleting a missing file is a no-op.
    pub fn delete(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let key = Self::key(path.as_ref())?;
        tracing::trace!(target: "tree", "delete {}", key.display());
        self.pending.insert(key, None);
        Ok(())
    }

    /// Reads and parses a JSON file.
    ///
    /// # Errors
    ///
    /// Fails when the file is missing or when it is not valid JSON
    /// ([`NginitError::InvalidJson`]).
    pub fn read_json(&self, path: impl AsRef<Path>) -> Result<Value> {
        let path = path.as_ref();
        let text = self
            .read_to_string(path)?
            .with_context(|| format!("File does not exist: {}", path.display()))?;
        serde_json::from_str(&text).map_err(|e| {
            NginitError::InvalidJson {
                file: path.display().to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Serializes `value` with two-space indentation and stages it.
    pub fn write_json(&mut self, path: impl AsRef<Path>, value: &Value) -> Result<()> {
        let text = to_pretty_json(value)?;
        self.write(path, text)
    }

    /// Reads a JSON file, lets `update` modify it, and stages the result.
    ///
    /// Nothing is staged when `update` fails.
    pub fn update_json<F>(&mut self, path: impl AsRef<Path>, update: F) -> Result<()>
    where
        F: FnOnce(&mut Value) -> Result<()>,
    {
        let path = path.as_ref();
        let mut value = self.read_json(path)?;
        update(&mut value)?;
        self.write_json(path, &value)
    }

    /// Pending changes that differ from the disk, sorted by path.
    ///
    /// A write that reproduces the current disk content is not a change, and
    /// deleting a file that never existed is dropped.
    pub fn changes(&self) -> Vec<FileChange> {
        self.pending
            .iter()
            .filter_map(|(path, entry)| {
                let disk_path = self.root.join(path);
                let on_disk = disk_path.is_file();
                let kind = match entry {
                    None if on_disk => ChangeKind::Delete,
                    None => return None,
                    Some(_) if !on_disk => ChangeKind::Create,
                    Some(content) => match fs::read(&disk_path) {
                        Ok(current) if &current == content => return None,
                        _ => ChangeKind::Update,
                    },
                };
                Some(FileChange {
                    path: path.clone(),
                    kind,
                })
            })
            .collect()
    }

    /// Returns true if `path` has a pending change.
    pub fn is_changed(&self, path: impl AsRef<Path>) -> bool {
        let Ok(key) = Self::key(path.as_ref()) else {
            return false;
        };
        self.changes().iter().any(|change| change.path == key)
    }

    /// Writes every pending change to disk and returns the number of files
    /// touched. Pending state is cleared on success.
    pub fn flush(&mut self) -> Result<usize> {
        let changes = self.changes();
        for change in &changes {
            let disk_path = self.root.join(&change.path);
            match self.pending.get(&change.path) {
                Some(Some(content)) => {
                    tracing::debug!(target: "tree", "{} {}", change.kind, change.path.display());
                    atomic_write(&disk_path, content)?;
                }
                _ => {
                    tracing::debug!(target: "tree", "DELETE {}", change.path.display());
                    fs::remove_file(&disk_path).with_context(|| {
                        format!("Failed to delete file: {}", disk_path.display())
                    })?;
                }
            }
        }
        self.pending.clear();
        Ok(changes.len())
    }
}
