//! Atomic file write operations using temp-and-rename strategy.
//!
//! This module provides safe, atomic file writing that prevents a half-written
//! `package.json` if the process is interrupted while the tree is flushed.

use crate::utils::fs::dirs::ensure_parent_dir;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Atomically writes bytes to a file using a write-then-rename strategy.
///
/// 1. Writes content to a sibling temporary file (`<name>.tmp`)
/// 2. Syncs the temporary file to disk
/// 3. Renames the temporary file over the target path
///
/// Parent directories are created when missing. On Unix the permissions of an
/// existing target are carried over to the replacement.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    use std::io::Write;

    ensure_parent_dir(path)?;

    let temp_path = temp_path_for(path);

    {
        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

        file.write_all(content)
            .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;

        file.sync_all().with_context(|| "Failed to sync file to disk")?;
    }

    #[cfg(unix)]
    {
        if let Ok(metadata) = fs::metadata(path) {
            fs::set_permissions(&temp_path, metadata.permissions()).with_context(|| {
                format!("Failed to copy permissions onto temp file: {}", temp_path.display())
            })?;
        }
    }

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
