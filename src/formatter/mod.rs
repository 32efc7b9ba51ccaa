//! Formatting pass over the files a run changed.
//!
//! JSON files are normalized to two-space indentation with a trailing
//! newline, matching what the JavaScript tooling in the workspace produces.
//! The workspace configuration additionally gets its `projects` table sorted
//! by name. Other text files only get a trailing newline. Files the run did
//! not touch are never reformatted.

use std::path::Path;

use anyhow::Result;
use serde_json::{Map, Value};

use crate::constants::WORKSPACE_CONFIG_FILES;
use crate::core::NginitError;
use crate::tree::{ChangeKind, Tree};
use crate::utils::fs::to_pretty_json;

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn is_workspace_config(path: &Path) -> bool {
    WORKSPACE_CONFIG_FILES.iter().any(|name| path == Path::new(name))
}

/// Sorts the `projects` table of a workspace configuration by project name.
fn sort_projects(document: &mut Value) {
    let Some(projects) = document.get_mut("projects").and_then(Value::as_object_mut) else {
        return;
    };
    let mut entries: Vec<(String, Value)> = std::mem::take(projects).into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    *projects = entries.into_iter().collect::<Map<String, Value>>();
}

/// Formats every pending created or updated file in `tree` and returns the
/// number of files whose content changed.
///
/// # Errors
///
/// [`NginitError::InvalidJson`] when a pending `*.json` file does not parse.
pub fn format_files(tree: &mut Tree) -> Result<usize> {
    let mut formatted = 0;
    for change in tree.changes() {
        if change.kind == ChangeKind::Delete {
            continue;
        }
        let Some(content) = tree.read_to_string(&change.path)? else {
            continue;
        };
        let normalized = if is_json(&change.path) {
            let mut value: Value =
                serde_json::from_str(&content).map_err(|e| NginitError::InvalidJson {
                    file: change.path.display().to_string(),
                    reason: e.to_string(),
                })?;
            if is_workspace_config(&change.path) {
                sort_projects(&mut value);
            }
            to_pretty_json(&value)?
        } else if content.is_empty() || content.ends_with('\n') {
            continue;
        } else {
            format!("{content}\n")
        };
        if normalized != content {
            tracing::debug!(target: "formatter", "Formatted {}", change.path.display());
            tree.write(&change.path, normalized)?;
            formatted += 1;
        }
    }
    Ok(formatted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_formats_only_changed_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("untouched.json"), "{\"a\":1}").unwrap();
        let mut tree = Tree::new(temp.path());
        tree.write("changed.json", "{\"b\":   [1,2]}").unwrap();
        tree.write("notes.txt", "no newline").unwrap();

        assert_eq!(format_files(&mut tree).unwrap(), 2);
        assert_eq!(
            tree.read_to_string("changed.json").unwrap().unwrap(),
            "{\n  \"b\": [\n    1,\n    2\n  ]\n}\n"
        );
        assert_eq!(tree.read_to_string("notes.txt").unwrap().unwrap(), "no newline\n");
        assert_eq!(tree.read_to_string("untouched.json").unwrap().unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_already_formatted_is_stable() {
        let temp = TempDir::new().unwrap();
        let mut tree = Tree::new(temp.path());
        tree.write("ok.json", "{\n  \"a\": 1\n}\n").unwrap();
        assert_eq!(format_files(&mut tree).unwrap(), 0);
    }

    #[test]
    fn test_sorts_workspace_projects() {
        let temp = TempDir::new().unwrap();
        let mut tree = Tree::new(temp.path());
        tree.write_json(
            "workspace.json",
            &serde_json::json!({"version": 2, "projects": {"web": "apps/web", "api": "apps/api"}}),
        )
        .unwrap();
        tree.write_json("apps/web/project.json", &serde_json::json!({"projects": {"b": 1, "a": 2}}))
            .unwrap();

        assert_eq!(format_files(&mut tree).unwrap(), 1);
        let workspace = tree.read_json("workspace.json").unwrap();
        let names: Vec<&str> =
            workspace["projects"].as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(names, ["api", "web"]);
        assert_eq!(workspace["version"], 2);
    }

    #[test]
    fn test_invalid_json_is_error() {
        let temp = TempDir::new().unwrap();
        let mut tree = Tree::new(temp.path());
        tree.write("broken.json", "{").unwrap();
        let err = format_files(&mut tree).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NginitError>(),
            Some(NginitError::InvalidJson { .. })
        ));
    }
}
