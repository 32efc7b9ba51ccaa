//! JSON formatting matching the JavaScript tooling.
//!
//! Workspace JSON files are written with two-space indentation and a trailing
//! newline, the way `JSON.stringify(value, null, 2)` plus an editor would
//! leave them. Keeping that stable avoids whole-file diffs when only one key
//! changed.

use anyhow::{Context, Result};
use serde_json::Value;

/// Serializes a JSON value with two-space indentation and a trailing newline.
///
/// # Examples
///
/// ```rust
/// use nginit_cli::utils::fs::to_pretty_json;
/// use serde_json::json;
///
/// let text = to_pretty_json(&json!({ "name": "demo" })).unwrap();
/// assert_eq!(text, "{\n  \"name\": \"demo\"\n}\n");
/// ```
pub fn to_pretty_json(value: &Value) -> Result<String> {
    let mut text = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
    text.push('\n');
    Ok(text)
}
