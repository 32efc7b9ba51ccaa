//! Cross-platform utilities and helpers.
//!
//! - [`fs`] - Atomic writes, directory creation and JSON formatting

pub mod fs;

pub use fs::{atomic_write, ensure_dir, to_pretty_json};
