//! File system utilities.
//!
//! Everything nginit writes goes through [`atomic_write`] so an interrupted run
//! never leaves a truncated `package.json` or workspace configuration behind.

pub mod atomic;
pub mod dirs;
pub mod formats;

pub use atomic::atomic_write;
pub use dirs::{ensure_dir, ensure_parent_dir};
pub use formats::to_pretty_json;
