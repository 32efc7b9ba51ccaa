//! Integration test suite for nginit
//!
//! Drives the compiled `nginit` binary against temporary workspaces.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **init**: end-to-end `nginit init` runs, flags and dry runs
//! - **errors**: malformed input and user-facing error output
//! - **install**: package manager invocation after a run (unix only)

mod common;
mod errors;
mod init;
#[cfg(unix)]
mod install;
