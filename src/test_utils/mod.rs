//! Test utilities for nginit
//!
//! Temporary workspaces seeded with Nx-style fixtures, a recording
//! [`GeneratorHost`](crate::generators::GeneratorHost) and logging setup.
//!
//! ```rust,no_run
//! use nginit_cli::test_utils::TestWorkspace;
//!
//! let ws = TestWorkspace::nx().unwrap();
//! assert!(ws.path().join("package.json").exists());
//! ```

pub mod environment;
pub mod fixtures;
pub mod host;

pub use environment::TestWorkspace;
pub use fixtures::JsonFixture;
pub use host::RecordingHost;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`. With neither, logging stays
/// off.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
