//! Test utilities for solution-templates
//!
//! Shared JSON fixtures and a logging initializer. Available to the crate's
//! own tests and, through the `test-utils` feature, to the integration suite.
//!
//! # Example
//!
//! ```rust,no_run
//! use solution_templates::test_utils::{JsonFixture, init_test_logging};
//!
//! init_test_logging(None);
//! let temp = tempfile::tempdir().unwrap();
//! let path = JsonFixture::cyclic_solution().write_to(temp.path()).unwrap();
//! assert!(path.exists());
//! ```

pub mod fixtures;

pub use fixtures::{JsonFixture, MAP_ID, SERVICE_ID};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests, once per process.
///
/// Uses `level` when given, otherwise `RUST_LOG`; with neither, logging stays
/// off.
///
/// ```bash
/// RUST_LOG=solution_templates=trace cargo test
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
            .try_init();
    });
}
