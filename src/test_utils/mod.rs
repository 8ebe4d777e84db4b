//! Test utilities for zint-vendor
//!
//! Helpers shared by unit tests and the integration suite (enabled there via
//! the `test-utils` feature):
//!
//! - [`FixtureArchive`] builds tar / tar.gz archives in memory
//! - [`MemoryFs`] is an in-memory [`PatchFs`](crate::patch::PatchFs)
//! - [`OneShotServer`] answers a single HTTP request on 127.0.0.1
//! - [`StaticArchiveSource`] and [`FailingSource`] stand in for the network
//!
//! # Example
//!
//! ```rust,no_run
//! use zint_vendor::test_utils::{FixtureArchive, StaticArchiveSource};
//!
//! let archive = FixtureArchive::zint("zint-master").tar_gz();
//! let source = StaticArchiveSource::new(archive);
//! ```

pub mod fixtures;
pub mod http;
pub mod memory_fs;
pub mod sources;

pub use fixtures::FixtureArchive;
pub use http::{OneShotServer, http_response};
pub use memory_fs::MemoryFs;
pub use sources::{FailingSource, StaticArchiveSource};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise
/// `RUST_LOG`; with neither, tests run without a subscriber.
///
/// ```bash
/// RUST_LOG=zint_vendor=debug cargo test
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
            .with_ansi(true)
            .try_init();
    });
}
