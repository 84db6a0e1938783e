//! Test utilities for vcs-resolver
//!
//! Available to the crate's own tests and, through the `test-utils` feature, to
//! the integration suite:
//!
//! - [`StaticLister`] - an in-memory [`RefLister`](crate::resolver::RefLister)
//!   that counts how often it is asked
//! - [`TestGit`] - builds real repositories on disk for `git ls-remote`
//! - [`init_test_logging`] - routes `tracing` output through the test harness
//!
//! # Example
//!
//! ```rust,no_run
//! use vcs_resolver::test_utils::{StaticLister, init_test_logging};
//!
//! init_test_logging(None);
//! let lister = StaticLister::new([("abc123", "refs/tags/v1.0.0")]);
//! assert_eq!(lister.calls(), 0);
//! ```

pub mod git_helper;
pub mod lister;

pub use git_helper::TestGit;
pub use lister::StaticLister;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. With `Some(level)` that level is used;
/// with `None` the `RUST_LOG` environment variable decides, and nothing is
/// logged if it is unset.
///
/// ```bash
/// RUST_LOG=resolver=trace,git=debug cargo test
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
