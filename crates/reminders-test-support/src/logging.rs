//! Test tracing: installs a `tracing` subscriber that writes through the
//! test harness.

use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber filtered by `RUST_LOG` (default
/// `debug`). Safe to call from every test; only the first call wins.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
