use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Installs the process-wide subscriber. `RUST_LOG` overrides the default
/// `info` filter.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .init();
}

/// Debug-level output captured by the test harness. Safe to call from
/// every test.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_target(true)
        .with_test_writer()
        .try_init();
}
