//! Logging configuration for taxi-glance.
//!
//! Logs go to stderr so headless stdout stays clean for piping.

use tracing_subscriber::EnvFilter;

/// Filter used when RUST_LOG is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Builds the log filter from RUST_LOG, falling back to [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initializes logging to stderr.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}
