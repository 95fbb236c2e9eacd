//! Structured logging setup
//!
//! One global `tracing` subscriber, filtered by `RUST_LOG` when set and by
//! the configured filter otherwise.

use tracing_subscriber::EnvFilter;

/// Default filter when neither `RUST_LOG` nor the config names one
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Builds the filter: `RUST_LOG` wins over `configured`.
///
/// An unparsable `configured` directive falls back to `DEFAULT_LOG_FILTER`.
pub fn env_filter(configured: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Installs the global subscriber.
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init_logging(configured: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(configured))
        .with_target(false)
        .try_init();
}
