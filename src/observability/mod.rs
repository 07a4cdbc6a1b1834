//! Observability for the contacts layer: logging setup and dispatch counters.

pub mod metrics;

pub use metrics::{DispatchMetrics, Timer};

use crate::config::Config;
use tracing_subscriber::EnvFilter;

/// Install a stderr `tracing` subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the configured log level is used.
/// Calling this more than once is harmless.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
