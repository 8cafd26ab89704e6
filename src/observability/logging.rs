//! # Structured Logging
//!
//! Tracing subscriber setup. Log lines carry structured fields (`listener`,
//! `extension`, `proxy`) so fail-soft skips during a generation pass can be
//! correlated with the resource that caused them.

use crate::config::ObservabilityConfig;
use crate::errors::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// The filter directive comes from `ObservabilityConfig::log_level`. Fails if
/// a global subscriber is already installed.
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.log_level).map_err(|e| {
        Error::config(format!("Invalid log filter '{}': {}", config.log_level, e))
    })?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| Error::internal(format!("Failed to install tracing subscriber: {}", e)))
}
