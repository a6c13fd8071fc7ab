//! Subscriber setup for the binary
//!
//! Libraries only emit `tracing` events; installing a subscriber is the
//! binary's job.

use crate::config::SessionConfig;
use crate::error::SpecCheckError;
use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, falling back to the configured directive
#[must_use]
pub fn env_filter(config: &SessionConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
}

/// Install the global subscriber, logging to stderr
///
/// # Errors
/// `SpecCheckError::Telemetry` if a subscriber is already installed.
pub fn init(config: &SessionConfig) -> Result<(), SpecCheckError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = if config.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| SpecCheckError::Telemetry(e.to_string()))
}
