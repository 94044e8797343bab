//! Tracing subscriber setup
//!
//! `RUST_LOG` wins over the configured level when it is set, so an operator
//! can raise verbosity for a single run without touching config files.

use tracing_subscriber::EnvFilter;
use ua_shared::{LogFormat, LoggingConfig};

use crate::InfrastructureError;

/// Builds the filter from `RUST_LOG`, falling back to `config.level`
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, InfrastructureError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| {
        InfrastructureError::Config(format!("Invalid log level '{}': {}", config.level, e))
    })
}

/// Installs the global subscriber in the configured format
///
/// Fails if a global subscriber was already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), InfrastructureError> {
    let filter = env_filter(config)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    result.map_err(|e| InfrastructureError::Config(format!("Failed to install tracing subscriber: {}", e)))
}
