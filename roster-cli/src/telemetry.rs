//! Tracing subscriber setup.
//!
//! Logs go to stderr so stdout carries only command output.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::RosterConfig;
use crate::error::CliError;

/// `RUST_LOG` wins over the configured filter.
pub fn env_filter(config: &RosterConfig) -> Result<EnvFilter, CliError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.log_filter).map_err(|e| {
            CliError::Telemetry(format!("invalid log_filter {:?}: {}", config.log_filter, e))
        }),
    }
}

/// Install the global subscriber. Call once, before any command runs.
pub fn init_tracing(config: &RosterConfig) -> Result<(), CliError> {
    let filter = env_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    result.map_err(|e| CliError::Telemetry(e.to_string()))?;

    tracing::debug!(
        catalog_size = config.catalog_size,
        base_url = %config.base_url,
        json = config.log_json,
        "Logging initialized"
    );
    Ok(())
}
