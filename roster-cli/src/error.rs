//! Error types for the CLI.

use std::path::PathBuf;

use roster_core::{ErrorKind, RosterError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read config file {}: {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to initialize logging: {0}")]
    Telemetry(String),
}

impl CliError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ReadConfig { .. } | Self::Parse(_) | Self::Telemetry(_) => 78,
            Self::Roster(e) => match e.kind() {
                ErrorKind::Unavailable => 3,
                ErrorKind::SearchMiss => 4,
                ErrorKind::Misconfigured => 78,
            },
            Self::Json(_) => 1,
        }
    }
}
