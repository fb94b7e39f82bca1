//! Connection settings for the remote catalog.

use roster_core::{ConfigError, RosterError, RosterResult};

/// Public superhero catalog this workspace was built against.
pub const DEFAULT_BASE_URL: &str = "https://akabab.github.io/superhero-api/api";

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Base URL; per-ID records live at `{base}/id/{id}.json`, the whole
    /// catalog at `{base}/all.json`.
    pub base_url: String,
    pub request_timeout_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl SourceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    pub fn validate(&self) -> RosterResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(RosterError::Config(ConfigError::MissingRequired {
                field: "base_url".to_string(),
            }));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(RosterError::Config(ConfigError::InvalidValue {
                field: "base_url".to_string(),
                value: self.base_url.clone(),
                reason: "base_url must be an http(s) URL".to_string(),
            }));
        }
        if self.request_timeout_ms == 0 {
            return Err(RosterError::Config(ConfigError::InvalidValue {
                field: "request_timeout_ms".to_string(),
                value: "0".to_string(),
                reason: "request_timeout_ms must be > 0".to_string(),
            }));
        }
        Ok(())
    }
}
