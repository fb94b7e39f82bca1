//! Configuration loading for the roster CLI.
//!
//! Every field is optional in the file; missing fields take the defaults
//! below. Unknown fields are rejected.

use std::path::{Path, PathBuf};
use std::time::Duration;

use roster_core::{
    CatalogConfig, ConfigError, RosterError, RosterResult, DEFAULT_CATALOG_SIZE,
    DEFAULT_MAX_CONCURRENT_FETCHES,
};
use roster_source::{SourceConfig, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_MS};
use roster_storage::CacheConfig;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

pub const CONFIG_ENV_VAR: &str = "ROSTER_CONFIG";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
pub const DEFAULT_LOG_FILTER: &str = "warn,roster_catalog=info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RosterConfig {
    pub base_url: String,
    pub catalog_size: u32,
    pub cache_ttl_secs: u64,
    pub max_entries: Option<usize>,
    pub max_concurrent_fetches: usize,
    pub request_timeout_ms: u64,
    /// Used when `RUST_LOG` is unset.
    pub log_filter: String,
    pub log_json: bool,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            catalog_size: DEFAULT_CATALOG_SIZE,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            max_entries: None,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_json: false,
        }
    }
}

impl RosterConfig {
    /// Load from `explicit`, else from `$ROSTER_CONFIG`, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CliError> {
        let path = resolve_path(explicit, std::env::var(CONFIG_ENV_VAR).ok());
        let config = match path {
            Some(path) => Self::from_path(&path)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, CliError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, CliError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> RosterResult<()> {
        if self.cache_ttl_secs == 0 {
            return Err(RosterError::Config(ConfigError::InvalidValue {
                field: "cache_ttl_secs".to_string(),
                value: "0".to_string(),
                reason: "must be > 0".to_string(),
            }));
        }
        if self.log_filter.trim().is_empty() {
            return Err(RosterError::Config(ConfigError::InvalidValue {
                field: "log_filter".to_string(),
                value: self.log_filter.clone(),
                reason: "must not be empty".to_string(),
            }));
        }
        self.catalog_config().validate()?;
        self.cache_config().validate()?;
        self.source_config().validate()
    }

    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig::new()
            .with_catalog_size(self.catalog_size)
            .with_max_concurrent_fetches(self.max_concurrent_fetches)
    }

    pub fn cache_config(&self) -> CacheConfig {
        let config = CacheConfig::new().with_ttl(Duration::from_secs(self.cache_ttl_secs));
        match self.max_entries {
            Some(max) => config.with_max_entries(max),
            None => config,
        }
    }

    pub fn source_config(&self) -> SourceConfig {
        SourceConfig::new(self.base_url.clone()).with_timeout_ms(self.request_timeout_ms)
    }
}

fn resolve_path(explicit: Option<&Path>, env_value: Option<String>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| env_value.filter(|v| !v.trim().is_empty()).map(PathBuf::from))
}
