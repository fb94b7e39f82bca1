//! Configuration types

use serde::{Deserialize, Serialize};

use crate::{CatalogIdSpace, ConfigError, RosterError, RosterResult};

/// Size of the upstream catalog when nothing else is configured.
pub const DEFAULT_CATALOG_SIZE: u32 = 731;

/// Upper bound on in-flight per-ID fetches during bulk listing.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 64;

/// Catalog-level settings consumed by the repository and navigator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Number of IDs in the catalog (`1..=catalog_size`).
    pub catalog_size: u32,
    /// Concurrency limit for `list_all` fan-out.
    pub max_concurrent_fetches: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            catalog_size: DEFAULT_CATALOG_SIZE,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
        }
    }
}

impl CatalogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog_size(mut self, size: u32) -> Self {
        self.catalog_size = size;
        self
    }

    pub fn with_max_concurrent_fetches(mut self, max: usize) -> Self {
        self.max_concurrent_fetches = max;
        self
    }

    /// Validate the configuration.
    ///
    /// Validates:
    /// - catalog_size > 0
    /// - max_concurrent_fetches > 0
    pub fn validate(&self) -> RosterResult<()> {
        if self.catalog_size == 0 {
            return Err(RosterError::Config(ConfigError::InvalidValue {
                field: "catalog_size".to_string(),
                value: self.catalog_size.to_string(),
                reason: "catalog_size must be greater than 0".to_string(),
            }));
        }

        if self.max_concurrent_fetches == 0 {
            return Err(RosterError::Config(ConfigError::InvalidValue {
                field: "max_concurrent_fetches".to_string(),
                value: self.max_concurrent_fetches.to_string(),
                reason: "max_concurrent_fetches must be greater than 0".to_string(),
            }));
        }

        Ok(())
    }

    /// The ID space described by this configuration.
    pub fn id_space(&self) -> RosterResult<CatalogIdSpace> {
        self.validate()?;
        CatalogIdSpace::new(self.catalog_size)
    }
}
