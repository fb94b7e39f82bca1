//! ROSTER Core - Catalog Types
//!
//! Pure data structures shared by every other crate in the workspace:
//! record identity, the dense catalog ID space, errors, and configuration.
//! No I/O lives here.

mod catalog;
mod config;
mod error;
mod record;

pub use catalog::{CatalogIdSpace, Direction};
pub use config::{CatalogConfig, DEFAULT_CATALOG_SIZE, DEFAULT_MAX_CONCURRENT_FETCHES};
pub use error::{ConfigError, ErrorKind, FetchError, RosterError, RosterResult};
pub use record::{Record, RecordId, RecordSummary};
