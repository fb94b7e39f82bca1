//! ROSTER Catalog
//!
//! Paginated, cached, cyclic access to a fixed-size remote catalog:
//!
//! - [`RecordRepository`]: per-ID reads through the TTL cache, case-insensitive
//!   name lookup, and ordered bulk listing
//! - [`NavigationResolver`]: nearest resolvable previous/next IDs on the ring
//! - [`CatalogBrowser`]: a record with its neighbors, or a redirect when the
//!   requested ID does not resolve

pub mod browser;
pub mod navigation;
pub mod repository;

pub use browser::{BrowseOutcome, CatalogBrowser, RecordView};
pub use navigation::{NavigationResolver, Neighbors};
pub use repository::RecordRepository;

pub use roster_core::{
    CatalogConfig, CatalogIdSpace, Direction, ErrorKind, FetchError, Record, RecordId,
    RecordSummary, RosterError, RosterResult,
};
pub use roster_storage::{CacheConfig, CacheStats, RecordSource};
