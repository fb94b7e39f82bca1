//! Record cache with explicit expiry semantics.
//!
//! The cache memoizes `RecordId -> Record` for a bounded time so repeated
//! lookups do not pay network latency. Expiry is part of the contract, not a
//! best-effort cleanup: once an entry's TTL has elapsed, [`CacheBackend::get`]
//! treats it exactly as if it had never been cached.
//!
//! Reads come back wrapped in [`CacheRead<T>`], which says whether the value
//! was served from memory and how old it is.
//!
//! Failures are never cached. A fetch that fails leaves the cache untouched so
//! the next caller goes back to the source.
//!
//! # Example
//!
//! ```ignore
//! let cache = ReadThroughCache::in_memory(CacheConfig::new().with_ttl(Duration::from_secs(60)));
//!
//! let read = cache.get(id, &source).await?;
//! if read.was_cache_hit() {
//!     tracing::debug!(age = ?read.staleness(), "served from cache");
//! }
//! ```

pub mod memory_backend;
pub mod read;
pub mod read_through;
pub mod traits;

pub use memory_backend::InMemoryCacheBackend;
pub use read::CacheRead;
pub use read_through::{CacheConfig, ReadThroughCache};
pub use traits::{CacheBackend, CacheStats};
