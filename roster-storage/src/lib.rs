//! ROSTER Storage - Record Source and Cache
//!
//! Defines the boundary to the remote catalog ([`RecordSource`]) and the
//! TTL-bounded cache that fronts it. The HTTP implementation of the source
//! lives in roster-source.

pub mod cache;
pub mod source;

pub use cache::{
    CacheBackend, CacheConfig, CacheRead, CacheStats, InMemoryCacheBackend, ReadThroughCache,
};
pub use source::RecordSource;
