//! Cache backend trait and statistics.

use roster_core::{Record, RecordId};

use super::read::CacheRead;

/// Cache backend trait for pluggable cache implementations.
///
/// Implementations must be safe under concurrent access: `put` is atomic per
/// key and the last writer wins when two callers race on the same ID. No
/// consistency across keys is promised.
///
/// # Expiry
///
/// `get` must never return an entry whose TTL has elapsed. Whether expired
/// entries are physically removed on read or later by `purge_expired` is up
/// to the implementation.
pub trait CacheBackend: Send + Sync {
    /// Get a live entry, or `None` if absent or expired.
    fn get(&self, id: RecordId) -> Option<CacheRead<Record>>;

    /// Insert or overwrite an entry, restarting its expiry clock.
    fn put(&self, id: RecordId, record: Record);

    /// Drop a single entry. Returns true if something was removed.
    fn invalidate(&self, id: RecordId) -> bool;

    /// Drop every entry. Returns how many were removed.
    fn clear(&self) -> usize;

    /// Physically remove expired entries. Returns how many were removed.
    fn purge_expired(&self) -> usize;

    /// Get cache statistics.
    fn stats(&self) -> CacheStats;
}

/// Statistics about cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses (including reads of expired entries).
    pub misses: u64,
    /// Number of entries found expired on read or purge.
    pub expirations: u64,
    /// Number of evictions due to capacity.
    pub evictions: u64,
    /// Number of entries currently held, live or not yet purged.
    pub entry_count: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
