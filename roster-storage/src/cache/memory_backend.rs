//! In-memory TTL cache backend.
//!
//! Entries live in a sharded concurrent map, so readers and writers on
//! different keys do not contend. Expiry is measured with tokio's clock,
//! which lets tests pause and advance time deterministically.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use roster_core::{Record, RecordId};
use tokio::time::Instant;

use super::read::CacheRead;
use super::read_through::CacheConfig;
use super::traits::{CacheBackend, CacheStats};

/// A cached record with its insertion time.
#[derive(Debug, Clone)]
struct CacheEntry {
    record: Record,
    inserted_at: Instant,
    cached_at: DateTime<Utc>,
}

impl CacheEntry {
    fn new(record: Record) -> Self {
        Self {
            record,
            inserted_at: Instant::now(),
            cached_at: Utc::now(),
        }
    }

    /// Visible only while `now < inserted_at + ttl`.
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.inserted_at) >= ttl
    }
}

/// Thread-safe TTL cache keyed by record ID.
///
/// With `max_entries` set, inserting a new key into a full cache first drops
/// expired entries and then, if still full, evicts the entry with the oldest
/// insertion time. The bound is approximate under concurrent inserts of
/// distinct new keys.
#[derive(Debug)]
pub struct InMemoryCacheBackend {
    entries: DashMap<RecordId, CacheEntry>,
    config: CacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
    expirations: AtomicU64,
    evictions: AtomicU64,
}

impl InMemoryCacheBackend {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(CacheConfig::default())
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn make_room(&self, max: usize) {
        if self.entries.len() < max {
            return;
        }
        self.purge_expired();

        while self.entries.len() >= max {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|entry| entry.value().inserted_at)
                .map(|entry| *entry.key());
            let Some(oldest) = oldest else { break };

            if self.entries.remove(&oldest).is_some() {
                self.evictions.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(id = %oldest, "Evicted oldest cache entry at capacity");
            }
        }
    }
}

impl Default for InMemoryCacheBackend {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl CacheBackend for InMemoryCacheBackend {
    fn get(&self, id: RecordId) -> Option<CacheRead<Record>> {
        let now = Instant::now();
        let ttl = self.config.entry_ttl;

        let expired = match self.entries.get(&id) {
            Some(entry) if !entry.is_expired(now, ttl) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                let age = now.saturating_duration_since(entry.inserted_at);
                return Some(CacheRead::from_cache(
                    entry.record.clone(),
                    entry.cached_at,
                    age,
                ));
            }
            Some(_) => true,
            None => false,
        };

        if expired
            && self
                .entries
                .remove_if(&id, |_, entry| entry.is_expired(now, ttl))
                .is_some()
        {
            self.expirations.fetch_add(1, Ordering::Relaxed);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    fn put(&self, id: RecordId, record: Record) {
        if let Some(max) = self.config.max_entries {
            if !self.entries.contains_key(&id) {
                self.make_room(max);
            }
        }
        self.entries.insert(id, CacheEntry::new(record));
    }

    fn invalidate(&self, id: RecordId) -> bool {
        self.entries.remove(&id).is_some()
    }

    fn clear(&self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let ttl = self.config.entry_ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now, ttl));
        let removed = before.saturating_sub(self.entries.len());
        self.expirations.fetch_add(removed as u64, Ordering::Relaxed);
        removed
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entry_count: self.entries.len() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn id(raw: u32) -> RecordId {
        RecordId::new(raw).unwrap()
    }

    fn record(raw: u32) -> Record {
        Record::new(id(raw), format!("Record {}", raw), format!("thumb-{}", raw))
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let cache = InMemoryCacheBackend::with_defaults();
        assert!(cache.get(id(1)).is_none());
        assert_eq!(cache.stats().misses, 1);
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = InMemoryCacheBackend::with_defaults();
        cache.put(id(1), record(1));

        let read = cache.get(id(1)).unwrap();
        assert!(read.was_cache_hit());
        assert_eq!(read.into_value(), record(1));
        assert_eq!(cache.stats().hits, 1);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let cache = InMemoryCacheBackend::with_defaults();
        cache.put(id(1), record(1));
        cache.put(id(1), Record::new(id(1), "Renamed", "thumb"));

        assert_eq!(cache.get(id(1)).unwrap().into_value().name, "Renamed");
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_at_ttl_boundary() {
        let cache = InMemoryCacheBackend::new(CacheConfig::new().with_ttl(Duration::from_secs(10)));
        cache.put(id(1), record(1));

        tokio::time::advance(Duration::from_millis(9_999)).await;
        assert!(cache.get(id(1)).is_some());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(cache.get(id(1)).is_none());

        let stats = cache.stats();
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.entry_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_resets_expiry_clock() {
        let cache = InMemoryCacheBackend::new(CacheConfig::new().with_ttl(Duration::from_secs(10)));
        cache.put(id(1), record(1));

        tokio::time::advance(Duration::from_secs(8)).await;
        cache.put(id(1), record(1));
        tokio::time::advance(Duration::from_secs(8)).await;

        let read = cache.get(id(1)).unwrap();
        assert_eq!(read.staleness(), Duration::from_secs(8));
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let cache = InMemoryCacheBackend::new(CacheConfig::new().with_ttl(Duration::from_secs(5)));
        cache.put(id(1), record(1));
        cache.put(id(2), record(2));
        tokio::time::advance(Duration::from_secs(3)).await;
        cache.put(id(3), record(3));
        tokio::time::advance(Duration::from_secs(2)).await;

        assert_eq!(cache.purge_expired(), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(id(3)).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_evicts_oldest_insert() {
        let cache = InMemoryCacheBackend::new(CacheConfig::new().with_max_entries(2));
        cache.put(id(1), record(1));
        tokio::time::advance(Duration::from_millis(1)).await;
        cache.put(id(2), record(2));
        tokio::time::advance(Duration::from_millis(1)).await;
        cache.put(id(3), record(3));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(id(1)).is_none());
        assert!(cache.get(id(2)).is_some());
        assert!(cache.get(id(3)).is_some());
        assert_eq!(cache.stats().evictions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_prefers_dropping_expired_entries() {
        let config = CacheConfig::new()
            .with_ttl(Duration::from_secs(10))
            .with_max_entries(2);
        let cache = InMemoryCacheBackend::new(config);
        cache.put(id(1), record(1));
        tokio::time::advance(Duration::from_secs(5)).await;
        cache.put(id(2), record(2));
        tokio::time::advance(Duration::from_secs(6)).await;
        cache.put(id(3), record(3));

        assert!(cache.get(id(2)).is_some());
        assert!(cache.get(id(3)).is_some());
        assert_eq!(cache.stats().evictions, 0);
        assert_eq!(cache.stats().expirations, 1);
    }

    #[tokio::test]
    async fn test_overwrite_at_capacity_does_not_evict() {
        let cache = InMemoryCacheBackend::new(CacheConfig::new().with_max_entries(2));
        cache.put(id(1), record(1));
        cache.put(id(2), record(2));
        cache.put(id(2), record(2));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 0);
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let cache = InMemoryCacheBackend::with_defaults();
        cache.put(id(1), record(1));
        cache.put(id(2), record(2));

        assert!(cache.invalidate(id(1)));
        assert!(!cache.invalidate(id(1)));
        assert_eq!(cache.clear(), 1);
        assert!(cache.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_puts_and_gets() {
        let cache = Arc::new(InMemoryCacheBackend::with_defaults());
        let mut handles = Vec::new();
        for worker in 0..8u32 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                for raw in 1..=50u32 {
                    cache.put(id(raw), record(raw));
                    let probe = (raw + worker) % 50 + 1;
                    if let Some(read) = cache.get(id(probe)) {
                        assert_eq!(read.into_value(), record(probe));
                    }
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(cache.len(), 50);
        for raw in 1..=50u32 {
            assert_eq!(cache.get(id(raw)).unwrap().into_value(), record(raw));
        }
    }
}
