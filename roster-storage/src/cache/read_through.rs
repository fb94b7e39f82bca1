//! Read-through cache over a [`RecordSource`].
//!
//! Reads check the backend first and fall back to the source on a miss,
//! storing successful fetches. Failed fetches propagate unchanged and leave
//! the backend untouched.

use std::sync::Arc;
use std::time::Duration;

use roster_core::{ConfigError, FetchError, Record, RecordId, RosterError, RosterResult};

use super::memory_backend::InMemoryCacheBackend;
use super::read::CacheRead;
use super::traits::{CacheBackend, CacheStats};
use crate::source::RecordSource;

/// Default TTL for cached records.
pub const DEFAULT_ENTRY_TTL: Duration = Duration::from_secs(3600);

/// Configuration for the record cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub entry_ttl: Duration,
    /// Optional capacity bound. When full, inserting a new key evicts the
    /// entry with the oldest insertion time. `None` leaves TTL as the only
    /// eviction mechanism.
    pub max_entries: Option<usize>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            entry_ttl: DEFAULT_ENTRY_TTL,
            max_entries: None,
        }
    }
}

impl CacheConfig {
    /// Create a new cache config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entry TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.entry_ttl = ttl;
        self
    }

    /// Set the max entries.
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = Some(max);
        self
    }

    pub fn validate(&self) -> RosterResult<()> {
        if self.entry_ttl.is_zero() {
            return Err(RosterError::Config(ConfigError::InvalidValue {
                field: "entry_ttl".to_string(),
                value: format!("{:?}", self.entry_ttl),
                reason: "entry_ttl must be positive".to_string(),
            }));
        }

        if self.max_entries == Some(0) {
            return Err(RosterError::Config(ConfigError::InvalidValue {
                field: "max_entries".to_string(),
                value: "0".to_string(),
                reason: "max_entries must be greater than 0 when set".to_string(),
            }));
        }

        Ok(())
    }
}

/// Read-through cache.
///
/// # Type Parameters
///
/// - `C`: The cache backend for storing fetched records
///
/// # Example
///
/// ```ignore
/// let cache = ReadThroughCache::in_memory(CacheConfig::default());
/// let record = cache.get(id, &source).await?.into_value();
/// ```
pub struct ReadThroughCache<C>
where
    C: CacheBackend,
{
    /// The cache backend.
    cache: Arc<C>,
}

impl ReadThroughCache<InMemoryCacheBackend> {
    /// Create a read-through cache backed by an in-memory TTL map.
    pub fn in_memory(config: CacheConfig) -> Self {
        Self::new(Arc::new(InMemoryCacheBackend::new(config)))
    }
}

impl<C> ReadThroughCache<C>
where
    C: CacheBackend,
{
    /// Create a new read-through cache.
    pub fn new(cache: Arc<C>) -> Self {
        Self { cache }
    }

    /// Get a reference to the cache backend.
    pub fn backend(&self) -> &C {
        &self.cache
    }

    /// Get a record from the cache, falling back to the source on miss.
    ///
    /// A hit performs no network call. On a miss the source is asked once;
    /// a successful fetch is stored before it is returned, a failed one is
    /// returned as-is with nothing stored.
    pub async fn get<S>(&self, id: RecordId, source: &S) -> Result<CacheRead<Record>, FetchError>
    where
        S: RecordSource + ?Sized,
    {
        if let Some(read) = self.cache.get(id) {
            return Ok(read);
        }

        let record = source.fetch_by_id(id).await?;
        self.cache.put(id, record.clone());
        Ok(CacheRead::from_source(record))
    }

    /// Put a record into the cache.
    pub fn put(&self, record: Record) {
        self.cache.put(record.id, record);
    }

    /// Invalidate a single record.
    pub fn invalidate(&self, id: RecordId) -> bool {
        self.cache.invalidate(id)
    }

    /// Drop every cached record.
    pub fn clear(&self) -> usize {
        self.cache.clear()
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl<C> Clone for ReadThroughCache<C>
where
    C: CacheBackend,
{
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::RwLock;

    // Mock source for testing
    #[derive(Default)]
    struct MockSource {
        records: RwLock<HashMap<RecordId, Record>>,
        failing: RwLock<HashSet<RecordId>>,
        fetches: AtomicUsize,
    }

    impl MockSource {
        fn insert(&self, record: Record) {
            self.records.write().unwrap().insert(record.id, record);
        }

        fn fail(&self, id: RecordId, failing: bool) {
            let mut set = self.failing.write().unwrap();
            if failing {
                set.insert(id);
            } else {
                set.remove(&id);
            }
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RecordSource for MockSource {
        async fn fetch_by_id(&self, id: RecordId) -> Result<Record, FetchError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let url = format!("mock://id/{}", id);
            if self.failing.read().unwrap().contains(&id) {
                return Err(FetchError::Transport {
                    url,
                    reason: "connection reset".to_string(),
                });
            }
            self.records
                .read()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or(FetchError::Status { url, status: 404 })
        }

        async fn fetch_all(&self) -> Result<Vec<Record>, FetchError> {
            let mut all: Vec<Record> = self.records.read().unwrap().values().cloned().collect();
            all.sort_by_key(|r| r.id);
            Ok(all)
        }
    }

    fn id(raw: u32) -> RecordId {
        RecordId::new(raw).unwrap()
    }

    fn record(raw: u32, name: &str) -> Record {
        Record::new(id(raw), name, format!("https://cdn.test/sm/{}.jpg", raw))
    }

    #[tokio::test]
    async fn test_cache_miss_fetches_from_source() {
        let cache = ReadThroughCache::in_memory(CacheConfig::default());
        let source = MockSource::default();
        source.insert(record(1, "A-Bomb"));

        let read = cache.get(id(1), &source).await.unwrap();

        assert!(read.was_cache_miss());
        assert_eq!(read.into_value().name, "A-Bomb");
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test]
    async fn test_repeated_reads_hit_cache() {
        let cache = ReadThroughCache::in_memory(CacheConfig::default());
        let source = MockSource::default();
        source.insert(record(2, "Abe Sapien"));

        let first = cache.get(id(2), &source).await.unwrap();
        let second = cache.get(id(2), &source).await.unwrap();
        let third = cache.get(id(2), &source).await.unwrap();

        assert!(first.was_cache_miss());
        assert!(second.was_cache_hit());
        assert!(third.was_cache_hit());
        assert_eq!(first.value(), second.value());
        assert_eq!(second.value(), third.value());
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache = ReadThroughCache::in_memory(CacheConfig::default());
        let source = MockSource::default();
        source.insert(record(3, "Abin Sur"));
        source.fail(id(3), true);

        let err = cache.get(id(3), &source).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
        assert_eq!(cache.stats().entry_count, 0);

        source.fail(id(3), false);
        let read = cache.get(id(3), &source).await.unwrap();
        assert!(read.was_cache_miss());
        assert_eq!(read.into_value().name, "Abin Sur");
        assert_eq!(source.fetches(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_refetched() {
        let config = CacheConfig::new().with_ttl(Duration::from_secs(60));
        let cache = ReadThroughCache::in_memory(config);
        let source = MockSource::default();
        source.insert(record(4, "Abomination"));

        cache.get(id(4), &source).await.unwrap();
        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(cache.get(id(4), &source).await.unwrap().was_cache_hit());

        tokio::time::advance(Duration::from_secs(1)).await;
        let read = cache.get(id(4), &source).await.unwrap();
        assert!(read.was_cache_miss());
        assert_eq!(source.fetches(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let cache = ReadThroughCache::in_memory(CacheConfig::default());
        let source = MockSource::default();
        source.insert(record(5, "Abraxas"));

        cache.get(id(5), &source).await.unwrap();
        assert!(cache.invalidate(id(5)));
        assert!(!cache.invalidate(id(5)));
        assert!(cache.get(id(5), &source).await.unwrap().was_cache_miss());
        assert_eq!(source.fetches(), 2);
    }

    #[tokio::test]
    async fn test_put_warms_cache() {
        let cache = ReadThroughCache::in_memory(CacheConfig::default());
        let source = MockSource::default();

        cache.put(record(6, "Absorbing Man"));
        let read = cache.get(id(6), &source).await.unwrap();
        assert!(read.was_cache_hit());
        assert_eq!(source.fetches(), 0);
    }

    #[test]
    fn test_cache_config_builder() {
        let config = CacheConfig::new()
            .with_ttl(Duration::from_secs(1800))
            .with_max_entries(500);

        assert_eq!(config.entry_ttl, Duration::from_secs(1800));
        assert_eq!(config.max_entries, Some(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cache_config_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.entry_ttl, Duration::from_secs(3600));
        assert_eq!(config.max_entries, None);
    }

    #[test]
    fn test_cache_config_rejects_zero_values() {
        assert!(CacheConfig::new().with_ttl(Duration::ZERO).validate().is_err());
        assert!(CacheConfig::new().with_max_entries(0).validate().is_err());
    }
}
