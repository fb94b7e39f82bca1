//! Record repository: cached per-ID reads, name lookup, and bulk listing.

use std::sync::Arc;

use futures_util::future;
use futures_util::stream::{self, StreamExt};
use roster_core::{
    CatalogConfig, CatalogIdSpace, Direction, Record, RecordId, RecordSummary, RosterError,
    RosterResult,
};
use roster_storage::{
    CacheBackend, CacheConfig, CacheRead, CacheStats, InMemoryCacheBackend, ReadThroughCache,
    RecordSource,
};

/// Public entry point for record access.
///
/// Per-ID reads go through the TTL cache; name lookup always asks the source
/// for the full catalog and never touches the cache.
pub struct RecordRepository<C = InMemoryCacheBackend>
where
    C: CacheBackend,
{
    source: Arc<dyn RecordSource>,
    cache: ReadThroughCache<C>,
    catalog: CatalogIdSpace,
    max_concurrent_fetches: usize,
}

impl RecordRepository<InMemoryCacheBackend> {
    /// Repository backed by the in-memory TTL cache.
    pub fn in_memory(
        source: Arc<dyn RecordSource>,
        catalog: &CatalogConfig,
        cache: CacheConfig,
    ) -> RosterResult<Self> {
        cache.validate()?;
        Self::new(source, ReadThroughCache::in_memory(cache), catalog)
    }
}

impl<C> RecordRepository<C>
where
    C: CacheBackend,
{
    pub fn new(
        source: Arc<dyn RecordSource>,
        cache: ReadThroughCache<C>,
        config: &CatalogConfig,
    ) -> RosterResult<Self> {
        let catalog = config.id_space()?;
        Ok(Self {
            source,
            cache,
            catalog,
            max_concurrent_fetches: config.max_concurrent_fetches,
        })
    }

    pub fn catalog(&self) -> &CatalogIdSpace {
        &self.catalog
    }

    pub fn cache(&self) -> &ReadThroughCache<C> {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Zero-based catalog position of `id`, or `InvalidArgument` when the
    /// catalog does not contain it.
    pub(crate) fn position_of(&self, id: RecordId) -> RosterResult<usize> {
        self.catalog.index_of(id).ok_or_else(|| {
            RosterError::invalid_argument(
                "id",
                format!("{} is outside the catalog (1..={})", id, self.catalog.len()),
            )
        })
    }

    /// Read one record with its cache metadata.
    pub async fn read_by_id(&self, id: RecordId) -> RosterResult<CacheRead<Record>> {
        self.position_of(id)?;

        let read = self
            .cache
            .get(id, self.source.as_ref())
            .await
            .map_err(|e| {
                tracing::debug!(%id, error = %e, "Record fetch failed");
                RosterError::from(e)
            })?;

        if read.was_cache_hit() {
            tracing::debug!(%id, age_ms = read.staleness().as_millis() as u64, "Cache hit");
        } else {
            tracing::debug!(%id, "Cache miss, fetched from source");
        }
        Ok(read)
    }

    /// Fetch one record by ID, serving from the cache while the entry is fresh.
    pub async fn get_by_id(&self, id: RecordId) -> RosterResult<Record> {
        Ok(self.read_by_id(id).await?.into_value())
    }

    /// Case-insensitive exact name lookup over the full remote catalog.
    ///
    /// The query is trimmed; catalog names are compared as-is. The first
    /// match in source order wins.
    pub async fn get_by_name(&self, name: &str) -> RosterResult<Record> {
        let query = name.trim();
        if query.is_empty() {
            return Err(RosterError::invalid_argument("name", "name must not be empty"));
        }

        let records = self.source.fetch_all().await.map_err(|e| {
            tracing::warn!(error = %e, "Catalog fetch for name lookup failed");
            RosterError::from(e)
        })?;

        let scanned = records.len();
        match records.into_iter().find(|record| record.matches_name(query)) {
            Some(record) => {
                tracing::debug!(name = query, id = %record.id, "Name lookup matched");
                Ok(record)
            }
            None => {
                tracing::debug!(name = query, scanned, "Name lookup matched nothing");
                Err(RosterError::NotFound {
                    name: query.to_string(),
                })
            }
        }
    }

    /// Nearest resolvable ID after `current` in `direction`, wrapping around.
    ///
    /// See [`NavigationResolver`](crate::NavigationResolver) for the
    /// concurrent previous/next pair.
    pub async fn find_adjacent_valid_id(
        &self,
        current: RecordId,
        direction: Direction,
    ) -> RosterResult<RecordId> {
        crate::navigation::find_adjacent(self, current, direction).await
    }

    /// Summaries for every resolvable ID, in ID order.
    ///
    /// Fetches run concurrently up to `max_concurrent_fetches`; IDs that fail
    /// to resolve are left out.
    pub async fn list_all(&self) -> Vec<RecordSummary> {
        let summaries: Vec<RecordSummary> = stream::iter(self.catalog.iter())
            .map(|id| self.summary_of(id))
            .buffered(self.max_concurrent_fetches)
            .filter_map(future::ready)
            .collect()
            .await;

        tracing::info!(
            listed = summaries.len(),
            omitted = self.catalog.len() - summaries.len(),
            "Listed catalog"
        );
        summaries
    }

    async fn summary_of(&self, id: RecordId) -> Option<RecordSummary> {
        match self.get_by_id(id).await {
            Ok(record) => Some(record.summary()),
            Err(e) => {
                tracing::debug!(%id, error = %e, "Omitting unresolvable record from listing");
                None
            }
        }
    }
}
