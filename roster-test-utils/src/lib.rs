//! ROSTER Test Utilities
//!
//! Shared test infrastructure for the workspace:
//! - [`ScriptedSource`], an in-memory [`RecordSource`] whose failures and
//!   latencies can be scripted per ID
//! - Record fixtures
//! - Proptest generators

pub use roster_core::{
    CatalogConfig, CatalogIdSpace, Direction, ErrorKind, FetchError, Record, RecordId,
    RecordSummary, RosterError, RosterResult,
};
pub use roster_storage::{CacheConfig, RecordSource};

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

// ============================================================================
// SCRIPTED SOURCE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    Always,
    Times(usize),
}

/// In-memory record source with scriptable faults.
///
/// IDs with no record behave like a remote 404. Failures can be permanent
/// (`fail_always`) or transient (`fail_times`), and per-ID latency can be
/// injected to reorder completions in concurrent tests.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    records: DashMap<RecordId, Record>,
    order: Vec<RecordId>,
    failures: DashMap<RecordId, Failure>,
    latency: DashMap<RecordId, Duration>,
    fetch_counts: DashMap<RecordId, usize>,
    total_fetches: AtomicUsize,
    fetch_all_calls: AtomicUsize,
    fetch_all_fails: AtomicBool,
}

impl ScriptedSource {
    /// Build a source serving `records`; `fetch_all` returns them in this order.
    pub fn new(records: impl IntoIterator<Item = Record>) -> Self {
        let records: Vec<Record> = records.into_iter().collect();
        let order = records.iter().map(|r| r.id).collect();
        Self {
            records: records.into_iter().map(|r| (r.id, r)).collect(),
            order,
            ..Self::default()
        }
    }

    /// A fully resolvable catalog of `size` generated records.
    pub fn catalog(size: u32) -> Self {
        Self::new((1..=size).map(fixture))
    }

    pub fn fail_always(&self, id: RecordId) -> &Self {
        self.failures.insert(id, Failure::Always);
        self
    }

    /// Fail the next `times` fetches of `id`, then recover.
    pub fn fail_times(&self, id: RecordId, times: usize) -> &Self {
        self.failures.insert(id, Failure::Times(times));
        self
    }

    pub fn recover(&self, id: RecordId) -> &Self {
        self.failures.remove(&id);
        self
    }

    pub fn fail_fetch_all(&self, failing: bool) -> &Self {
        self.fetch_all_fails.store(failing, Ordering::SeqCst);
        self
    }

    pub fn delay(&self, id: RecordId, latency: Duration) -> &Self {
        self.latency.insert(id, latency);
        self
    }

    /// Swap the served record for its ID (simulates an upstream edit).
    pub fn replace(&self, record: Record) -> &Self {
        self.records.insert(record.id, record);
        self
    }

    /// Number of `fetch_by_id` calls for `id`.
    pub fn fetches_of(&self, id: RecordId) -> usize {
        self.fetch_counts.get(&id).map(|count| *count).unwrap_or(0)
    }

    /// Number of `fetch_by_id` calls across all IDs.
    pub fn total_fetches(&self) -> usize {
        self.total_fetches.load(Ordering::SeqCst)
    }

    pub fn fetch_all_calls(&self) -> usize {
        self.fetch_all_calls.load(Ordering::SeqCst)
    }

    /// Decide whether this fetch of `id` fails, consuming a transient failure.
    fn should_fail(&self, id: RecordId) -> bool {
        let Some(mut failure) = self.failures.get_mut(&id) else {
            return false;
        };
        match *failure {
            Failure::Always => true,
            Failure::Times(0) => false,
            Failure::Times(remaining) => {
                *failure = Failure::Times(remaining - 1);
                true
            }
        }
    }
}

#[async_trait]
impl RecordSource for ScriptedSource {
    async fn fetch_by_id(&self, id: RecordId) -> Result<Record, FetchError> {
        self.total_fetches.fetch_add(1, Ordering::SeqCst);
        *self.fetch_counts.entry(id).or_insert(0) += 1;

        let latency = self.latency.get(&id).map(|d| *d);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let url = format!("scripted://id/{}.json", id);
        if self.should_fail(id) {
            return Err(FetchError::Transport {
                url,
                reason: "scripted failure".to_string(),
            });
        }

        self.records
            .get(&id)
            .map(|record| record.clone())
            .ok_or(FetchError::Status { url, status: 404 })
    }

    async fn fetch_all(&self) -> Result<Vec<Record>, FetchError> {
        self.fetch_all_calls.fetch_add(1, Ordering::SeqCst);
        if self.fetch_all_fails.load(Ordering::SeqCst) {
            return Err(FetchError::Transport {
                url: "scripted://all.json".to_string(),
                reason: "scripted failure".to_string(),
            });
        }
        Ok(self
            .order
            .iter()
            .filter_map(|id| self.records.get(id).map(|record| record.clone()))
            .collect())
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

/// Shorthand for a known-valid record ID.
pub fn rid(raw: u32) -> RecordId {
    match RecordId::new(raw) {
        Ok(id) => id,
        Err(_) => panic!("fixture ids start at 1, got {}", raw),
    }
}

/// Generated record with a predictable name and thumbnail.
pub fn fixture(raw: u32) -> Record {
    named(raw, &format!("Record {}", raw))
}

pub fn named(raw: u32, name: &str) -> Record {
    Record::new(
        rid(raw),
        name,
        format!("https://cdn.test/images/sm/{}.jpg", raw),
    )
    .with_extra(
        "slug",
        serde_json::Value::String(format!("{}-{}", raw, name.to_lowercase().replace(' ', "-"))),
    )
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    use super::*;
    use proptest::prelude::*;

    pub fn direction_strategy() -> impl Strategy<Value = Direction> {
        prop_oneof![Just(Direction::Forward), Just(Direction::Backward)]
    }

    /// A catalog size together with a valid ID inside it.
    pub fn catalog_and_id_strategy(max_size: u32) -> impl Strategy<Value = (u32, RecordId)> {
        (1..=max_size).prop_flat_map(|size| (Just(size), (1..=size).prop_map(rid)))
    }

    /// A per-ID resolvability mask for a catalog of `size`.
    pub fn resolvable_mask_strategy(size: u32) -> impl Strategy<Value = Vec<bool>> {
        proptest::collection::vec(any::<bool>(), size as usize)
    }

    /// Record names with mixed case and inner spaces, never blank.
    pub fn name_strategy() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z \\-]{0,20}[A-Za-z]"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_source_serves_records() {
        let source = ScriptedSource::catalog(3);
        let record = source.fetch_by_id(rid(2)).await.unwrap();
        assert_eq!(record.name, "Record 2");
        assert_eq!(source.fetches_of(rid(2)), 1);
    }

    #[tokio::test]
    async fn test_unknown_id_is_404() {
        let source = ScriptedSource::catalog(3);
        let err = source.fetch_by_id(rid(9)).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_transient_failures_recover() {
        let source = ScriptedSource::catalog(3);
        source.fail_times(rid(1), 2);

        assert!(source.fetch_by_id(rid(1)).await.is_err());
        assert!(source.fetch_by_id(rid(1)).await.is_err());
        assert!(source.fetch_by_id(rid(1)).await.is_ok());
        assert_eq!(source.fetches_of(rid(1)), 3);
    }

    #[tokio::test]
    async fn test_permanent_failure_until_recovered() {
        let source = ScriptedSource::catalog(3);
        source.fail_always(rid(3));
        for _ in 0..3 {
            assert!(source.fetch_by_id(rid(3)).await.is_err());
        }
        source.recover(rid(3));
        assert!(source.fetch_by_id(rid(3)).await.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_all_keeps_construction_order() {
        let source = ScriptedSource::new(vec![named(5, "E"), named(2, "B"), named(9, "I")]);
        let ids: Vec<u32> = source
            .fetch_all()
            .await
            .unwrap()
            .iter()
            .map(|r| r.id.get())
            .collect();
        assert_eq!(ids, vec![5, 2, 9]);

        source.fail_fetch_all(true);
        assert!(source.fetch_all().await.is_err());
        assert_eq!(source.fetch_all_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_applied() {
        let source = ScriptedSource::catalog(1);
        source.delay(rid(1), Duration::from_secs(5));
        let started = tokio::time::Instant::now();
        source.fetch_by_id(rid(1)).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(5));
    }
}
