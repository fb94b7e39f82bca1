//! Cyclic previous/next navigation over the catalog.
//!
//! Some IDs in the catalog do not resolve (the upstream has gaps, or a fetch
//! fails). Navigation walks the ID ring one step at a time until it finds an
//! ID that does, giving up after one full cycle.

use std::sync::Arc;

use roster_core::{Direction, RecordId, RosterError, RosterResult};
use roster_storage::{CacheBackend, InMemoryCacheBackend};
use serde::{Deserialize, Serialize};

use crate::repository::RecordRepository;

/// The nearest resolvable IDs on either side of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbors {
    pub previous: RecordId,
    pub next: RecordId,
}

pub struct NavigationResolver<C = InMemoryCacheBackend>
where
    C: CacheBackend,
{
    repository: Arc<RecordRepository<C>>,
}

impl<C> NavigationResolver<C>
where
    C: CacheBackend,
{
    pub fn new(repository: Arc<RecordRepository<C>>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &RecordRepository<C> {
        &self.repository
    }

    /// First resolvable ID after `current` in `direction`, wrapping around.
    pub async fn find_adjacent_valid_id(
        &self,
        current: RecordId,
        direction: Direction,
    ) -> RosterResult<RecordId> {
        find_adjacent(&*self.repository, current, direction).await
    }

    /// Previous and next resolvable IDs, searched concurrently.
    pub async fn neighbors(&self, current: RecordId) -> RosterResult<Neighbors> {
        let (previous, next) = tokio::join!(
            self.find_adjacent_valid_id(current, Direction::Backward),
            self.find_adjacent_valid_id(current, Direction::Forward),
        );
        Ok(Neighbors {
            previous: previous?,
            next: next?,
        })
    }
}

impl<C> Clone for NavigationResolver<C>
where
    C: CacheBackend,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

/// Walk the ring from `current` until a candidate resolves.
///
/// At most N probes are made; the last one is `current` itself. Fetch
/// failures along the way are skipped.
pub(crate) async fn find_adjacent<C>(
    repository: &RecordRepository<C>,
    current: RecordId,
    direction: Direction,
) -> RosterResult<RecordId>
where
    C: CacheBackend,
{
    let catalog = *repository.catalog();
    let mut index = repository.position_of(current)?;
    let mut probes = 0;

    while probes < catalog.len() {
        index = catalog.step_index(index, direction);
        let Some(candidate) = catalog.id_at(index) else {
            break;
        };
        probes += 1;

        match repository.get_by_id(candidate).await {
            Ok(_) => {
                tracing::debug!(
                    start = %current,
                    ?direction,
                    %candidate,
                    probes,
                    "Found adjacent record"
                );
                return Ok(candidate);
            }
            Err(RosterError::Fetch(e)) => {
                tracing::debug!(
                    start = %current,
                    ?direction,
                    %candidate,
                    probe = probes,
                    error = %e,
                    "Skipping unresolvable candidate"
                );
            }
            Err(other) => return Err(other),
        }
    }

    tracing::warn!(start = %current, ?direction, probes, "No resolvable record in catalog");
    Err(RosterError::NoValidIdFound {
        start: current,
        direction,
        probes,
    })
}
