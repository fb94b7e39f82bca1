//! Record detail views with previous/next links.

use std::sync::Arc;

use roster_core::{Direction, Record, RecordId, RosterError, RosterResult};
use roster_storage::{CacheBackend, InMemoryCacheBackend};
use serde::{Deserialize, Serialize};

use crate::navigation::NavigationResolver;
use crate::repository::RecordRepository;

/// A record together with the IDs a reader would move to next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordView {
    pub record: Record,
    pub previous_id: RecordId,
    pub next_id: RecordId,
}

/// Result of opening a record by ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BrowseOutcome {
    Found(RecordView),
    /// The requested ID did not resolve; `target` is the next one that does.
    Redirect { requested: RecordId, target: RecordId },
}

pub struct CatalogBrowser<C = InMemoryCacheBackend>
where
    C: CacheBackend,
{
    repository: Arc<RecordRepository<C>>,
    navigator: NavigationResolver<C>,
}

impl<C> CatalogBrowser<C>
where
    C: CacheBackend,
{
    pub fn new(repository: Arc<RecordRepository<C>>) -> Self {
        let navigator = NavigationResolver::new(Arc::clone(&repository));
        Self {
            repository,
            navigator,
        }
    }

    pub fn repository(&self) -> &RecordRepository<C> {
        &self.repository
    }

    pub fn navigator(&self) -> &NavigationResolver<C> {
        &self.navigator
    }

    /// Open record `id`, or point at the next resolvable record if it fails.
    pub async fn browse(&self, id: RecordId) -> RosterResult<BrowseOutcome> {
        match self.repository.get_by_id(id).await {
            Ok(record) => Ok(BrowseOutcome::Found(self.view(record).await?)),
            Err(RosterError::Fetch(e)) => {
                tracing::info!(requested = %id, error = %e, "Record unavailable, redirecting");
                let target = self
                    .navigator
                    .find_adjacent_valid_id(id, Direction::Forward)
                    .await?;
                Ok(BrowseOutcome::Redirect {
                    requested: id,
                    target,
                })
            }
            Err(other) => Err(other),
        }
    }

    /// Look a record up by name and open it.
    pub async fn search(&self, name: &str) -> RosterResult<RecordView> {
        let record = self.repository.get_by_name(name).await?;
        self.view(record).await
    }

    async fn view(&self, record: Record) -> RosterResult<RecordView> {
        let neighbors = self.navigator.neighbors(record.id).await?;
        Ok(RecordView {
            record,
            previous_id: neighbors.previous,
            next_id: neighbors.next,
        })
    }
}
