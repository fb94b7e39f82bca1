//! The remote record source boundary.

use async_trait::async_trait;
use roster_core::{FetchError, Record, RecordId};
use std::sync::Arc;

/// Network boundary for the catalog.
///
/// Implementations issue exactly one request per call. They never cache and
/// never retry: a failed attempt is final for that call, and deciding what
/// to do next is the caller's job.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch one record by ID.
    async fn fetch_by_id(&self, id: RecordId) -> Result<Record, FetchError>;

    /// Fetch the entire catalog in one round trip, in remote order.
    async fn fetch_all(&self) -> Result<Vec<Record>, FetchError>;
}

#[async_trait]
impl<T: RecordSource + ?Sized> RecordSource for Arc<T> {
    async fn fetch_by_id(&self, id: RecordId) -> Result<Record, FetchError> {
        (**self).fetch_by_id(id).await
    }

    async fn fetch_all(&self) -> Result<Vec<Record>, FetchError> {
        (**self).fetch_all().await
    }
}
