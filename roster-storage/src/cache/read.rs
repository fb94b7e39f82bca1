//! Cache read results carrying hit/miss and age metadata.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Result of a cache read.
///
/// Callers that only want the record use [`CacheRead::into_value`]; the
/// metadata is there for logging and for callers that report freshness.
#[derive(Debug, Clone)]
pub struct CacheRead<T> {
    /// The cached value.
    value: T,
    /// Wall-clock time the value entered the cache (or was fetched).
    cached_at: DateTime<Utc>,
    /// How long the value had been cached when it was read.
    age: Duration,
    /// Whether this was a cache hit or miss.
    was_cache_hit: bool,
}

impl<T> CacheRead<T> {
    /// Create a new cache read from a cache hit.
    pub fn from_cache(value: T, cached_at: DateTime<Utc>, age: Duration) -> Self {
        Self {
            value,
            cached_at,
            age,
            was_cache_hit: true,
        }
    }

    /// Create a new cache read from a source fetch (cache miss).
    pub fn from_source(value: T) -> Self {
        Self {
            value,
            cached_at: Utc::now(),
            age: Duration::ZERO,
            was_cache_hit: false,
        }
    }

    /// Consume the wrapper and return the underlying value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Get a reference to the underlying value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// How long the value had been cached when it was read.
    ///
    /// Always zero for a value that came straight from the source.
    pub fn staleness(&self) -> Duration {
        self.age
    }

    /// Get when this value was cached.
    pub fn cached_at(&self) -> DateTime<Utc> {
        self.cached_at
    }

    /// Check if this was a cache hit.
    pub fn was_cache_hit(&self) -> bool {
        self.was_cache_hit
    }

    /// Check if this was a cache miss (fetched from the source).
    pub fn was_cache_miss(&self) -> bool {
        !self.was_cache_hit
    }

    /// Map the inner value to a new type.
    pub fn map<U, F>(self, f: F) -> CacheRead<U>
    where
        F: FnOnce(T) -> U,
    {
        CacheRead {
            value: f(self.value),
            cached_at: self.cached_at,
            age: self.age,
            was_cache_hit: self.was_cache_hit,
        }
    }
}

impl<T> AsRef<T> for CacheRead<T> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}
