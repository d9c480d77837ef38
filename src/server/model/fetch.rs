//! Outcome types shared by the cache-backed data services.

use chrono::{DateTime, Utc};

/// Where a served payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Api,
    Cache,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Cache => "cache",
        }
    }
}

/// Data returned by a cache-backed fetch.
///
/// `is_stale` is only ever true for `DataSource::Cache`: the entry was older than the
/// TTL and the refresh attempt failed, so the last good payload is served instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    pub source: DataSource,
    pub is_stale: bool,
    /// When `data` was obtained from the upstream.
    pub fetched_at: DateTime<Utc>,
}

impl<T> Fetched<T> {
    /// Applies `f` to the payload, keeping the provenance.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            data: f(self.data),
            source: self.source,
            is_stale: self.is_stale,
            fetched_at: self.fetched_at,
        }
    }
}

/// Most recent failure seen by a data service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
