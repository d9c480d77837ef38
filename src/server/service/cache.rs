//! Cache-with-fallback orchestration shared by the Codeforces data services.
//!
//! A [`CacheService`] owns one data domain of the `cache_entry` table. Its
//! [`fetch_with_fallback`](CacheService::fetch_with_fallback) decides between serving
//! the cached payload, refreshing it from the upstream, and serving an expired payload
//! when the refresh fails. It is the only place where an upstream failure is turned
//! into a degraded but successful result.

use chrono::{DateTime, TimeDelta, Utc};
use sea_orm::DatabaseConnection;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::server::{
    data::cache::CacheRepository,
    error::{api::ApiError, AppError},
    model::{
        cache::{CacheEntry, UpsertCacheEntryParam},
        fetch::{DataSource, Fetched, ServiceError},
    },
    util::clock::Clock,
};

/// Most recent failure of a data service, cleared by the next successful fetch.
///
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct LastErrorTracker {
    last: Arc<RwLock<Option<ServiceError>>>,
}

impl LastErrorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored failure.
    pub async fn record(&self, message: impl Into<String>, timestamp: DateTime<Utc>) {
        *self.last.write().await = Some(ServiceError {
            message: message.into(),
            timestamp,
        });
    }

    pub async fn clear(&self) {
        *self.last.write().await = None;
    }

    pub async fn get(&self) -> Option<ServiceError> {
        self.last.read().await.clone()
    }
}

/// Keyed payload cache for one data domain.
#[derive(Clone)]
pub struct CacheService {
    db: DatabaseConnection,
    domain: String,
    clock: Arc<dyn Clock>,
}

impl CacheService {
    /// Creates a new CacheService.
    ///
    /// # Arguments
    /// - `db` - Database connection holding the `cache_entry` table
    /// - `domain` - Data domain the service reads and writes, e.g. `submissions`
    /// - `clock` - Time source for `fetched_at` and freshness checks
    ///
    /// # Returns
    /// - `CacheService` - New service instance
    pub fn new(db: DatabaseConnection, domain: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            db,
            domain: domain.into(),
            clock,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Reads the stored entry for `key`. Never touches the network.
    ///
    /// # Returns
    /// - `Ok(Some(CacheEntry))` - Entry exists, fresh or not
    /// - `Ok(None)` - Nothing stored for this key
    /// - `Err(AppError::DbErr)` - Storage failure
    pub async fn get(&self, key: &str) -> Result<Option<CacheEntry>, AppError> {
        let repo = CacheRepository::new(&self.db);

        Ok(repo.get(&self.domain, key).await?)
    }

    /// Stores `payload` under `key` with `fetched_at = now`, replacing any previous entry.
    ///
    /// # Returns
    /// - `Ok(CacheEntry)` - The stored entry
    /// - `Err(AppError::DbErr)` - Storage failure
    pub async fn set(&self, key: &str, payload: impl Into<String>) -> Result<CacheEntry, AppError> {
        self.write(key, payload.into(), self.clock.now()).await
    }

    async fn write(
        &self,
        key: &str,
        payload: String,
        fetched_at: DateTime<Utc>,
    ) -> Result<CacheEntry, AppError> {
        let repo = CacheRepository::new(&self.db);

        let entry = repo
            .upsert(UpsertCacheEntryParam {
                domain: self.domain.clone(),
                key: key.to_string(),
                payload,
                fetched_at,
            })
            .await?;

        Ok(entry)
    }

    /// Serves `key` from the cache while it is fresh, otherwise refreshes it via `fetch`.
    ///
    /// An entry whose age is at most `ttl` is returned as-is. Otherwise `fetch` is
    /// attempted: on success the new payload is stored and returned; on failure the
    /// expired entry is returned flagged stale and the failure is recorded in
    /// `last_error`. An entry is never discarded because of its age alone.
    ///
    /// A payload that no longer deserializes as `T` is treated as absent. Storage errors
    /// are logged and treated the same way as a missing entry, so a broken database
    /// degrades to plain upstream access.
    ///
    /// # Arguments
    /// - `key` - Cache key within this service's domain
    /// - `ttl` - Maximum age of an entry served without a refresh attempt
    /// - `last_error` - Failure slot of the calling service
    /// - `fetch` - Upstream call producing fresh data
    ///
    /// # Returns
    /// - `Ok(Fetched<T>)` - Fresh, cached, or stale cached data with its provenance
    /// - `Err(AppError::ApiErr)` - The upstream failed and nothing usable was cached
    pub async fn fetch_with_fallback<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        last_error: &LastErrorTracker,
        fetch: F,
    ) -> Result<Fetched<T>, AppError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let cached = self.read_cached::<T>(key).await;
        let now = self.clock.now();
        let max_age = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);

        let cached = match cached {
            Some((entry, data)) if entry.age(now) <= max_age => {
                debug!("Serving {}/{} from cache", self.domain, key);

                return Ok(Fetched {
                    data,
                    source: DataSource::Cache,
                    is_stale: false,
                    fetched_at: entry.fetched_at,
                });
            }
            other => other,
        };

        match fetch().await {
            Ok(data) => {
                let fetched_at = self.clock.now();
                self.store(key, &data, fetched_at).await;
                last_error.clear().await;

                Ok(Fetched {
                    data,
                    source: DataSource::Api,
                    is_stale: false,
                    fetched_at,
                })
            }
            Err(err) => {
                last_error.record(err.to_string(), self.clock.now()).await;

                match cached {
                    Some((entry, data)) => {
                        warn!(
                            "Refreshing {}/{} failed, serving cache from {}: {}",
                            self.domain, key, entry.fetched_at, err
                        );

                        Ok(Fetched {
                            data,
                            source: DataSource::Cache,
                            is_stale: true,
                            fetched_at: entry.fetched_at,
                        })
                    }
                    None => {
                        warn!("Fetching {}/{} failed with no cache: {}", self.domain, key, err);

                        Err(err.into())
                    }
                }
            }
        }
    }

    /// Reads and decodes the entry for `key`, logging and discarding anything unusable.
    async fn read_cached<T: DeserializeOwned>(&self, key: &str) -> Option<(CacheEntry, T)> {
        let entry = match self.get(key).await {
            Ok(entry) => entry?,
            Err(e) => {
                warn!("Failed to read cache {}/{}: {}", self.domain, key, e);
                return None;
            }
        };

        match serde_json::from_str(&entry.payload) {
            Ok(data) => Some((entry, data)),
            Err(e) => {
                warn!("Discarding undecodable cache {}/{}: {}", self.domain, key, e);
                None
            }
        }
    }

    /// Persists a freshly fetched payload, logging failures.
    async fn store<T: Serialize>(&self, key: &str, data: &T, fetched_at: DateTime<Utc>) {
        let payload = match serde_json::to_string(data) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to serialize {}/{}: {}", self.domain, key, e);
                return;
            }
        };

        if let Err(e) = self.write(key, payload, fetched_at).await {
            warn!("Failed to store {}/{}: {}", self.domain, key, e);
        }
    }
}
