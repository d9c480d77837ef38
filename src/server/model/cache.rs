//! Domain models for cache entry data operations.

use chrono::{DateTime, Utc};

/// Last stored payload for one cache key.
///
/// Staleness is never stored; callers compare `fetched_at` against their own TTL.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Data domain the entry belongs to (e.g. `problems`).
    pub domain: String,
    /// Key within the domain (e.g. `handle:tourist`).
    pub key: String,
    /// Opaque serialized payload.
    pub payload: String,
    /// When the payload was fetched from the upstream.
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Converts an entity model to a cache entry domain model at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The entity model from the database
    ///
    /// # Returns
    /// - `CacheEntry` - The converted cache entry domain model
    pub fn from_entity(entity: entity::cache_entry::Model) -> Self {
        Self {
            domain: entity.domain,
            key: entity.key,
            payload: entity.payload,
            fetched_at: entity.fetched_at,
        }
    }

    /// Age of the entry at `now`.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::TimeDelta {
        now - self.fetched_at
    }
}

/// Parameters for upserting a cache entry.
///
/// Creates the entry if none exists for `(domain, key)`, otherwise replaces its payload
/// and fetch time.
#[derive(Debug, Clone)]
pub struct UpsertCacheEntryParam {
    pub domain: String,
    pub key: String,
    pub payload: String,
    pub fetched_at: DateTime<Utc>,
}
