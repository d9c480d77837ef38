//! Cache entry factory for creating test cache rows.
//!
//! Inserts rows directly through the entity, bypassing the repository, so tests can
//! seed entries with arbitrary `fetched_at` timestamps (e.g. already expired ones).

use crate::factory::helpers::next_id;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test cache entries with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::cache_entry::CacheEntryFactory;
///
/// let entry = CacheEntryFactory::new(&db)
///     .domain("submissions")
///     .key("handle:tourist")
///     .payload("[]")
///     .build()
///     .await?;
/// ```
pub struct CacheEntryFactory<'a> {
    db: &'a DatabaseConnection,
    domain: String,
    key: String,
    payload: String,
    fetched_at: DateTime<Utc>,
}

impl<'a> CacheEntryFactory<'a> {
    /// Creates a new CacheEntryFactory with default values.
    ///
    /// Defaults:
    /// - domain: `"test"`
    /// - key: `"key_{id}"` where id is auto-incremented
    /// - payload: `"null"`
    /// - fetched_at: current time
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the row
    ///
    /// # Returns
    /// - `CacheEntryFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            domain: "test".to_string(),
            key: format!("key_{}", id),
            payload: "null".to_string(),
            fetched_at: Utc::now(),
        }
    }

    /// Sets the cache domain.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Sets the cache key within the domain.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Sets the raw serialized payload.
    pub fn payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Sets the time the entry was fetched.
    pub fn fetched_at(mut self, fetched_at: DateTime<Utc>) -> Self {
        self.fetched_at = fetched_at;
        self
    }

    /// Builds and inserts the cache entry into the database.
    ///
    /// # Returns
    /// - `Ok(entity::cache_entry::Model)` - Created cache row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::cache_entry::Model, DbErr> {
        entity::cache_entry::ActiveModel {
            domain: ActiveValue::Set(self.domain),
            key: ActiveValue::Set(self.key),
            payload: ActiveValue::Set(self.payload),
            fetched_at: ActiveValue::Set(self.fetched_at),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a cache entry with default values.
///
/// Shorthand for `CacheEntryFactory::new(db).build().await`.
pub async fn create_cache_entry(
    db: &DatabaseConnection,
) -> Result<entity::cache_entry::Model, DbErr> {
    CacheEntryFactory::new(db).build().await
}
