//! Cache entry data repository for database operations.
//!
//! This module provides the `CacheRepository` for reading and writing the `cache_entry`
//! table. Rows are keyed by `(domain, key)` and written with a single
//! `INSERT ... ON CONFLICT DO UPDATE`, so concurrent writers from different processes
//! always leave exactly one row per key.

use sea_orm::{
    sea_query::OnConflict, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter,
};

use crate::server::model::cache::{CacheEntry, UpsertCacheEntryParam};

/// Repository providing database operations for cache entries.
pub struct CacheRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CacheRepository<'a> {
    /// Creates a new CacheRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `CacheRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the cache entry stored under `(domain, key)`.
    ///
    /// # Arguments
    /// - `domain` - Data domain of the entry
    /// - `key` - Key within the domain
    ///
    /// # Returns
    /// - `Ok(Some(CacheEntry))` - Entry exists
    /// - `Ok(None)` - Nothing stored for this key
    /// - `Err(DbErr)` - Database error during query
    pub async fn get(&self, domain: &str, key: &str) -> Result<Option<CacheEntry>, DbErr> {
        let entity = entity::prelude::CacheEntry::find_by_id((domain.to_string(), key.to_string()))
            .one(self.db)
            .await?;

        Ok(entity.map(CacheEntry::from_entity))
    }

    /// Creates or replaces the cache entry for `(domain, key)`.
    ///
    /// Performs an atomic upsert: an existing row has its payload and `fetched_at`
    /// overwritten, otherwise a new row is inserted.
    ///
    /// # Arguments
    /// - `param` - Upsert parameters containing domain, key, payload, and fetch time
    ///
    /// # Returns
    /// - `Ok(CacheEntry)` - The stored entry
    /// - `Err(DbErr)` - Database error during upsert
    pub async fn upsert(&self, param: UpsertCacheEntryParam) -> Result<CacheEntry, DbErr> {
        let active = entity::cache_entry::ActiveModel {
            domain: ActiveValue::Set(param.domain.clone()),
            key: ActiveValue::Set(param.key.clone()),
            payload: ActiveValue::Set(param.payload.clone()),
            fetched_at: ActiveValue::Set(param.fetched_at),
        };

        entity::prelude::CacheEntry::insert(active)
            .on_conflict(
                OnConflict::columns([
                    entity::cache_entry::Column::Domain,
                    entity::cache_entry::Column::Key,
                ])
                .update_columns([
                    entity::cache_entry::Column::Payload,
                    entity::cache_entry::Column::FetchedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        Ok(CacheEntry {
            domain: param.domain,
            key: param.key,
            payload: param.payload,
            fetched_at: param.fetched_at,
        })
    }

    /// Deletes the entry for `(domain, key)`.
    ///
    /// Only used for administrative invalidation; normal operation never deletes entries.
    ///
    /// # Returns
    /// - `Ok(true)` - An entry was deleted
    /// - `Ok(false)` - No entry existed
    /// - `Err(DbErr)` - Database error during delete
    pub async fn delete(&self, domain: &str, key: &str) -> Result<bool, DbErr> {
        let result = entity::prelude::CacheEntry::delete_many()
            .filter(entity::cache_entry::Column::Domain.eq(domain))
            .filter(entity::cache_entry::Column::Key.eq(key))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
