//! Instance lock data repository for database operations.
//!
//! This module provides the `InstanceLockRepository` for the `instance_lock` table. Each
//! mutating method is one SQL statement whose `WHERE` clause encodes its precondition,
//! so two processes racing on the same row cannot both succeed:
//!
//! - `insert_if_absent` relies on the primary key conflict on `duty`
//! - `compare_and_claim` only matches the exact `(owner_id, expires_at)` pair the caller
//!   observed, making it a compare-and-swap
//! - `extend` and `clear_owner` only match rows held by the given owner

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
};

use crate::server::model::instance_lock::{ClaimInstanceLockParam, InstanceLock};

use entity::instance_lock::Column;

/// Repository providing database operations for instance lock rows.
pub struct InstanceLockRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> InstanceLockRepository<'a> {
    /// Creates a new InstanceLockRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `InstanceLockRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the lease row for `duty`.
    ///
    /// # Returns
    /// - `Ok(Some(InstanceLock))` - Row exists
    /// - `Ok(None)` - The duty has never been acquired
    /// - `Err(DbErr)` - Database error during query
    pub async fn get(&self, duty: &str) -> Result<Option<InstanceLock>, DbErr> {
        let entity = entity::prelude::InstanceLock::find_by_id(duty.to_string())
            .one(self.db)
            .await?;

        Ok(entity.map(InstanceLock::from_entity))
    }

    /// Inserts the first lease row for a duty.
    ///
    /// # Returns
    /// - `Ok(true)` - Row inserted; the caller holds the lease
    /// - `Ok(false)` - A row for this duty already exists
    /// - `Err(DbErr)` - Database error during insert
    pub async fn insert_if_absent(&self, param: ClaimInstanceLockParam) -> Result<bool, DbErr> {
        let active = entity::instance_lock::ActiveModel {
            duty: ActiveValue::Set(param.duty),
            owner_id: ActiveValue::Set(Some(param.owner_id)),
            process_id: ActiveValue::Set(param.process_id),
            expires_at: ActiveValue::Set(Some(param.expires_at)),
            acquired_at: ActiveValue::Set(param.acquired_at),
        };

        let inserted = entity::prelude::InstanceLock::insert(active)
            .on_conflict(OnConflict::column(Column::Duty).do_nothing().to_owned())
            .exec_without_returning(self.db)
            .await?;

        Ok(inserted == 1)
    }

    /// Overwrites the lease row if it still matches what the caller observed.
    ///
    /// # Arguments
    /// - `param` - New holder, expiry and acquisition time
    /// - `observed_owner` - `owner_id` the caller read, `None` if it was cleared
    /// - `observed_expires_at` - `expires_at` the caller read, `None` if it was cleared
    ///
    /// # Returns
    /// - `Ok(true)` - Row matched and was updated
    /// - `Ok(false)` - Another writer changed the row first
    /// - `Err(DbErr)` - Database error during update
    pub async fn compare_and_claim(
        &self,
        param: ClaimInstanceLockParam,
        observed_owner: Option<&str>,
        observed_expires_at: Option<DateTime<Utc>>,
    ) -> Result<bool, DbErr> {
        let owner_matches = match observed_owner {
            Some(owner) => Column::OwnerId.eq(owner),
            None => Column::OwnerId.is_null(),
        };
        let expiry_matches = match observed_expires_at {
            Some(expires_at) => Column::ExpiresAt.eq(expires_at),
            None => Column::ExpiresAt.is_null(),
        };

        let result = entity::prelude::InstanceLock::update_many()
            .col_expr(Column::OwnerId, Expr::value(Some(param.owner_id)))
            .col_expr(Column::ProcessId, Expr::value(param.process_id))
            .col_expr(Column::ExpiresAt, Expr::value(Some(param.expires_at)))
            .col_expr(Column::AcquiredAt, Expr::value(param.acquired_at))
            .filter(Column::Duty.eq(param.duty))
            .filter(owner_matches)
            .filter(expiry_matches)
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Moves the expiry of a lease held by `owner_id`, whether or not it has lapsed.
    ///
    /// # Returns
    /// - `Ok(true)` - The owner still held the row and the expiry was updated
    /// - `Ok(false)` - The row is held by someone else, released, or missing
    /// - `Err(DbErr)` - Database error during update
    pub async fn extend(
        &self,
        duty: &str,
        owner_id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::InstanceLock::update_many()
            .col_expr(Column::ExpiresAt, Expr::value(Some(expires_at)))
            .filter(Column::Duty.eq(duty))
            .filter(Column::OwnerId.eq(owner_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Clears owner and expiry so the duty can be acquired immediately.
    ///
    /// # Returns
    /// - `Ok(true)` - The owner held the row and it was released
    /// - `Ok(false)` - The row is not held by `owner_id`
    /// - `Err(DbErr)` - Database error during update
    pub async fn clear_owner(&self, duty: &str, owner_id: &str) -> Result<bool, DbErr> {
        let result = entity::prelude::InstanceLock::update_many()
            .col_expr(Column::OwnerId, Expr::value(Option::<String>::None))
            .col_expr(Column::ExpiresAt, Expr::value(Option::<DateTime<Utc>>::None))
            .filter(Column::Duty.eq(duty))
            .filter(Column::OwnerId.eq(owner_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }
}
