//! Lease-based single-writer enforcement for named duties.
//!
//! A duty row moves between unheld, held by one owner, and held by another owner after
//! its lease lapses. Every transition is one conditional statement in
//! [`InstanceLockRepository`], so processes sharing the database never both believe they
//! hold the same duty. Contention is a normal negative answer, never an error.

use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::server::{
    data::instance_lock::InstanceLockRepository,
    error::AppError,
    model::instance_lock::{ClaimInstanceLockParam, InstanceLock, LockAcquisition},
    util::clock::{add_duration, Clock},
};

#[derive(Clone)]
pub struct InstanceLockService {
    db: DatabaseConnection,
    clock: Arc<dyn Clock>,
}

impl InstanceLockService {
    /// Creates a new InstanceLockService.
    ///
    /// # Arguments
    /// - `db` - Database connection holding the `instance_lock` table
    /// - `clock` - Time source for lease expiry
    ///
    /// # Returns
    /// - `InstanceLockService` - New service instance
    pub fn new(db: DatabaseConnection, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Attempts to acquire or renew the lease on `duty`.
    ///
    /// - No row: a new row owned by `owner_id` is inserted.
    /// - Active lease held by someone else: nothing is written, `acquired` is false.
    /// - Active lease already held by `owner_id`: the expiry is extended.
    /// - Expired or released lease: the row is taken over.
    ///
    /// Each write only applies if the row still looks the way it was read. When a write
    /// loses a race against another process, the row is read again and ownership is
    /// reported from storage.
    ///
    /// # Arguments
    /// - `duty` - Name of the duty
    /// - `owner_id` - Identity of the caller, unique per running process
    /// - `process_id` - Diagnostic process identifier stored alongside the lease
    /// - `ttl_seconds` - Lease length from now
    ///
    /// # Returns
    /// - `Ok(LockAcquisition)` - Whether the caller holds the lease, plus the stored row
    /// - `Err(AppError::DbErr)` - Storage failure
    pub async fn acquire_lock(
        &self,
        duty: &str,
        owner_id: &str,
        process_id: &str,
        ttl_seconds: u64,
    ) -> Result<LockAcquisition, AppError> {
        let repo = InstanceLockRepository::new(&self.db);
        let now = self.clock.now();
        let param = ClaimInstanceLockParam {
            duty: duty.to_string(),
            owner_id: owner_id.to_string(),
            process_id: process_id.to_string(),
            expires_at: add_duration(now, Duration::from_secs(ttl_seconds)),
            acquired_at: now,
        };

        let written = match repo.get(duty).await? {
            None => repo.insert_if_absent(param).await?,
            Some(current) if current.is_active(now) => {
                if current.owner_id.as_deref() != Some(owner_id) {
                    debug!(
                        "Duty {} is held by {:?} until {:?}",
                        duty, current.owner_id, current.expires_at
                    );

                    return Ok(LockAcquisition {
                        acquired: false,
                        lock: current,
                    });
                }

                repo.extend(duty, owner_id, param.expires_at).await?
            }
            Some(current) => {
                repo.compare_and_claim(param, current.owner_id.as_deref(), current.expires_at)
                    .await?
            }
        };

        let lock = repo.get(duty).await?.ok_or_else(|| {
            AppError::InternalError(format!("Lease row for duty {} vanished", duty))
        })?;
        let acquired = written || lock.is_held_by(owner_id, now);

        if !acquired {
            debug!("Lost the race for duty {} to {:?}", duty, lock.owner_id);
        }

        Ok(LockAcquisition { acquired, lock })
    }

    /// Extends the lease on `duty` by `ttl_seconds` from now if `owner_id` still holds it.
    ///
    /// Applies even if the lease has lapsed, as long as nobody else has taken it over.
    ///
    /// # Returns
    /// - `Ok(true)` - The lease was extended
    /// - `Ok(false)` - Another owner holds the duty, or it was released
    /// - `Err(AppError::DbErr)` - Storage failure
    pub async fn heartbeat(
        &self,
        duty: &str,
        owner_id: &str,
        ttl_seconds: u64,
    ) -> Result<bool, AppError> {
        let repo = InstanceLockRepository::new(&self.db);
        let expires_at = add_duration(self.clock.now(), Duration::from_secs(ttl_seconds));

        Ok(repo.extend(duty, owner_id, expires_at).await?)
    }

    /// Releases `duty` so it can be acquired immediately. No-op unless held by `owner_id`.
    ///
    /// # Returns
    /// - `Ok(true)` - The lease was released
    /// - `Ok(false)` - `owner_id` did not hold the lease
    /// - `Err(AppError::DbErr)` - Storage failure
    pub async fn release(&self, duty: &str, owner_id: &str) -> Result<bool, AppError> {
        let repo = InstanceLockRepository::new(&self.db);

        Ok(repo.clear_owner(duty, owner_id).await?)
    }

    /// Gets the lease row for `duty`, `None` if it was never acquired
    pub async fn get_lock(&self, duty: &str) -> Result<Option<InstanceLock>, AppError> {
        let repo = InstanceLockRepository::new(&self.db);

        Ok(repo.get(duty).await?)
    }
}
