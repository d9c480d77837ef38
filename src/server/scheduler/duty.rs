use chrono::{DateTime, Utc};
use rand::Rng;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::server::{
    error::AppError,
    service::instance_lock::InstanceLockService,
    util::clock::add_duration,
};

/// Stored in `lease_expires_ms` while the runner holds no lease.
const NO_LEASE: i64 = i64::MIN;

/// Lease holder for one duty in this process.
///
/// Each [`tick`](DutyRunner::tick) either renews the lease (while held) or tries to
/// take it (while inactive), so at most one process across all instances sharing the
/// database considers itself active for the duty at a time. A process that crashes stops
/// heartbeating and another one takes over once the lease lapses.
///
/// The runner remembers the expiry of the lease it last wrote, and stops reporting active
/// once that instant passes even if no tick has run since.
pub struct DutyRunner {
    duty: String,
    owner_id: String,
    process_id: String,
    ttl_seconds: u64,
    lock_service: InstanceLockService,
    /// Lease expiry in epoch milliseconds, rounded down, or [`NO_LEASE`].
    lease_expires_ms: AtomicI64,
}

impl DutyRunner {
    /// Creates an inactive runner with a freshly generated owner id.
    ///
    /// # Arguments
    /// - `duty` - Name of the duty to hold
    /// - `lock_service` - Lease storage shared with other processes
    /// - `ttl_seconds` - Lease length granted by each acquisition or heartbeat
    ///
    /// # Returns
    /// - `DutyRunner` - Runner that becomes active on its first successful tick
    pub fn new(duty: impl Into<String>, lock_service: InstanceLockService, ttl_seconds: u64) -> Self {
        Self {
            duty: duty.into(),
            owner_id: generate_owner_id(),
            process_id: std::process::id().to_string(),
            ttl_seconds,
            lock_service,
            lease_expires_ms: AtomicI64::new(NO_LEASE),
        }
    }

    pub fn duty(&self) -> &str {
        &self.duty
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// Whether this runner holds the lease and its recorded expiry is still ahead.
    pub fn is_active(&self) -> bool {
        let now = self.lock_service.clock().now().timestamp_millis();

        now < self.lease_expires_ms.load(Ordering::SeqCst)
    }

    fn holds_lease(&self) -> bool {
        self.lease_expires_ms.load(Ordering::SeqCst) != NO_LEASE
    }

    fn record_lease(&self, expires_at: DateTime<Utc>) {
        self.lease_expires_ms
            .store(expires_at.timestamp_millis(), Ordering::SeqCst);
    }

    fn drop_lease(&self) {
        self.lease_expires_ms.store(NO_LEASE, Ordering::SeqCst);
    }

    /// Renews or acquires the lease and records its new expiry.
    ///
    /// A runner that still holds the lease renews it with a heartbeat, even when the lease
    /// has lapsed locally, and otherwise tries to acquire it. Storage failures are logged
    /// and leave the runner inactive, since ownership can no longer be confirmed.
    ///
    /// # Returns
    /// - `bool` - Whether the runner is active after the tick
    pub async fn tick(&self) -> bool {
        if self.holds_lease() {
            // Never later than the expiry the heartbeat writes.
            let expires_at = add_duration(
                self.lock_service.clock().now(),
                Duration::from_secs(self.ttl_seconds),
            );

            match self
                .lock_service
                .heartbeat(&self.duty, &self.owner_id, self.ttl_seconds)
                .await
            {
                Ok(true) => {
                    debug!("Renewed lease on {}", self.duty);
                    self.record_lease(expires_at);
                }
                Ok(false) => {
                    warn!("Lost lease on {} to another instance", self.duty);
                    self.drop_lease();
                }
                Err(e) => {
                    error!("Failed to renew lease on {}: {}", self.duty, e);
                    self.drop_lease();
                }
            }
        } else {
            match self
                .lock_service
                .acquire_lock(&self.duty, &self.owner_id, &self.process_id, self.ttl_seconds)
                .await
            {
                Ok(acquisition) if acquisition.acquired => match acquisition.lock.expires_at {
                    Some(expires_at) => {
                        info!(
                            "Acquired lease on {} as {} (process {}) until {}",
                            self.duty, self.owner_id, self.process_id, expires_at
                        );
                        self.record_lease(expires_at);
                    }
                    None => error!("Acquired lease on {} has no expiry", self.duty),
                },
                Ok(acquisition) => debug!(
                    "Duty {} is held by {:?} (process {})",
                    self.duty, acquisition.lock.owner_id, acquisition.lock.process_id
                ),
                Err(e) => error!("Failed to acquire lease on {}: {}", self.duty, e),
            }
        }

        self.is_active()
    }

    /// Releases the lease if held and forgets it locally.
    ///
    /// # Returns
    /// - `Ok(true)` - The lease was held and is now released
    /// - `Ok(false)` - This runner did not hold the lease
    /// - `Err(AppError::DbErr)` - Storage failure
    pub async fn shutdown(&self) -> Result<bool, AppError> {
        self.drop_lease();

        let released = self.lock_service.release(&self.duty, &self.owner_id).await?;
        if released {
            info!("Released lease on {}", self.duty);
        }

        Ok(released)
    }
}

/// Generates a random 16-character alphanumeric owner id.
fn generate_owner_id() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                             abcdefghijklmnopqrstuvwxyz\
                             0123456789";
    const OWNER_ID_LENGTH: usize = 16;

    let mut rng = rand::rng();

    (0..OWNER_ID_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
