//! Domain models for instance lock (lease) data operations.

use chrono::{DateTime, Utc};

/// Lease record for one duty.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceLock {
    /// Name of the duty the lease guards.
    pub duty: String,
    /// Holder of the lease, `None` once released.
    pub owner_id: Option<String>,
    /// Diagnostic process id of the most recent holder.
    pub process_id: String,
    /// Absolute lease expiry, `None` once released.
    pub expires_at: Option<DateTime<Utc>>,
    /// When the current (or most recent) holder acquired the lease.
    pub acquired_at: DateTime<Utc>,
}

impl InstanceLock {
    /// Converts an entity model to an instance lock domain model at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The entity model from the database
    ///
    /// # Returns
    /// - `InstanceLock` - The converted instance lock domain model
    pub fn from_entity(entity: entity::instance_lock::Model) -> Self {
        Self {
            duty: entity.duty,
            owner_id: entity.owner_id,
            process_id: entity.process_id,
            expires_at: entity.expires_at,
            acquired_at: entity.acquired_at,
        }
    }

    /// A lease is active while it has an owner and `now < expires_at`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        match (&self.owner_id, self.expires_at) {
            (Some(_), Some(expires_at)) => now < expires_at,
            _ => false,
        }
    }

    /// Whether `owner_id` holds an active lease at `now`.
    pub fn is_held_by(&self, owner_id: &str, now: DateTime<Utc>) -> bool {
        self.is_active(now) && self.owner_id.as_deref() == Some(owner_id)
    }
}

/// Result of an acquisition attempt.
///
/// `acquired: false` is the normal answer under contention; `lock` then describes the
/// current holder.
#[derive(Debug, Clone, PartialEq)]
pub struct LockAcquisition {
    pub acquired: bool,
    pub lock: InstanceLock,
}

/// Parameters for writing a new holder into a lease row.
#[derive(Debug, Clone)]
pub struct ClaimInstanceLockParam {
    pub duty: String,
    pub owner_id: String,
    pub process_id: String,
    pub expires_at: DateTime<Utc>,
    pub acquired_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn lock(owner: Option<&str>, expires_in: Option<i64>, now: DateTime<Utc>) -> InstanceLock {
        InstanceLock {
            duty: "reminders".to_string(),
            owner_id: owner.map(str::to_string),
            process_id: "42".to_string(),
            expires_at: expires_in.map(|s| now + TimeDelta::seconds(s)),
            acquired_at: now,
        }
    }

    #[test]
    fn active_until_expiry() {
        let now = Utc::now();

        assert!(lock(Some("a"), Some(1), now).is_active(now));
        assert!(!lock(Some("a"), Some(0), now).is_active(now));
        assert!(!lock(Some("a"), Some(-5), now).is_active(now));
    }

    #[test]
    fn released_lock_is_inactive() {
        let now = Utc::now();

        assert!(!lock(None, None, now).is_active(now));
        assert!(!lock(None, Some(60), now).is_active(now));
    }

    #[test]
    fn held_by_checks_owner() {
        let now = Utc::now();
        let lease = lock(Some("a"), Some(60), now);

        assert!(lease.is_held_by("a", now));
        assert!(!lease.is_held_by("b", now));
    }
}
