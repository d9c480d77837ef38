//! Instance lock factory for creating test lease rows.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test instance locks with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::instance_lock::InstanceLockFactory;
///
/// let lock = InstanceLockFactory::new(&db)
///     .duty("reminders")
///     .owner_id(Some("other-instance".to_string()))
///     .expires_at(Some(Utc::now() - Duration::seconds(5)))
///     .build()
///     .await?;
/// ```
pub struct InstanceLockFactory<'a> {
    db: &'a DatabaseConnection,
    duty: String,
    owner_id: Option<String>,
    process_id: String,
    expires_at: Option<DateTime<Utc>>,
    acquired_at: DateTime<Utc>,
}

impl<'a> InstanceLockFactory<'a> {
    /// Creates a new InstanceLockFactory with default values.
    ///
    /// Defaults:
    /// - duty: `"duty_{id}"` where id is auto-incremented
    /// - owner_id: `Some("owner_{id}")`
    /// - process_id: `"1"`
    /// - expires_at: one minute from now
    /// - acquired_at: current time
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the row
    ///
    /// # Returns
    /// - `InstanceLockFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        let now = Utc::now();
        Self {
            db,
            duty: format!("duty_{}", id),
            owner_id: Some(format!("owner_{}", id)),
            process_id: "1".to_string(),
            expires_at: Some(now + Duration::seconds(60)),
            acquired_at: now,
        }
    }

    /// Sets the duty name.
    pub fn duty(mut self, duty: impl Into<String>) -> Self {
        self.duty = duty.into();
        self
    }

    /// Sets the holder, `None` for a released lock.
    pub fn owner_id(mut self, owner_id: Option<String>) -> Self {
        self.owner_id = owner_id;
        self
    }

    /// Sets the diagnostic process id.
    pub fn process_id(mut self, process_id: impl Into<String>) -> Self {
        self.process_id = process_id.into();
        self
    }

    /// Sets the lease expiry, `None` for a released lock.
    pub fn expires_at(mut self, expires_at: Option<DateTime<Utc>>) -> Self {
        self.expires_at = expires_at;
        self
    }

    /// Sets the acquisition time.
    pub fn acquired_at(mut self, acquired_at: DateTime<Utc>) -> Self {
        self.acquired_at = acquired_at;
        self
    }

    /// Builds and inserts the lock row into the database.
    ///
    /// # Returns
    /// - `Ok(entity::instance_lock::Model)` - Created lock row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::instance_lock::Model, DbErr> {
        entity::instance_lock::ActiveModel {
            duty: ActiveValue::Set(self.duty),
            owner_id: ActiveValue::Set(self.owner_id),
            process_id: ActiveValue::Set(self.process_id),
            expires_at: ActiveValue::Set(self.expires_at),
            acquired_at: ActiveValue::Set(self.acquired_at),
        }
        .insert(self.db)
        .await
    }
}

/// Creates an active instance lock with default values.
///
/// Shorthand for `InstanceLockFactory::new(db).build().await`.
pub async fn create_instance_lock(
    db: &DatabaseConnection,
) -> Result<entity::instance_lock::Model, DbErr> {
    InstanceLockFactory::new(db).build().await
}
