use crate::server::{
    data::instance_lock::InstanceLockRepository, error::AppError,
    model::instance_lock::ClaimInstanceLockParam,
};
use chrono::{DateTime, TimeDelta, Utc};
use test_utils::{builder::TestBuilder, factory::instance_lock::InstanceLockFactory};

mod clear_owner;
mod compare_and_claim;
mod extend;
mod insert_if_absent;

fn claim(duty: &str, owner_id: &str, now: DateTime<Utc>, ttl: i64) -> ClaimInstanceLockParam {
    ClaimInstanceLockParam {
        duty: duty.to_string(),
        owner_id: owner_id.to_string(),
        process_id: "100".to_string(),
        expires_at: now + TimeDelta::seconds(ttl),
        acquired_at: now,
    }
}
