//! Background duties driven by cron jobs.
//!
//! - `duty` - Lease-guarded runner deciding whether this process performs a duty
//! - `reminders` - Job scheduler wiring the heartbeat and the contest reminder duty

pub mod duty;
pub mod reminders;
