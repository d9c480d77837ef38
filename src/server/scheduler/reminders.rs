use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

use crate::server::{
    config::Config, error::AppError, scheduler::duty::DutyRunner,
    service::contest::ContestService, util::clock::Clock,
};

/// Name of the lease guarding contest reminders.
pub const REMINDER_DUTY: &str = "contest_reminders";

/// Starts the lease heartbeat and contest reminder jobs
///
/// The heartbeat job ticks `runner` every `config.heartbeat_interval`, acquiring or
/// renewing the lease. The reminder job runs on `config.reminder_cron` but only does work
/// while this process holds an unexpired lease, so each reminder run happens in exactly
/// one instance.
///
/// # Arguments
/// - `runner`: Lease holder for the reminder duty
/// - `contests`: Contest service used by the reminder job
/// - `clock`: Time source for the reminder window
/// - `config`: Heartbeat interval, reminder cron expression and reminder window
///
/// # Returns
/// - `Ok(JobScheduler)` - The running scheduler, for shutdown
/// - `Err(AppError::SchedulerErr)` - Invalid cron expression or scheduler failure
pub async fn start_scheduler(
    runner: Arc<DutyRunner>,
    contests: ContestService,
    clock: Arc<dyn Clock>,
    config: &Config,
) -> Result<JobScheduler, AppError> {
    let scheduler = JobScheduler::new().await?;

    let heartbeat_runner = runner.clone();
    let heartbeat_job = Job::new_repeated_async(config.heartbeat_interval, move |_uuid, _lock| {
        let runner = heartbeat_runner.clone();

        Box::pin(async move {
            runner.tick().await;
        })
    })?;

    let window = config.reminder_window;
    let reminder_job = Job::new_async(config.reminder_cron.as_str(), move |_uuid, _lock| {
        let runner = runner.clone();
        let contests = contests.clone();
        let clock = clock.clone();

        Box::pin(async move {
            if !runner.is_active() {
                return;
            }

            if let Err(e) = process_reminders(&contests, clock.now(), window).await {
                error!("Error processing contest reminders: {}", e);
            }
        })
    })?;

    scheduler.add(heartbeat_job).await?;
    scheduler.add(reminder_job).await?;
    scheduler.start().await?;

    info!("Duty scheduler started");

    Ok(scheduler)
}

/// Logs the contests starting within `window` of `now`
///
/// Delivery of the reminders is left to consumers of the returned list.
///
/// # Returns
/// - `Ok(usize)` - Number of contests due for a reminder
/// - `Err(AppError)` - Neither the upstream nor the cache had a contest list
pub async fn process_reminders(
    contests: &ContestService,
    now: DateTime<Utc>,
    window: Duration,
) -> Result<usize, AppError> {
    let upcoming = contests.upcoming(now, window).await?;

    if upcoming.is_stale {
        warn!(
            "Contest list is stale (fetched {}), reminders may be outdated",
            upcoming.fetched_at
        );
    }

    for contest in &upcoming.data {
        if let Some(start) = contest.start_time() {
            info!(
                "Reminder due: {} ({}) starts at {} [{}]",
                contest.name,
                contest.id,
                start,
                upcoming.source.as_str()
            );
        }
    }

    info!("{} contest(s) due for a reminder", upcoming.data.len());

    Ok(upcoming.data.len())
}
