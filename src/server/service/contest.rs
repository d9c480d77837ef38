use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;

use crate::server::{
    api::CodeforcesClient,
    error::AppError,
    model::{
        codeforces::Contest,
        fetch::{Fetched, ServiceError},
    },
    service::cache::{CacheService, LastErrorTracker},
    util::clock::{add_duration, Clock},
};

pub const CONTESTS_DOMAIN: &str = "contests";
const CONTEST_LIST_KEY: &str = "contest_list";
pub const CONTESTS_TTL: Duration = Duration::from_secs(30 * 60);

/// Cache-backed access to the (non-gym) contest list.
#[derive(Clone)]
pub struct ContestService {
    cache: CacheService,
    client: CodeforcesClient,
    last_error: LastErrorTracker,
}

impl ContestService {
    pub fn new(db: DatabaseConnection, client: CodeforcesClient, clock: Arc<dyn Clock>) -> Self {
        Self {
            cache: CacheService::new(db, CONTESTS_DOMAIN, clock),
            client,
            last_error: LastErrorTracker::new(),
        }
    }

    /// Gets every contest the upstream lists, including finished ones
    pub async fn get_contests(&self) -> Result<Fetched<Vec<Contest>>, AppError> {
        self.cache
            .fetch_with_fallback(CONTEST_LIST_KEY, CONTESTS_TTL, &self.last_error, || {
                self.client.contest_list(false)
            })
            .await
    }

    /// Gets the contests that have not started and start within `window` of `now`.
    ///
    /// The result is sorted by start time and keeps the provenance of the contest list it
    /// was filtered from, so a stale list yields a stale result.
    pub async fn upcoming(
        &self,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<Fetched<Vec<Contest>>, AppError> {
        let contests = self.get_contests().await?;

        Ok(contests.map(|contests| starting_within(contests, now, window)))
    }

    pub async fn last_error(&self) -> Option<ServiceError> {
        self.last_error.get().await
    }
}

fn starting_within(contests: Vec<Contest>, now: DateTime<Utc>, window: Duration) -> Vec<Contest> {
    let until = add_duration(now, window);

    let mut upcoming: Vec<Contest> = contests
        .into_iter()
        .filter(|contest| contest.is_upcoming())
        .filter(|contest| {
            contest
                .start_time()
                .is_some_and(|start| start >= now && start <= until)
        })
        .collect();
    upcoming.sort_by_key(|contest| contest.start_time_seconds);

    upcoming
}
