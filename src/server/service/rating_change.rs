use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;

use crate::server::{
    api::CodeforcesClient,
    error::AppError,
    model::{
        codeforces::RatingChange,
        fetch::{Fetched, ServiceError},
    },
    service::cache::{CacheService, LastErrorTracker},
    util::clock::Clock,
};

pub const RATING_CHANGES_DOMAIN: &str = "rating_changes";
/// Rating changes of a finished contest are effectively immutable.
pub const RATING_CHANGES_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Cache-backed access to per-contest rating changes.
#[derive(Clone)]
pub struct RatingChangeService {
    cache: CacheService,
    client: CodeforcesClient,
    last_error: LastErrorTracker,
}

impl RatingChangeService {
    pub fn new(db: DatabaseConnection, client: CodeforcesClient, clock: Arc<dyn Clock>) -> Self {
        Self {
            cache: CacheService::new(db, RATING_CHANGES_DOMAIN, clock),
            client,
            last_error: LastErrorTracker::new(),
        }
    }

    /// Gets the rating changes of `contest_id`
    pub async fn get_rating_changes(
        &self,
        contest_id: i64,
    ) -> Result<Fetched<Vec<RatingChange>>, AppError> {
        let key = format!("contest:{}", contest_id);

        self.cache
            .fetch_with_fallback(&key, RATING_CHANGES_TTL, &self.last_error, || {
                self.client.contest_rating_changes(contest_id)
            })
            .await
    }

    pub async fn last_error(&self) -> Option<ServiceError> {
        self.last_error.get().await
    }
}
