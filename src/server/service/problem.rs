use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;

use crate::server::{
    api::CodeforcesClient,
    error::AppError,
    model::{
        codeforces::Problemset,
        fetch::{Fetched, ServiceError},
    },
    service::cache::{CacheService, LastErrorTracker},
    util::clock::Clock,
};

pub const PROBLEMS_DOMAIN: &str = "problems";
const PROBLEMSET_KEY: &str = "problemset";
/// The problemset changes only when a contest is added.
pub const PROBLEMS_TTL: Duration = Duration::from_secs(60 * 60);

/// Cache-backed access to the full problemset.
#[derive(Clone)]
pub struct ProblemService {
    cache: CacheService,
    client: CodeforcesClient,
    last_error: LastErrorTracker,
}

impl ProblemService {
    pub fn new(db: DatabaseConnection, client: CodeforcesClient, clock: Arc<dyn Clock>) -> Self {
        Self {
            cache: CacheService::new(db, PROBLEMS_DOMAIN, clock),
            client,
            last_error: LastErrorTracker::new(),
        }
    }

    /// Gets the problemset, refreshing it at most once per TTL
    pub async fn get_problems(&self) -> Result<Fetched<Problemset>, AppError> {
        self.cache
            .fetch_with_fallback(PROBLEMSET_KEY, PROBLEMS_TTL, &self.last_error, || {
                self.client.problemset_problems()
            })
            .await
    }

    pub async fn last_error(&self) -> Option<ServiceError> {
        self.last_error.get().await
    }
}
