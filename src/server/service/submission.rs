use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::server::{
    api::CodeforcesClient,
    error::{api::ApiError, AppError},
    model::{
        codeforces::Submission,
        fetch::{Fetched, ServiceError},
    },
    service::cache::{CacheService, LastErrorTracker},
    util::{
        clock::Clock,
        poll::{poll_until, PollOptions, PollOutcome},
    },
};

pub const SUBMISSIONS_DOMAIN: &str = "submissions";
/// Submissions move quickly while a handle is active.
pub const SUBMISSIONS_TTL: Duration = Duration::from_secs(5 * 60);
/// Number of most recent submissions cached per handle.
const SUBMISSIONS_PAGE: u32 = 100;
/// Number of most recent submissions inspected by each verdict poll.
const RECENT_SUBMISSIONS: u32 = 10;

/// Cache-backed access to a handle's submissions.
#[derive(Clone)]
pub struct SubmissionService {
    cache: CacheService,
    client: CodeforcesClient,
    last_error: LastErrorTracker,
}

impl SubmissionService {
    pub fn new(db: DatabaseConnection, client: CodeforcesClient, clock: Arc<dyn Clock>) -> Self {
        Self {
            cache: CacheService::new(db, SUBMISSIONS_DOMAIN, clock),
            client,
            last_error: LastErrorTracker::new(),
        }
    }

    /// Gets the most recent submissions of `handle`, newest first
    pub async fn get_submissions(&self, handle: &str) -> Result<Fetched<Vec<Submission>>, AppError> {
        let key = format!("handle:{}", handle);

        self.cache
            .fetch_with_fallback(&key, SUBMISSIONS_TTL, &self.last_error, || {
                self.client.user_status(handle, 1, SUBMISSIONS_PAGE)
            })
            .await
    }

    /// Waits until `handle` has a compilation error on `problem_id` submitted at or after
    /// `since`.
    ///
    /// Polls the upstream directly, bypassing the cache, since a cached list would hide
    /// the verdict for up to the TTL. Upstream failures count as "not yet" and the loop
    /// keeps going until the deadline or `cancel`.
    ///
    /// # Arguments
    /// - `handle` - Codeforces handle to watch
    /// - `problem_id` - Problem identifier such as `1850A`
    /// - `since` - Earliest creation time of a matching submission
    /// - `options` - Poll timeout and interval
    /// - `cancel` - Stops the wait immediately, even mid-sleep
    ///
    /// # Returns
    /// - `PollOutcome<Submission>` - The matching submission if one appeared, and the
    ///   number of polls issued
    pub async fn wait_for_compilation_error(
        &self,
        handle: &str,
        problem_id: &str,
        since: DateTime<Utc>,
        options: PollOptions,
        cancel: &CancellationToken,
    ) -> PollOutcome<Submission> {
        let clock = self.cache.clock().clone();
        let client = &self.client;

        let outcome = poll_until(clock.as_ref(), options, cancel, move || async move {
            let submissions = client.user_status(handle, 1, RECENT_SUBMISSIONS).await?;

            Ok::<_, ApiError>(submissions.into_iter().find(|submission| {
                submission.is_compilation_error()
                    && submission.problem.id() == problem_id
                    && submission.created_at().is_some_and(|at| at >= since)
            }))
        })
        .await;

        if let Some(submission) = &outcome.value {
            info!(
                "Compilation error found for {} on {} (submission {}) after {} polls",
                handle, problem_id, submission.id, outcome.polls
            );
        }

        outcome
    }

    pub async fn last_error(&self) -> Option<ServiceError> {
        self.last_error.get().await
    }
}
