//! Shared services constructed once at startup.
//!
//! `AppServices` bundles every service the duty jobs and the binary need. It is built
//! once in `main` and cloned into each scheduled job; all fields are cheap to clone:
//! - `DatabaseConnection` is a connection pool (clones share the pool)
//! - `CodeforcesClient` shares one `RequestScheduler` through an `Arc`
//! - each data service shares its last-error slot through an `Arc`

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::server::{
    api::CodeforcesClient,
    service::{
        contest::ContestService, instance_lock::InstanceLockService, problem::ProblemService,
        rating_change::RatingChangeService, submission::SubmissionService,
    },
    util::clock::Clock,
};

#[derive(Clone)]
pub struct AppServices {
    pub problems: ProblemService,
    pub rating_changes: RatingChangeService,
    pub submissions: SubmissionService,
    pub contests: ContestService,
    pub instance_lock: InstanceLockService,
}

impl AppServices {
    /// Creates every service over one database, one API client and one clock.
    ///
    /// # Arguments
    /// - `db` - Database connection pool
    /// - `client` - Codeforces client shared by the data services
    /// - `clock` - Time source for cache freshness and lease expiry
    ///
    /// # Returns
    /// - `AppServices` - Initialized services ready for use
    pub fn new(db: DatabaseConnection, client: CodeforcesClient, clock: Arc<dyn Clock>) -> Self {
        Self {
            problems: ProblemService::new(db.clone(), client.clone(), clock.clone()),
            rating_changes: RatingChangeService::new(db.clone(), client.clone(), clock.clone()),
            submissions: SubmissionService::new(db.clone(), client.clone(), clock.clone()),
            contests: ContestService::new(db.clone(), client, clock.clone()),
            instance_lock: InstanceLockService::new(db, clock),
        }
    }
}
