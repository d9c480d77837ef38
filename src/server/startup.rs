use std::sync::Arc;
use tracing::info;

use crate::server::{
    config::Config,
    error::AppError,
    proxy::{source::load_proxy_list, RequestScheduler},
    util::clock::Clock,
};

/// Connects to the Sqlite database and runs pending migrations.
///
/// Establishes a connection pool to the Sqlite database using the connection string from
/// configuration, then automatically runs all pending SeaORM migrations so the
/// `cache_entry` and `instance_lock` tables exist before any service touches them.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(AppError::DbErr)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<sea_orm::DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Builds the HTTP client used for startup fetches such as the proxy list.
///
/// Redirects are not followed.
pub fn setup_reqwest_client() -> Result<reqwest::Client, AppError> {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    Ok(client)
}

/// Builds the request scheduler from the configured proxy source.
///
/// Without `PROXY_LIST_URL`, or when the list is unreachable or contains no usable
/// entries, the pool consists of the single direct path.
///
/// # Arguments
/// - `config` - Application configuration with the proxy source and request spacing
/// - `http` - Client used to fetch the proxy list
/// - `clock` - Time source for request spacing
///
/// # Returns
/// - `Ok(RequestScheduler)` - Scheduler with at least one egress path
/// - `Err(AppError::ReqwestErr)` - The direct client could not be built
pub async fn setup_request_scheduler(
    config: &Config,
    http: &reqwest::Client,
    clock: Arc<dyn Clock>,
) -> Result<RequestScheduler, AppError> {
    let endpoints = match &config.proxy_list_url {
        Some(url) => load_proxy_list(http, url).await,
        None => Vec::new(),
    };

    let scheduler = RequestScheduler::from_proxies(endpoints, config.min_request_delay, clock)?;

    info!(
        "Request scheduler ready with {} egress path(s): {}",
        scheduler.size(),
        scheduler
            .paths()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(scheduler)
}
