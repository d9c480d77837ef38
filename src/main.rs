use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use cfbot::server::{
    api::CodeforcesClient,
    config::Config,
    error::AppError,
    scheduler::{
        duty::DutyRunner,
        reminders::{self, REMINDER_DUTY},
    },
    startup,
    state::AppServices,
    util::clock::{Clock, SystemClock},
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let config = Config::from_env()?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let db = startup::connect_to_database(&config).await?;
    let http_client = startup::setup_reqwest_client()?;
    let request_scheduler =
        startup::setup_request_scheduler(&config, &http_client, clock.clone()).await?;

    let client = CodeforcesClient::new(
        config.codeforces_api_url.clone(),
        config.api_timeout,
        request_scheduler,
    );
    let services = AppServices::new(db, client, clock.clone());

    tracing::info!("Starting cfbot");

    let runner = Arc::new(DutyRunner::new(
        REMINDER_DUTY,
        services.instance_lock.clone(),
        config.instance_lock_ttl_seconds,
    ));
    runner.tick().await;

    let mut job_scheduler =
        reminders::start_scheduler(runner.clone(), services.contests.clone(), clock, &config)
            .await?;

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to listen for shutdown: {}", e)))?;

    tracing::info!("Shutting down");

    if let Err(e) = job_scheduler.shutdown().await {
        tracing::error!("Failed to stop duty scheduler: {}", e);
    }
    runner.shutdown().await?;

    Ok(())
}
