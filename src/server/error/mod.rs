//! Error types for the application.
//!
//! `AppError` is the top-level error that service, repository and scheduler code returns.
//! It wraps the domain-specific errors: `ApiError` for upstream access, `ConfigError` for
//! startup configuration, and `ProxyLineError` for individual proxy list lines.

pub mod api;
pub mod config;
pub mod proxy;

use thiserror::Error;

use crate::server::error::{api::ApiError, config::ConfigError};

/// Top-level application error type.
///
/// Most variants use `#[from]` for automatic conversion with `?`. Upstream failures stay
/// typed inside `ApiErr` so callers can tell transport problems from upstream rejections.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Database operation error from SeaORM.
    ///
    /// Raised by the cache and instance lock repositories. Data services log it and degrade
    /// to "no data" rather than crashing.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Upstream API access failed.
    #[error(transparent)]
    ApiErr(#[from] ApiError),

    /// HTTP client construction or proxy source fetch error.
    #[error(transparent)]
    ReqwestErr(#[from] reqwest::Error),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// Internal error with custom message.
    ///
    /// # Fields
    /// - Detailed error message for logging
    #[error("{0}")]
    InternalError(String),
}

impl AppError {
    /// Returns the upstream error if this failure came from the API client.
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::ApiErr(err) => Some(err),
            _ => None,
        }
    }
}
