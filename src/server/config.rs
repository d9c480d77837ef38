use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::server::{
    api::client::DEFAULT_API_URL,
    error::{config::ConfigError, AppError},
};

const DEFAULT_API_TIMEOUT_SECS: u64 = 15;
const DEFAULT_MIN_REQUEST_DELAY_MS: u64 = 2000;
const DEFAULT_INSTANCE_LOCK_TTL_SECS: u64 = 90;
const DEFAULT_HEARTBEAT_SECS: u64 = 30;
const DEFAULT_REMINDER_CRON: &str = "0 * * * * *";
const DEFAULT_REMINDER_WINDOW_MINUTES: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,

    pub codeforces_api_url: String,
    pub api_timeout: Duration,
    pub min_request_delay: Duration,
    /// Newline-delimited proxy list; unset means direct access only.
    pub proxy_list_url: Option<String>,

    pub instance_lock_ttl_seconds: u64,
    /// Always shorter than the lease TTL.
    pub heartbeat_interval: Duration,
    pub reminder_cron: String,
    pub reminder_window: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let database_url =
            var("DATABASE_URL").ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?;

        let codeforces_api_url = match var("CODEFORCES_API_URL") {
            Some(value) => parse_url("CODEFORCES_API_URL", value)?,
            None => DEFAULT_API_URL.to_string(),
        };
        let proxy_list_url = var("PROXY_LIST_URL")
            .map(|value| parse_url("PROXY_LIST_URL", value))
            .transpose()?;

        let api_timeout = Duration::from_secs(parse_or(
            "CODEFORCES_API_TIMEOUT_SECS",
            var("CODEFORCES_API_TIMEOUT_SECS"),
            DEFAULT_API_TIMEOUT_SECS,
        )?);
        let min_request_delay = Duration::from_millis(parse_or(
            "CODEFORCES_MIN_REQUEST_DELAY_MS",
            var("CODEFORCES_MIN_REQUEST_DELAY_MS"),
            DEFAULT_MIN_REQUEST_DELAY_MS,
        )?);
        let instance_lock_ttl_seconds = parse_or(
            "INSTANCE_LOCK_TTL_SECS",
            var("INSTANCE_LOCK_TTL_SECS"),
            DEFAULT_INSTANCE_LOCK_TTL_SECS,
        )?;
        let heartbeat_seconds = parse_or(
            "INSTANCE_HEARTBEAT_SECS",
            var("INSTANCE_HEARTBEAT_SECS"),
            DEFAULT_HEARTBEAT_SECS,
        )?;
        let reminder_window_minutes: u64 = parse_or(
            "REMINDER_WINDOW_MINUTES",
            var("REMINDER_WINDOW_MINUTES"),
            DEFAULT_REMINDER_WINDOW_MINUTES,
        )?;

        if instance_lock_ttl_seconds == 0 {
            return Err(ConfigError::InvalidEnvVar {
                name: "INSTANCE_LOCK_TTL_SECS".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        if heartbeat_seconds == 0 || heartbeat_seconds >= instance_lock_ttl_seconds {
            return Err(ConfigError::InvalidEnvVar {
                name: "INSTANCE_HEARTBEAT_SECS".to_string(),
                value: heartbeat_seconds.to_string(),
            }
            .into());
        }

        Ok(Self {
            database_url,
            codeforces_api_url,
            api_timeout,
            min_request_delay,
            proxy_list_url,
            instance_lock_ttl_seconds,
            heartbeat_interval: Duration::from_secs(heartbeat_seconds),
            reminder_cron: var("REMINDER_CRON").unwrap_or_else(|| DEFAULT_REMINDER_CRON.to_string()),
            reminder_window: Duration::from_secs(reminder_window_minutes * 60),
        })
    }
}

fn parse_or<T: FromStr>(name: &str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

fn parse_url(name: &str, value: String) -> Result<String, ConfigError> {
    match Url::parse(&value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(value),
        _ => Err(ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn applies_defaults() {
        let config = config(&[("DATABASE_URL", "sqlite://cfbot.db?mode=rwc")]).unwrap();

        assert_eq!(config.codeforces_api_url, DEFAULT_API_URL);
        assert_eq!(config.api_timeout, Duration::from_secs(15));
        assert_eq!(config.min_request_delay, Duration::from_millis(2000));
        assert!(config.proxy_list_url.is_none());
        assert_eq!(config.instance_lock_ttl_seconds, 90);
        assert_eq!(config.heartbeat_interval, Duration::from_secs(30));
        assert_eq!(config.reminder_cron, "0 * * * * *");
        assert_eq!(config.reminder_window, Duration::from_secs(3600));
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("CODEFORCES_API_URL", "http://127.0.0.1:8080/api"),
            ("CODEFORCES_API_TIMEOUT_SECS", "3"),
            ("CODEFORCES_MIN_REQUEST_DELAY_MS", "500"),
            ("PROXY_LIST_URL", "https://example.com/proxies.txt"),
            ("INSTANCE_LOCK_TTL_SECS", "30"),
            ("INSTANCE_HEARTBEAT_SECS", "10"),
            ("REMINDER_WINDOW_MINUTES", "15"),
        ])
        .unwrap();

        assert_eq!(config.codeforces_api_url, "http://127.0.0.1:8080/api");
        assert_eq!(config.api_timeout, Duration::from_secs(3));
        assert_eq!(config.min_request_delay, Duration::from_millis(500));
        assert_eq!(
            config.proxy_list_url.as_deref(),
            Some("https://example.com/proxies.txt")
        );
        assert_eq!(config.instance_lock_ttl_seconds, 30);
        assert_eq!(config.heartbeat_interval, Duration::from_secs(10));
        assert_eq!(config.reminder_window, Duration::from_secs(900));
    }

    #[test]
    fn missing_database_url() {
        let err = config(&[]).unwrap_err();

        assert!(matches!(
            err,
            AppError::ConfigErr(ConfigError::MissingEnvVar(ref name)) if name == "DATABASE_URL"
        ));
    }

    #[test]
    fn blank_value_counts_as_unset() {
        let config = config(&[("DATABASE_URL", "sqlite::memory:"), ("PROXY_LIST_URL", "  ")]).unwrap();

        assert!(config.proxy_list_url.is_none());
    }

    #[test]
    fn rejects_non_numeric_delay() {
        let err = config(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("CODEFORCES_MIN_REQUEST_DELAY_MS", "fast"),
        ])
        .unwrap_err();

        assert!(matches!(
            err,
            AppError::ConfigErr(ConfigError::InvalidEnvVar { ref name, ref value })
                if name == "CODEFORCES_MIN_REQUEST_DELAY_MS" && value == "fast"
        ));
    }

    #[test]
    fn rejects_zero_lock_ttl() {
        let err = config(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("INSTANCE_LOCK_TTL_SECS", "0"),
        ])
        .unwrap_err();

        assert!(matches!(err, AppError::ConfigErr(ConfigError::InvalidEnvVar { .. })));
    }

    #[test]
    fn rejects_heartbeat_not_shorter_than_lock_ttl() {
        let err = config(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("INSTANCE_LOCK_TTL_SECS", "20"),
            ("INSTANCE_HEARTBEAT_SECS", "20"),
        ])
        .unwrap_err();

        assert!(matches!(
            err,
            AppError::ConfigErr(ConfigError::InvalidEnvVar { ref name, .. })
                if name == "INSTANCE_HEARTBEAT_SECS"
        ));

        // The default heartbeat is too slow for a lease this short.
        let err = config(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("INSTANCE_LOCK_TTL_SECS", "15"),
        ])
        .unwrap_err();

        assert!(matches!(err, AppError::ConfigErr(ConfigError::InvalidEnvVar { .. })));
    }

    #[test]
    fn rejects_non_http_proxy_list_url() {
        let err = config(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("PROXY_LIST_URL", "ftp://example.com/list"),
        ])
        .unwrap_err();

        assert!(matches!(err, AppError::ConfigErr(ConfigError::InvalidEnvVar { .. })));
    }
}
