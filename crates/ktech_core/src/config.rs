//! Runtime configuration.
//!
//! # Responsibility
//! - Provide defaults for storage, logging, auth latency, notification
//!   cadence and the demo feed.
//! - Apply `KTECH_*` environment overrides with validation.
//!
//! # Invariants
//! - Invalid overrides are errors, never silently ignored.
//! - Unset or blank variables keep the default.

use crate::feed::{DEFAULT_FEED_LIMIT, DEFAULT_FEED_URL};
use crate::logging::{default_log_level, normalize_level};
use crate::service::auth_service::DEFAULT_AUTH_LATENCY;
use crate::service::notifications::DEFAULT_SCAN_INTERVAL_SECS;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DB_FILE_NAME: &str = "ktech.sqlite3";

pub const ENV_DB_PATH: &str = "KTECH_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "KTECH_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "KTECH_LOG_DIR";
pub const ENV_AUTH_LATENCY_MS: &str = "KTECH_AUTH_LATENCY_MS";
pub const ENV_NOTIFICATION_INTERVAL_SECS: &str = "KTECH_NOTIFICATION_INTERVAL_SECS";
pub const ENV_FEED_URL: &str = "KTECH_FEED_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// File logging is off when unset.
    pub log_dir: Option<PathBuf>,
    pub auth_latency: Duration,
    pub notification_interval: chrono::Duration,
    pub feed_url: String,
    pub feed_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
            auth_latency: DEFAULT_AUTH_LATENCY,
            notification_interval: chrono::Duration::seconds(DEFAULT_SCAN_INTERVAL_SECS),
            feed_url: DEFAULT_FEED_URL.to_string(),
            feed_limit: DEFAULT_FEED_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}=`{}`: {}", self.key, self.value, self.reason)
    }
}

impl Error for ConfigError {}

impl AppConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup(key)` values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(value.trim());
        }
        if let Some(value) = read(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&value).map_err(|err| ConfigError {
                key: ENV_LOG_LEVEL,
                value: value.clone(),
                reason: err.to_string(),
            })?;
        }
        if let Some(value) = read(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(value.trim()));
        }
        if let Some(value) = read(ENV_AUTH_LATENCY_MS) {
            let millis = parse_number(ENV_AUTH_LATENCY_MS, &value)?;
            config.auth_latency = Duration::from_millis(millis);
        }
        if let Some(value) = read(ENV_NOTIFICATION_INTERVAL_SECS) {
            config.notification_interval = parse_interval(&value)?;
        }
        if let Some(value) = read(ENV_FEED_URL) {
            let trimmed = value.trim();
            if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                return Err(ConfigError {
                    key: ENV_FEED_URL,
                    value: value.clone(),
                    reason: "expected an http(s) URL".to_string(),
                });
            }
            config.feed_url = trimmed.to_string();
        }

        Ok(config)
    }
}

fn parse_number(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|err| ConfigError {
        key,
        value: value.to_string(),
        reason: err.to_string(),
    })
}

fn parse_interval(value: &str) -> Result<chrono::Duration, ConfigError> {
    let invalid = |reason: &str| ConfigError {
        key: ENV_NOTIFICATION_INTERVAL_SECS,
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let secs = parse_number(ENV_NOTIFICATION_INTERVAL_SECS, value)?;
    if secs == 0 {
        return Err(invalid("interval must be at least one second"));
    }
    let secs = i64::try_from(secs).map_err(|_| invalid("interval is out of range"))?;
    chrono::Duration::try_seconds(secs).ok_or_else(|| invalid("interval is out of range"))
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ENV_AUTH_LATENCY_MS, ENV_DB_PATH, ENV_FEED_URL, ENV_LOG_LEVEL};
    use super::ENV_NOTIFICATION_INTERVAL_SECS;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.auth_latency, Duration::from_secs(1));
        assert_eq!(config.notification_interval.num_seconds(), 300);
    }

    #[test]
    fn overrides_are_applied() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, "/tmp/ktech.db"),
            (ENV_LOG_LEVEL, "WARNING"),
            (ENV_AUTH_LATENCY_MS, "0"),
            (ENV_NOTIFICATION_INTERVAL_SECS, "60"),
            (ENV_FEED_URL, "http://localhost:9000/todos"),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/ktech.db"));
        assert_eq!(config.log_level, "warn");
        assert!(config.auth_latency.is_zero());
        assert_eq!(config.notification_interval.num_seconds(), 60);
        assert_eq!(config.feed_url, "http://localhost:9000/todos");
    }

    #[test]
    fn invalid_overrides_are_rejected() {
        let err = AppConfig::from_lookup(lookup(&[(ENV_AUTH_LATENCY_MS, "soon")])).unwrap_err();
        assert_eq!(err.key, ENV_AUTH_LATENCY_MS);

        let err =
            AppConfig::from_lookup(lookup(&[(ENV_NOTIFICATION_INTERVAL_SECS, "0")])).unwrap_err();
        assert_eq!(err.key, ENV_NOTIFICATION_INTERVAL_SECS);

        assert!(AppConfig::from_lookup(lookup(&[(ENV_FEED_URL, "ftp://x")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[(ENV_LOG_LEVEL, "chatty")])).is_err());
    }

    #[test]
    fn out_of_range_intervals_are_rejected() {
        let too_long = "10000000000000000";
        let err =
            AppConfig::from_lookup(lookup(&[(ENV_NOTIFICATION_INTERVAL_SECS, too_long)])).unwrap_err();
        assert_eq!(err.key, ENV_NOTIFICATION_INTERVAL_SECS);
        assert!(err.reason.contains("out of range"));

        let max = u64::MAX.to_string();
        let err =
            AppConfig::from_lookup(lookup(&[(ENV_NOTIFICATION_INTERVAL_SECS, max.as_str())]))
                .unwrap_err();
        assert_eq!(err.key, ENV_NOTIFICATION_INTERVAL_SECS);
        assert!(err.reason.contains("out of range"));
    }
}
