//! Runtime configuration.
//!
//! Every field has a default; [`SandboxConfig::from_env`] overrides them from `SANDBOX_*`
//! environment variables. Durations use the same notation as merchant notify configs
//! (`"500ms"`, `"5s"`, `"1m30s"`).
//!
//! | Variable | Default |
//! |----------|---------|
//! | `SANDBOX_STORE_CAPACITY` | 32 |
//! | `SANDBOX_BROKER_CAPACITY` | 100 |
//! | `SANDBOX_SUBSCRIBER_CAPACITY` | 10 |
//! | `SANDBOX_HTTP_TIMEOUT` | 10s |
//! | `SANDBOX_USER_AGENT` | callback-sandbox/0.1 |
//! | `SANDBOX_MAX_CONCURRENT_RUNS` | 64 |
//! | `SANDBOX_MAX_QUEUED_RUNS` | 1024 |
//! | `SANDBOX_MIN_SKIP_SPACING` | 100ms |
//! | `SANDBOX_DEFAULT_MAX_ATTEMPTS` | 3 |
//! | `SANDBOX_DEFAULT_INTERVAL` | 5s |

use crate::delivery::CoordinatorSettings;
use crate::policy::{parse_go_duration, PolicyError, RetryPolicy};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const ENV_PREFIX: &str = "SANDBOX_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}: invalid number {value:?}")]
    InvalidNumber { key: String, value: String },

    #[error("{key}: {source}")]
    InvalidDuration {
        key: String,
        #[source]
        source: PolicyError,
    },

    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SandboxConfig {
    /// Request queue of each entity actor.
    pub store_capacity: usize,
    /// Request queue of the event broker.
    pub broker_capacity: usize,
    /// Inbox of each observer.
    pub subscriber_capacity: usize,
    pub http_timeout: Duration,
    pub user_agent: String,
    pub max_concurrent_runs: usize,
    pub max_queued_runs: usize,
    pub min_skip_spacing: Duration,
    /// Used when a merchant has no usable notify config.
    pub default_policy: RetryPolicy,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        let coordinator = CoordinatorSettings::default();
        Self {
            store_capacity: 32,
            broker_capacity: 100,
            subscriber_capacity: 10,
            http_timeout: Duration::from_secs(10),
            user_agent: "callback-sandbox/0.1".to_string(),
            max_concurrent_runs: coordinator.max_concurrent_runs,
            max_queued_runs: coordinator.max_queued_runs,
            min_skip_spacing: coordinator.min_skip_spacing,
            default_policy: RetryPolicy::default(),
        }
    }
}

impl SandboxConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Keys carry the `SANDBOX_` prefix.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| -> Option<(String, String)> {
            let key = format!("{ENV_PREFIX}{name}");
            lookup(&key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(|v| (key, v))
        };

        let mut config = Self::default();
        if let Some((key, v)) = get("STORE_CAPACITY") {
            config.store_capacity = parse_number(&key, &v)?;
        }
        if let Some((key, v)) = get("BROKER_CAPACITY") {
            config.broker_capacity = parse_number(&key, &v)?;
        }
        if let Some((key, v)) = get("SUBSCRIBER_CAPACITY") {
            config.subscriber_capacity = parse_number(&key, &v)?;
        }
        if let Some((key, v)) = get("HTTP_TIMEOUT") {
            config.http_timeout = parse_duration(&key, &v)?;
        }
        if let Some((_, v)) = get("USER_AGENT") {
            config.user_agent = v;
        }
        if let Some((key, v)) = get("MAX_CONCURRENT_RUNS") {
            config.max_concurrent_runs = parse_number(&key, &v)?;
        }
        if let Some((key, v)) = get("MAX_QUEUED_RUNS") {
            config.max_queued_runs = parse_number(&key, &v)?;
        }
        if let Some((key, v)) = get("MIN_SKIP_SPACING") {
            config.min_skip_spacing = parse_duration(&key, &v)?;
        }
        if let Some((key, v)) = get("DEFAULT_MAX_ATTEMPTS") {
            config.default_policy.max_attempts = parse_number(&key, &v)?;
        }
        if let Some((key, v)) = get("DEFAULT_INTERVAL") {
            config.default_policy.interval = parse_duration(&key, &v)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("store_capacity", self.store_capacity),
            ("broker_capacity", self.broker_capacity),
            ("subscriber_capacity", self.subscriber_capacity),
            ("max_concurrent_runs", self.max_concurrent_runs),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }
        if self.default_policy.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "default max attempts must be positive".into(),
            ));
        }
        if self.http_timeout.is_zero() {
            return Err(ConfigError::Invalid("http_timeout must be positive".into()));
        }
        Ok(())
    }

    pub fn coordinator_settings(&self) -> CoordinatorSettings {
        CoordinatorSettings {
            max_concurrent_runs: self.max_concurrent_runs,
            max_queued_runs: self.max_queued_runs,
            min_skip_spacing: self.min_skip_spacing,
        }
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidNumber {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_duration(key: &str, value: &str) -> Result<Duration, ConfigError> {
    parse_go_duration(value).map_err(|source| ConfigError::InvalidDuration {
        key: key.to_string(),
        source,
    })
}
