//! # Retry Policy
//!
//! How many attempts a resource gets and how long a run waits between them. Policies are
//! tenant-scoped: each merchant may store a JSON notify config such as
//! `{"interval": "1m", "max_retries": 5}`. Anything missing or malformed falls back to the
//! defaults (3 attempts, 5 seconds); resolution never fails.

pub mod duration;

pub use duration::parse_go_duration;

use crate::delivery::ports::MerchantDirectory;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("invalid notify config JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid duration {input:?}: {reason}")]
    InvalidDuration { input: String, reason: String },

    #[error("negative duration {0:?}")]
    NegativeDuration(String),
}

/// Attempt budget and spacing for one delivery run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts a resource may ever accumulate, counted across runs.
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            interval: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Overlays a merchant's config on `self`.
    ///
    /// `max_retries` applies only when positive and `interval` only when it parses; each field
    /// is judged on its own.
    pub fn overlay(self, config: &NotifyConfig) -> Self {
        let mut policy = self;
        if let Some(max) = config.max_retries.filter(|n| *n > 0) {
            policy.max_attempts = u32::try_from(max).unwrap_or(u32::MAX);
        }
        if let Some(raw) = config.interval.as_deref() {
            match parse_go_duration(raw) {
                Ok(interval) => policy.interval = interval,
                Err(e) => debug!(error = %e, "Ignoring notify config interval"),
            }
        }
        policy
    }
}

/// The merchant-side JSON document. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub interval: Option<String>,
    #[serde(default)]
    pub max_retries: Option<i64>,
}

impl NotifyConfig {
    pub fn parse(raw: &str) -> Result<Self, PolicyError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Resolves the retry policy for a tenant. Never fails: problems yield defaults.
#[async_trait]
pub trait PolicyResolver: Send + Sync {
    async fn resolve(&self, mch_id: &str) -> RetryPolicy;
}

/// A fixed policy, whatever the tenant.
#[async_trait]
impl PolicyResolver for RetryPolicy {
    async fn resolve(&self, _mch_id: &str) -> RetryPolicy {
        *self
    }
}

/// Reads the merchant's notify config on every call.
pub struct MerchantPolicyResolver {
    merchants: Arc<dyn MerchantDirectory>,
    defaults: RetryPolicy,
}

impl MerchantPolicyResolver {
    pub fn new(merchants: Arc<dyn MerchantDirectory>, defaults: RetryPolicy) -> Self {
        Self {
            merchants,
            defaults,
        }
    }
}

#[async_trait]
impl PolicyResolver for MerchantPolicyResolver {
    async fn resolve(&self, mch_id: &str) -> RetryPolicy {
        let merchant = match self.merchants.find(mch_id).await {
            Ok(Some(merchant)) => merchant,
            Ok(None) => {
                debug!(mch_id, "Unknown merchant, using default policy");
                return self.defaults;
            }
            Err(e) => {
                warn!(mch_id, error = %e, "Merchant lookup failed, using default policy");
                return self.defaults;
            }
        };

        match NotifyConfig::parse(&merchant.notify_config) {
            Ok(config) => self.defaults.overlay(&config),
            Err(e) => {
                debug!(mch_id, error = %e, "Unusable notify config, using default policy");
                self.defaults
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::ports::StoreError;
    use crate::merchant_actor::MerchantError;
    use crate::model::Merchant;
    use std::collections::HashMap;

    struct StaticDirectory(HashMap<String, Merchant>);

    #[async_trait]
    impl MerchantDirectory for StaticDirectory {
        async fn find(&self, mch_id: &str) -> Result<Option<Merchant>, StoreError> {
            Ok(self.0.get(mch_id).cloned())
        }
    }

    struct BrokenDirectory;

    #[async_trait]
    impl MerchantDirectory for BrokenDirectory {
        async fn find(&self, _mch_id: &str) -> Result<Option<Merchant>, StoreError> {
            Err(MerchantError::ActorCommunicationError("Actor closed".into()).into())
        }
    }

    fn resolver_with(config: &str) -> MerchantPolicyResolver {
        let merchant = Merchant::new("1900000001", "wx01").with_notify_config(config);
        let directory = StaticDirectory(HashMap::from([(merchant.mch_id.clone(), merchant)]));
        MerchantPolicyResolver::new(Arc::new(directory), RetryPolicy::default())
    }

    #[tokio::test]
    async fn test_full_config_overrides_defaults() {
        let policy = resolver_with(r#"{"interval":"1m","max_retries":5}"#)
            .resolve("1900000001")
            .await;
        assert_eq!(policy, RetryPolicy::new(5, Duration::from_secs(60)));
    }

    #[tokio::test]
    async fn test_fields_override_independently() {
        let policy = resolver_with(r#"{"max_retries":7}"#)
            .resolve("1900000001")
            .await;
        assert_eq!(policy, RetryPolicy::new(7, Duration::from_secs(5)));

        let policy = resolver_with(r#"{"interval":"250ms","max_retries":0}"#)
            .resolve("1900000001")
            .await;
        assert_eq!(policy, RetryPolicy::new(3, Duration::from_millis(250)));

        let policy = resolver_with(r#"{"interval":"soon","max_retries":4}"#)
            .resolve("1900000001")
            .await;
        assert_eq!(policy, RetryPolicy::new(4, Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_malformed_config_yields_defaults() {
        for raw in ["", "not json", r#"{"max_retries":"three"}"#, r#"{"interval":5}"#, "[]"] {
            let policy = resolver_with(raw).resolve("1900000001").await;
            assert_eq!(policy, RetryPolicy::default(), "config {raw:?}");
        }
    }

    #[tokio::test]
    async fn test_negative_values_ignored() {
        let policy = resolver_with(r#"{"interval":"-5s","max_retries":-1}"#)
            .resolve("1900000001")
            .await;
        assert_eq!(policy, RetryPolicy::default());
    }

    #[tokio::test]
    async fn test_unknown_merchant_yields_defaults() {
        let policy = resolver_with(r#"{"max_retries":9}"#).resolve("nobody").await;
        assert_eq!(policy, RetryPolicy::default());
    }

    #[tokio::test]
    async fn test_directory_failure_yields_defaults() {
        let resolver = MerchantPolicyResolver::new(
            Arc::new(BrokenDirectory),
            RetryPolicy::new(2, Duration::from_millis(10)),
        );
        assert_eq!(
            resolver.resolve("1900000001").await,
            RetryPolicy::new(2, Duration::from_millis(10))
        );
    }

    #[tokio::test]
    async fn test_fixed_policy_resolver() {
        let fixed = RetryPolicy::new(1, Duration::ZERO);
        assert_eq!(fixed.resolve("anyone").await, fixed);
    }
}
