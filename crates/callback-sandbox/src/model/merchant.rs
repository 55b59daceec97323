use serde::{Deserialize, Serialize};

/// A tenant of the sandbox.
///
/// `notify_config` is kept as the raw JSON text the operator entered, e.g.
/// `{"interval": "1m", "max_retries": 3}`. It is parsed on every delivery run by
/// [`MerchantPolicyResolver`](crate::policy::MerchantPolicyResolver), so a malformed value never
/// prevents the merchant from being stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Merchant {
    pub mch_id: String,
    pub appid: String,
    pub description: String,
    pub notify_config: String,
    pub notify_url: String,
    pub refund_notify_url: String,
}

impl Merchant {
    pub fn new(mch_id: impl Into<String>, appid: impl Into<String>) -> Self {
        Self {
            mch_id: mch_id.into(),
            appid: appid.into(),
            description: String::new(),
            notify_config: String::new(),
            notify_url: String::new(),
            refund_notify_url: String::new(),
        }
    }

    pub fn with_notify_config(mut self, config: impl Into<String>) -> Self {
        self.notify_config = config.into();
        self
    }

    pub fn with_notify_url(mut self, url: impl Into<String>) -> Self {
        self.notify_url = url.into();
        self
    }

    pub fn with_refund_notify_url(mut self, url: impl Into<String>) -> Self {
        self.refund_notify_url = url.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
