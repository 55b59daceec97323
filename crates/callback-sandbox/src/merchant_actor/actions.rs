//! Custom actions for the Merchant actor.

#[derive(Debug, Clone)]
pub enum MerchantAction {
    /// Replaces the raw notify config JSON.
    SetNotifyConfig(String),
    /// Replaces both notify URLs. An empty string clears a URL.
    SetNotifyUrls {
        notify_url: String,
        refund_notify_url: String,
    },
}
