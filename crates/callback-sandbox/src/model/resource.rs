//! Payments and refunds.
//!
//! # Actor Framework
//! [`Resource`] implements [`ActorEntity`](sandbox_actor::ActorEntity), see
//! [`crate::resource_actor`]. The delivery pipeline only ever reads a snapshot and writes back
//! `callback_status` / `callback_msg`.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Business identifier of a resource: a `transaction_id` for payments, a `refund_id` for refunds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(pub String);

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Payment,
    Refund,
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Payment => f.write_str("payment"),
            ResourceKind::Refund => f.write_str("refund"),
        }
    }
}

/// Delivery state of a resource as last written by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CallbackStatus {
    /// No attempt has been recorded yet.
    #[default]
    #[serde(rename = "")]
    Unset,
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "FAIL")]
    Fail,
}

impl CallbackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackStatus::Unset => "",
            CallbackStatus::Success => "SUCCESS",
            CallbackStatus::Fail => "FAIL",
        }
    }
}

impl Display for CallbackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields that differ between payments and refunds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResourceDetails {
    Payment {
        appid: String,
        out_trade_no: String,
    },
    Refund {
        out_refund_no: String,
        /// The payment this refund belongs to.
        transaction_id: String,
        /// Amount of the original payment, in cents.
        total: i64,
    },
}

/// A payment or refund whose outcome is delivered to a merchant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub mch_id: String,
    /// In cents. For a refund, the refunded amount.
    pub amount: i64,
    pub currency: String,
    /// Caller-supplied notify URL; empty means "use the merchant's".
    pub notify_url: String,
    pub callback_status: CallbackStatus,
    pub callback_msg: String,
    pub success_time: DateTime<Utc>,
    pub details: ResourceDetails,
}

impl Resource {
    /// A successful payment awaiting notification.
    pub fn payment(
        transaction_id: impl Into<String>,
        mch_id: impl Into<String>,
        appid: impl Into<String>,
        out_trade_no: impl Into<String>,
        amount: i64,
    ) -> Self {
        Self {
            id: ResourceId(transaction_id.into()),
            mch_id: mch_id.into(),
            amount,
            currency: "CNY".to_string(),
            notify_url: String::new(),
            callback_status: CallbackStatus::Unset,
            callback_msg: String::new(),
            success_time: Utc::now(),
            details: ResourceDetails::Payment {
                appid: appid.into(),
                out_trade_no: out_trade_no.into(),
            },
        }
    }

    /// A successful refund of `amount` out of the payment's `total`.
    pub fn refund(
        refund_id: impl Into<String>,
        mch_id: impl Into<String>,
        transaction_id: impl Into<String>,
        out_refund_no: impl Into<String>,
        amount: i64,
        total: i64,
    ) -> Self {
        Self {
            id: ResourceId(refund_id.into()),
            mch_id: mch_id.into(),
            amount,
            currency: "CNY".to_string(),
            notify_url: String::new(),
            callback_status: CallbackStatus::Unset,
            callback_msg: String::new(),
            success_time: Utc::now(),
            details: ResourceDetails::Refund {
                out_refund_no: out_refund_no.into(),
                transaction_id: transaction_id.into(),
                total,
            },
        }
    }

    pub fn with_notify_url(mut self, url: impl Into<String>) -> Self {
        self.notify_url = url.into();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_callback_status(mut self, status: CallbackStatus) -> Self {
        self.callback_status = status;
        self
    }

    pub fn kind(&self) -> ResourceKind {
        match self.details {
            ResourceDetails::Payment { .. } => ResourceKind::Payment,
            ResourceDetails::Refund { .. } => ResourceKind::Refund,
        }
    }

    /// The merchant-side order number: `out_trade_no` or `out_refund_no`.
    pub fn merchant_reference(&self) -> &str {
        match &self.details {
            ResourceDetails::Payment { out_trade_no, .. } => out_trade_no,
            ResourceDetails::Refund { out_refund_no, .. } => out_refund_no,
        }
    }
}
