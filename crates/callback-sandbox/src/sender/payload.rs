//! Outbound notification bodies.
//!
//! The shape mimics the gateway's v3 notifications: an envelope with the business fields in the
//! clear plus an "encrypted" `resource` block. Encryption is not simulated; the block carries an
//! inert ciphertext so merchants can exercise their parsing code.

use crate::model::{Resource, ResourceDetails};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

pub const ALGORITHM: &str = "AEAD_AES_256_GCM";
pub const RESOURCE_TYPE: &str = "encrypt-resource";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncryptedResource {
    pub original_type: &'static str,
    pub algorithm: &'static str,
    pub ciphertext: &'static str,
    pub associated_data: String,
    pub nonce: String,
}

impl EncryptedResource {
    fn placeholder(original_type: &'static str, ciphertext: &'static str) -> Self {
        Self {
            original_type,
            algorithm: ALGORITHM,
            ciphertext,
            associated_data: String::new(),
            nonce: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentAmount {
    pub total: i64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefundAmount {
    pub refund: i64,
    pub total: i64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentNotification {
    pub id: String,
    pub create_time: String,
    pub resource_type: &'static str,
    pub event_type: &'static str,
    pub summary: &'static str,
    pub original_type: &'static str,
    pub transaction_id: String,
    pub out_trade_no: String,
    pub appid: String,
    pub mchid: String,
    pub trade_state: &'static str,
    pub amount: PaymentAmount,
    pub success_time: String,
    pub resource: EncryptedResource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefundNotification {
    pub id: String,
    pub create_time: String,
    pub resource_type: &'static str,
    pub event_type: &'static str,
    pub summary: &'static str,
    pub original_type: &'static str,
    pub refund_id: String,
    pub out_refund_no: String,
    pub transaction_id: String,
    pub mchid: String,
    pub refund_status: &'static str,
    pub amount: RefundAmount,
    pub success_time: String,
    pub resource: EncryptedResource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NotificationBody {
    Payment(PaymentNotification),
    Refund(RefundNotification),
}

fn rfc3339(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl NotificationBody {
    /// Builds the body for `resource`, stamped with `created_at`.
    pub fn build(resource: &Resource, created_at: DateTime<Utc>) -> Self {
        let create_time = rfc3339(created_at);
        let success_time = rfc3339(resource.success_time);
        match &resource.details {
            ResourceDetails::Payment {
                appid,
                out_trade_no,
            } => NotificationBody::Payment(PaymentNotification {
                id: resource.id.0.clone(),
                create_time,
                resource_type: RESOURCE_TYPE,
                event_type: "TRANSACTION.SUCCESS",
                summary: "支付成功",
                original_type: "transaction",
                transaction_id: resource.id.0.clone(),
                out_trade_no: out_trade_no.clone(),
                appid: appid.clone(),
                mchid: resource.mch_id.clone(),
                trade_state: "SUCCESS",
                amount: PaymentAmount {
                    total: resource.amount,
                    currency: resource.currency.clone(),
                },
                success_time,
                resource: EncryptedResource::placeholder("transaction", "mock_ciphertext"),
            }),
            ResourceDetails::Refund {
                out_refund_no,
                transaction_id,
                total,
            } => NotificationBody::Refund(RefundNotification {
                id: resource.id.0.clone(),
                create_time,
                resource_type: RESOURCE_TYPE,
                event_type: "REFUND.SUCCESS",
                summary: "退款成功",
                original_type: "refund",
                refund_id: resource.id.0.clone(),
                out_refund_no: out_refund_no.clone(),
                transaction_id: transaction_id.clone(),
                mchid: resource.mch_id.clone(),
                refund_status: "SUCCESS",
                amount: RefundAmount {
                    refund: resource.amount,
                    total: *total,
                    currency: resource.currency.clone(),
                },
                success_time,
                resource: EncryptedResource::placeholder("refund", "mock_refund_ciphertext"),
            }),
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            NotificationBody::Payment(p) => p.event_type,
            NotificationBody::Refund(r) => r.event_type,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
