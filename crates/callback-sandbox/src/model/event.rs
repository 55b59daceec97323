use super::{DeliveryAttempt, Resource, ResourceKind};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Event type for delivery outcomes.
pub const CALLBACK_EVENT: &str = "callback";

/// A transient event fanned out to observers by the [`EventBroker`](crate::broker::EventBroker).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub payload: serde_json::Value,
}

impl BroadcastEvent {
    pub fn new(event_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            payload,
        }
    }

    /// Describes one persisted delivery attempt.
    ///
    /// For refunds `transaction_id` carries the refund id and `out_trade_no` the out refund no,
    /// so observers can treat both kinds alike.
    pub fn callback(resource: &Resource, attempt: &DeliveryAttempt) -> Self {
        let reference = resource.merchant_reference();
        let message = match resource.kind() {
            ResourceKind::Payment => format!("新的回调产生，商户订单号：{reference}"),
            ResourceKind::Refund => format!("新的退款回调产生，商户退款单号：{reference}"),
        };
        Self::new(
            CALLBACK_EVENT,
            json!({
                "transaction_id": resource.id.0,
                "out_trade_no": reference,
                "kind": resource.kind(),
                "sequence": attempt.sequence,
                "status": attempt.outcome,
                "message": message,
            }),
        )
    }
}
