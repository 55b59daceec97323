//! # Notification Sender
//!
//! Builds the outbound body for a resource and performs single delivery attempts.
//!
//! The body is prepared once per run ([`NotificationSender::prepare`]) and re-sent unchanged
//! on every retry, so merchants can de-duplicate on its content. [`NotificationSender::send`]
//! performs exactly one POST and never retries by itself.

pub mod http;
pub mod payload;

pub use http::HttpNotificationSender;
pub use payload::NotificationBody;

use crate::model::{AttemptOutcome, Resource, ResourceId};
use async_trait::async_trait;
use chrono::Utc;

/// A ready-to-send notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub resource_id: ResourceId,
    pub notify_url: String,
    pub event_type: &'static str,
    pub body: String,
}

/// Result of one delivery attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SendOutcome {
    /// `None` when no HTTP response was received.
    pub status_code: Option<u16>,
    pub outcome: AttemptOutcome,
    /// Response body, or the transport error text.
    pub response: String,
}

impl SendOutcome {
    pub fn responded(status_code: u16, response: String) -> Self {
        Self {
            status_code: Some(status_code),
            outcome: AttemptOutcome::from_status(status_code),
            response,
        }
    }

    pub fn transport_error(message: impl Into<String>) -> Self {
        Self {
            status_code: None,
            outcome: AttemptOutcome::Fail,
            response: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Serializes the body for `resource`. Called once per delivery run.
    fn prepare(
        &self,
        resource: &Resource,
        notify_url: &str,
    ) -> Result<Notification, serde_json::Error> {
        let body = NotificationBody::build(resource, Utc::now());
        Ok(Notification {
            resource_id: resource.id.clone(),
            notify_url: notify_url.to_string(),
            event_type: body.event_type(),
            body: body.to_json()?,
        })
    }

    /// Performs exactly one delivery attempt.
    async fn send(&self, notification: &Notification) -> SendOutcome;
}
