use super::{Notification, NotificationSender, SendOutcome};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

/// Longest response body kept for the ledger, in characters.
pub const MAX_RESPONSE_CHARS: usize = 4096;

#[derive(Debug, Error)]
pub enum SendError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

/// POSTs notifications with `reqwest`.
///
/// Redirects are not followed: a 3xx is a failed attempt like any other non-2xx.
#[derive(Clone)]
pub struct HttpNotificationSender {
    client: Client,
    timeout: Duration,
}

impl HttpNotificationSender {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, SendError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client, timeout })
    }

    fn describe_error(&self, e: &reqwest::Error) -> String {
        if e.is_timeout() {
            format!("Request timeout ({}s)", self.timeout.as_secs_f64())
        } else if e.is_connect() {
            format!("Connection failed: {e}")
        } else if e.is_builder() {
            format!("Invalid notify URL: {e}")
        } else {
            format!("Request error: {e}")
        }
    }
}

fn truncate_chars(mut text: String, max: usize) -> String {
    if let Some((index, _)) = text.char_indices().nth(max) {
        text.truncate(index);
    }
    text
}

#[async_trait]
impl NotificationSender for HttpNotificationSender {
    #[instrument(skip(self, notification), fields(resource_id = %notification.resource_id, url = %notification.notify_url))]
    async fn send(&self, notification: &Notification) -> SendOutcome {
        let result = self
            .client
            .post(&notification.notify_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(notification.body.clone())
            .send()
            .await;

        match result {
            Ok(response) => {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                debug!(status, "Notify endpoint responded");
                SendOutcome::responded(status, truncate_chars(body, MAX_RESPONSE_CHARS))
            }
            Err(e) => {
                let message = self.describe_error(&e);
                debug!(error = %message, "Notify request failed");
                SendOutcome::transport_error(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("abc".into(), 5), "abc");
        assert_eq!(truncate_chars("abcdef".into(), 3), "abc");
        assert_eq!(truncate_chars("成功成功".into(), 2), "成功");
    }

    #[tokio::test]
    async fn test_empty_url_is_a_failed_attempt() {
        let sender = HttpNotificationSender::new(Duration::from_secs(1), "test").unwrap();
        let outcome = sender
            .send(&Notification {
                resource_id: "tx".into(),
                notify_url: String::new(),
                event_type: "TRANSACTION.SUCCESS",
                body: "{}".into(),
            })
            .await;
        assert!(!outcome.is_success());
        assert_eq!(outcome.status_code, None);
        assert!(!outcome.response.is_empty());
    }
}
