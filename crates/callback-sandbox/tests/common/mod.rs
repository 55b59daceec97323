//! Shared fixtures for the callback-sandbox integration tests.
//!
//! [`ScriptedSender`] replaces HTTP for the delivery scenarios; the wiremock responders drive
//! the real [`HttpNotificationSender`](callback_sandbox::sender::HttpNotificationSender).
#![allow(dead_code)]

use async_trait::async_trait;
use callback_sandbox::lifecycle::{SandboxConfig, SandboxSystem};
use callback_sandbox::model::{Merchant, Resource};
use callback_sandbox::policy::RetryPolicy;
use callback_sandbox::sender::{Notification, NotificationSender, SendOutcome};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::{Request, Respond, ResponseTemplate};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub const MCH_ID: &str = "1900000001";
pub const APPID: &str = "wxd930ea5d5a258f4f";
pub const NOTIFY_URL: &str = "http://merchant.test/notify";
pub const REFUND_NOTIFY_URL: &str = "http://merchant.test/refund-notify";

pub fn ok() -> SendOutcome {
    SendOutcome::responded(200, r#"{"code":"SUCCESS"}"#.to_string())
}

pub fn fail() -> SendOutcome {
    SendOutcome::responded(500, r#"{"code":"FAIL"}"#.to_string())
}

pub fn refused() -> SendOutcome {
    SendOutcome::transport_error("Connection failed: connection refused")
}

pub fn merchant(notify_config: &str) -> Merchant {
    Merchant::new(MCH_ID, APPID)
        .with_notify_config(notify_config)
        .with_notify_url(NOTIFY_URL)
        .with_refund_notify_url(REFUND_NOTIFY_URL)
}

pub fn payment(transaction_id: &str) -> Resource {
    Resource::payment(transaction_id, MCH_ID, APPID, format!("ORDER-{transaction_id}"), 100)
}

pub fn refund(refund_id: &str) -> Resource {
    Resource::refund(
        refund_id,
        MCH_ID,
        "4200000000000001",
        format!("REFUND-{refund_id}"),
        40,
        100,
    )
}

/// Small queues and a default policy without waits.
pub fn test_config() -> SandboxConfig {
    SandboxConfig {
        store_capacity: 16,
        broker_capacity: 64,
        subscriber_capacity: 64,
        default_policy: RetryPolicy::new(3, Duration::ZERO),
        ..SandboxConfig::default()
    }
}

pub fn start_system(sender: &ScriptedSender) -> SandboxSystem {
    SandboxSystem::with_sender(test_config(), Arc::new(sender.clone()))
        .expect("system should start")
}

// ---------------------------------------------------------------------------
// ScriptedSender - replays queued outcomes instead of POSTing
// ---------------------------------------------------------------------------

/// A sender that answers from a script, then from a fallback.
///
/// Records every notification it was asked to send and the highest number of sends that
/// were in progress at the same time.
#[derive(Clone)]
pub struct ScriptedSender {
    script: Arc<Mutex<VecDeque<SendOutcome>>>,
    fallback: SendOutcome,
    delay: Duration,
    calls: Arc<Mutex<Vec<Notification>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl ScriptedSender {
    /// Every attempt succeeds.
    pub fn always_ok() -> Self {
        Self::script(Vec::new(), ok())
    }

    /// Every attempt fails with a 500.
    pub fn always_fail() -> Self {
        Self::script(Vec::new(), fail())
    }

    pub fn script(outcomes: Vec<SendOutcome>, fallback: SendOutcome) -> Self {
        Self {
            script: Arc::new(Mutex::new(outcomes.into())),
            fallback,
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Each send takes `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<Notification> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationSender for ScriptedSender {
    async fn send(&self, notification: &Notification) -> SendOutcome {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.calls.lock().unwrap().push(notification.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let outcome = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}

// ---------------------------------------------------------------------------
// Wiremock responders
// ---------------------------------------------------------------------------

/// Fails a given number of times, then succeeds.
#[derive(Clone)]
pub struct FailingResponder {
    attempt_count: Arc<AtomicU32>,
    failures_before_success: u32,
    failure_code: u16,
}

impl FailingResponder {
    /// Fails `n` times with 500, then returns 200.
    pub fn fail_times(n: u32) -> Self {
        Self {
            attempt_count: Arc::new(AtomicU32::new(0)),
            failures_before_success: n,
            failure_code: 500,
        }
    }

    pub fn attempt_count(&self) -> u32 {
        self.attempt_count.load(Ordering::SeqCst)
    }
}

impl Respond for FailingResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self.attempt_count.fetch_add(1, Ordering::SeqCst);
        if n < self.failures_before_success {
            ResponseTemplate::new(self.failure_code).set_body_string(r#"{"code":"FAIL"}"#)
        } else {
            ResponseTemplate::new(200).set_body_string(r#"{"code":"SUCCESS"}"#)
        }
    }
}

/// Records request bodies and answers with a fixed status.
#[derive(Clone)]
pub struct CaptureResponder {
    bodies: Arc<Mutex<Vec<Vec<u8>>>>,
    content_types: Arc<Mutex<Vec<String>>>,
    response_code: u16,
}

impl CaptureResponder {
    pub fn new() -> Self {
        Self::with_status(200)
    }

    pub fn with_status(status: u16) -> Self {
        Self {
            bodies: Arc::new(Mutex::new(Vec::new())),
            content_types: Arc::new(Mutex::new(Vec::new())),
            response_code: status,
        }
    }

    pub fn bodies(&self) -> Vec<Vec<u8>> {
        self.bodies.lock().unwrap().clone()
    }

    pub fn content_types(&self) -> Vec<String> {
        self.content_types.lock().unwrap().clone()
    }
}

impl Respond for CaptureResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        self.bodies.lock().unwrap().push(request.body.clone());
        let content_type = request
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        self.content_types.lock().unwrap().push(content_type);
        ResponseTemplate::new(self.response_code).set_body_string("OK")
    }
}

/// Answers 200 after a delay.
#[derive(Clone)]
pub struct DelayedResponder {
    delay_ms: u64,
}

impl DelayedResponder {
    pub fn new(delay_ms: u64) -> Self {
        Self { delay_ms }
    }
}

impl Respond for DelayedResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        ResponseTemplate::new(200).set_delay(Duration::from_millis(self.delay_ms))
    }
}
