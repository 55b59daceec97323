//! End-to-end: the full system with the HTTP sender against a wiremock merchant.

mod common;

use callback_sandbox::broker::encode_sse;
use callback_sandbox::lifecycle::{try_setup_tracing, SandboxSystem};
use callback_sandbox::model::{AttemptOutcome, CallbackStatus, Merchant};
use common::{payment, test_config, FailingResponder, APPID, MCH_ID};
use sandbox_actor::ActorClient;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer};

#[tokio::test]
async fn test_payment_delivered_after_two_failures() {
    try_setup_tracing();

    let server = MockServer::start().await;
    let responder = FailingResponder::fail_times(2);
    Mock::given(method("POST"))
        .and(path("/notify"))
        .respond_with(responder.clone())
        .expect(3)
        .mount(&server)
        .await;

    let system = SandboxSystem::new(test_config()).unwrap();
    let mut observer = system.broker.subscribe().await.unwrap();

    system
        .merchants
        .register(
            Merchant::new(MCH_ID, APPID)
                .with_notify_config(r#"{"interval":"10ms","max_retries":3}"#)
                .with_notify_url(format!("{}/notify", server.uri())),
        )
        .await
        .unwrap();

    let id = system
        .register_and_trigger(payment("4200000000000001"))
        .await
        .unwrap();
    system.coordinator.wait_idle().await;

    assert_eq!(responder.attempt_count(), 3);

    let history = system.coordinator.history(&id).await.unwrap();
    let codes: Vec<Option<u16>> = history.iter().map(|a| a.status_code).collect();
    assert_eq!(codes, vec![Some(500), Some(500), Some(200)]);
    assert_eq!(history[2].outcome, AttemptOutcome::Success);
    assert!(history.windows(2).all(|w| w[0].created_at <= w[1].created_at));

    let resource = system.resources.fetch(id).await.unwrap().unwrap();
    assert_eq!(resource.callback_status, CallbackStatus::Success);

    system.broker.stats().await.unwrap();
    let mut frames = Vec::new();
    while let Some(event) = observer.try_recv() {
        frames.push(encode_sse(&event).unwrap());
    }
    assert_eq!(frames.len(), 3);
    assert!(frames.iter().all(|f| f.starts_with("event:message\ndata:")));
    assert!(frames[2].contains(r#""status":"SUCCESS""#));

    system.shutdown().await.unwrap();
    assert!(observer.recv().await.is_none());
}

#[tokio::test]
async fn test_shutdown_waits_for_running_delivery() {
    try_setup_tracing();

    let server = MockServer::start().await;
    let responder = FailingResponder::fail_times(0);
    Mock::given(method("POST"))
        .respond_with(responder.clone())
        .mount(&server)
        .await;

    let system = SandboxSystem::new(test_config()).unwrap();
    system
        .merchants
        .register(Merchant::new(MCH_ID, APPID).with_notify_url(server.uri()))
        .await
        .unwrap();
    system
        .register_and_trigger(payment("4200000000000002"))
        .await
        .unwrap();

    system.shutdown().await.unwrap();

    // The triggered run completed before shutdown returned.
    assert_eq!(responder.attempt_count(), 1);
}
