use callback_sandbox::broker::{encode_sse, BrokerError, EventBroker};
use callback_sandbox::model::BroadcastEvent;
use serde_json::json;

fn event(n: u32) -> BroadcastEvent {
    BroadcastEvent::new("callback", json!({ "sequence": n }))
}

#[tokio::test]
async fn test_publish_without_subscribers() {
    let (broker, client) = EventBroker::new(64, 10);
    let handle = tokio::spawn(broker.run());

    for n in 0..50 {
        client.publish(event(n)).unwrap();
    }

    let stats = client.stats().await.unwrap();
    assert_eq!(stats.subscribers, 0);
    assert_eq!(stats.published, 50);
    assert_eq!(stats.dropped, 0);

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_full_inbox_does_not_hold_back_other_observers() {
    let (broker, client) = EventBroker::new(64, 10);
    tokio::spawn(broker.run());

    let mut fast = client.subscribe().await.unwrap();
    let mut slow = client.subscribe().await.unwrap();

    let mut received = Vec::new();
    for batch in 0..3 {
        for n in 0..10 {
            client.publish(event(batch * 10 + n)).unwrap();
        }
        client.stats().await.unwrap();
        while let Some(e) = fast.try_recv() {
            received.push(e);
        }
    }

    let expected: Vec<BroadcastEvent> = (0..30).map(event).collect();
    assert_eq!(received, expected);

    let mut backlog = Vec::new();
    while let Some(e) = slow.try_recv() {
        backlog.push(e);
    }
    let first_batch: Vec<BroadcastEvent> = (0..10).map(event).collect();
    assert_eq!(backlog, first_batch);

    let stats = client.stats().await.unwrap();
    assert_eq!(stats.subscribers, 2);
    assert_eq!(stats.published, 30);
    assert_eq!(stats.dropped, 20);
}

#[tokio::test]
async fn test_late_subscriber_sees_no_replay() {
    let (broker, client) = EventBroker::new(64, 10);
    tokio::spawn(broker.run());

    client.publish(event(1)).unwrap();
    let mut late = client.subscribe().await.unwrap();
    client.publish(event(2)).unwrap();

    assert_eq!(late.recv().await.unwrap(), event(2));
    client.stats().await.unwrap();
    assert!(late.try_recv().is_none());
}

#[tokio::test]
async fn test_subscriptions_end_when_broker_stops() {
    let (broker, client) = EventBroker::new(64, 10);
    let handle = tokio::spawn(broker.run());

    let mut sub = client.subscribe().await.unwrap();
    drop(client);
    handle.await.unwrap();

    assert!(sub.recv().await.is_none());
}

#[tokio::test]
async fn test_closed_broker_rejects_requests() {
    let (broker, client) = EventBroker::new(64, 10);
    drop(broker);

    assert_eq!(client.publish(event(1)), Err(BrokerError::Closed));
    assert_eq!(client.stats().await, Err(BrokerError::Closed));
    assert!(matches!(client.subscribe().await, Err(BrokerError::Closed)));
}

#[tokio::test]
async fn test_sse_frame_for_delivered_event() {
    let (broker, client) = EventBroker::new(64, 10);
    tokio::spawn(broker.run());
    let mut sub = client.subscribe().await.unwrap();

    client.publish(event(7)).unwrap();
    let frame = encode_sse(&sub.recv().await.unwrap()).unwrap();

    assert_eq!(
        frame,
        "event:message\ndata:{\"type\":\"callback\",\"payload\":{\"sequence\":7}}\n\n"
    );
}
