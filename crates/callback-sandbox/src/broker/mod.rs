//! # Event Broker
//!
//! A single actor that fans delivery events out to live observers (e.g. an SSE endpoint).
//!
//! The subscriber set is owned by the broker loop and only touched from there: subscribe,
//! unsubscribe and publish are messages on one channel, processed in arrival order.
//!
//! ## Delivery semantics
//!
//! - Best effort. Each subscriber has a bounded inbox; when it is full the event is dropped for
//!   that subscriber only and counted.
//! - Publishing never waits: [`BrokerClient::publish`] uses `try_send`, so a congested broker
//!   drops the event instead of stalling the delivery pipeline.
//! - No replay: an observer sees only events published after it subscribed.
//! - Inboxes whose receiver was dropped are pruned on the next publish.

pub mod frame;

pub use frame::encode_sse;

use crate::model::BroadcastEvent;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum BrokerError {
    #[error("Broker closed")]
    Closed,
    #[error("Broker dropped response channel")]
    Dropped,
    #[error("Broker queue full, event dropped")]
    Saturated,
}

pub type SubscriberId = u64;

/// Counters answered in loop order, so they reflect every message sent before the query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BrokerStats {
    pub subscribers: usize,
    pub published: u64,
    /// Per-subscriber drops caused by full inboxes.
    pub dropped: u64,
}

#[derive(Debug)]
pub enum BrokerRequest {
    Subscribe {
        respond_to: oneshot::Sender<Subscription>,
    },
    Unsubscribe {
        id: SubscriberId,
    },
    Publish {
        event: BroadcastEvent,
    },
    Stats {
        respond_to: oneshot::Sender<BrokerStats>,
    },
}

/// An observer's inbox. Dropping it ends the subscription at the next publish.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    receiver: mpsc::Receiver<BroadcastEvent>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Waits for the next event. `None` once the broker has shut down or unsubscribed us.
    pub async fn recv(&mut self) -> Option<BroadcastEvent> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Option<BroadcastEvent> {
        self.receiver.try_recv().ok()
    }
}

pub struct EventBroker {
    receiver: mpsc::Receiver<BrokerRequest>,
    subscribers: HashMap<SubscriberId, mpsc::Sender<BroadcastEvent>>,
    subscriber_capacity: usize,
    next_id: SubscriberId,
    stats: BrokerStats,
}

impl EventBroker {
    /// `queue_capacity` bounds pending broker requests, `subscriber_capacity` each inbox.
    pub fn new(queue_capacity: usize, subscriber_capacity: usize) -> (Self, BrokerClient) {
        let (sender, receiver) = mpsc::channel(queue_capacity);
        let broker = Self {
            receiver,
            subscribers: HashMap::new(),
            subscriber_capacity: subscriber_capacity.max(1),
            next_id: 1,
            stats: BrokerStats::default(),
        };
        (broker, BrokerClient { sender })
    }

    pub async fn run(mut self) {
        info!("Event broker started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                BrokerRequest::Subscribe { respond_to } => {
                    let id = self.next_id;
                    self.next_id += 1;
                    let (sender, receiver) = mpsc::channel(self.subscriber_capacity);
                    self.subscribers.insert(id, sender);
                    info!(subscriber = id, total = self.subscribers.len(), "Observer subscribed");
                    let _ = respond_to.send(Subscription { id, receiver });
                }
                BrokerRequest::Unsubscribe { id } => {
                    if self.subscribers.remove(&id).is_some() {
                        info!(subscriber = id, total = self.subscribers.len(), "Observer unsubscribed");
                    }
                }
                BrokerRequest::Publish { event } => self.fan_out(event),
                BrokerRequest::Stats { respond_to } => {
                    let _ = respond_to.send(BrokerStats {
                        subscribers: self.subscribers.len(),
                        ..self.stats
                    });
                }
            }
        }

        info!(subscribers = self.subscribers.len(), "Event broker shutdown");
    }

    fn fan_out(&mut self, event: BroadcastEvent) {
        self.stats.published += 1;
        let mut closed = Vec::new();

        for (id, inbox) in &self.subscribers {
            match inbox.try_send(event.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    self.stats.dropped += 1;
                    warn!(subscriber = id, event_type = %event.event_type, "Observer inbox full, event dropped");
                }
                Err(TrySendError::Closed(_)) => closed.push(*id),
            }
        }

        for id in closed {
            self.subscribers.remove(&id);
            debug!(subscriber = id, "Pruned disconnected observer");
        }
    }
}

/// Cloneable handle to the broker loop.
#[derive(Clone)]
pub struct BrokerClient {
    sender: mpsc::Sender<BrokerRequest>,
}

impl BrokerClient {
    pub async fn subscribe(&self) -> Result<Subscription, BrokerError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(BrokerRequest::Subscribe { respond_to })
            .await
            .map_err(|_| BrokerError::Closed)?;
        response.await.map_err(|_| BrokerError::Dropped)
    }

    pub async fn unsubscribe(&self, subscription: Subscription) -> Result<(), BrokerError> {
        let id = subscription.id;
        drop(subscription);
        self.sender
            .send(BrokerRequest::Unsubscribe { id })
            .await
            .map_err(|_| BrokerError::Closed)
    }

    /// Enqueues `event` without waiting.
    pub fn publish(&self, event: BroadcastEvent) -> Result<(), BrokerError> {
        self.sender
            .try_send(BrokerRequest::Publish { event })
            .map_err(|e| match e {
                TrySendError::Full(_) => BrokerError::Saturated,
                TrySendError::Closed(_) => BrokerError::Closed,
            })
    }

    pub async fn stats(&self) -> Result<BrokerStats, BrokerError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(BrokerRequest::Stats { respond_to })
            .await
            .map_err(|_| BrokerError::Closed)?;
        response.await.map_err(|_| BrokerError::Dropped)
    }
}
