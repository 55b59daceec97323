//! Supervised, bounded executor for delivery runs.
//!
//! At most `max_concurrent` runs execute at once; up to `max_queued` more wait for a permit.
//! Submissions beyond that are rejected rather than buffered without bound. Every run is tracked,
//! so callers can wait for the pool to drain and shut it down cleanly.

use super::DeliveryError;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{watch, Semaphore};
use tokio_util::task::TaskTracker;
use tracing::debug;

#[derive(Clone)]
pub struct RunPool {
    permits: Arc<Semaphore>,
    tracker: TaskTracker,
    pending: Arc<watch::Sender<usize>>,
    capacity: usize,
}

/// Decrements the pending count when a run finishes, panics included.
struct PendingSlot(Arc<watch::Sender<usize>>);

impl Drop for PendingSlot {
    fn drop(&mut self) {
        self.0.send_modify(|n| *n = n.saturating_sub(1));
    }
}

impl RunPool {
    pub fn new(max_concurrent: usize, max_queued: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        let (pending, _) = watch::channel(0usize);
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent)),
            tracker: TaskTracker::new(),
            pending: Arc::new(pending),
            capacity: max_concurrent + max_queued,
        }
    }

    /// Schedules `run`. Fails if the pool is shut down or already holds `capacity` runs.
    pub fn submit<F>(&self, run: F) -> Result<(), DeliveryError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.tracker.is_closed() {
            return Err(DeliveryError::PoolClosed);
        }

        let capacity = self.capacity;
        let reserved = self.pending.send_if_modified(|n| {
            if *n >= capacity {
                false
            } else {
                *n += 1;
                true
            }
        });
        if !reserved {
            return Err(DeliveryError::PoolSaturated { capacity });
        }

        let slot = PendingSlot(Arc::clone(&self.pending));
        let permits = Arc::clone(&self.permits);
        self.tracker.spawn(async move {
            let _slot = slot;
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            run.await;
        });
        Ok(())
    }

    /// Runs submitted and not yet finished, waiting or executing.
    pub fn pending(&self) -> usize {
        *self.pending.borrow()
    }

    pub fn is_closed(&self) -> bool {
        self.tracker.is_closed()
    }

    /// Resolves once no run is pending. New submissions remain possible.
    pub async fn wait_idle(&self) {
        let mut rx = self.pending.subscribe();
        let _ = rx.wait_for(|n| *n == 0).await;
    }

    /// Refuses new runs and waits for every accepted run to finish.
    pub async fn shutdown(&self) {
        self.tracker.close();
        debug!(pending = self.pending(), "Run pool draining");
        self.tracker.wait().await;
    }
}
