//! Per-resource attempt locks.
//!
//! Every delivery run registers itself with [`JobRegistry::enter`] for its whole lifetime and
//! takes the resource's lock with [`JobRegistry::try_acquire`] around each attempt. A slot is
//! evicted as soon as the last run referencing the resource finishes, so the map only holds
//! resources with live runs.

use crate::model::ResourceId;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::trace;

#[derive(Default)]
struct JobSlot {
    runs: AtomicUsize,
    lock: Arc<Mutex<()>>,
}

#[derive(Clone, Default)]
pub struct JobRegistry {
    slots: Arc<DashMap<ResourceId, Arc<JobSlot>>>,
}

/// Keeps a resource's slot alive while a run is active.
pub struct RunTicket {
    id: ResourceId,
    slot: Arc<JobSlot>,
    slots: Arc<DashMap<ResourceId, Arc<JobSlot>>>,
}

/// Exclusive right to attempt delivery for one resource. Released on drop.
pub struct AttemptGuard {
    _guard: OwnedMutexGuard<()>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&self, id: &ResourceId) -> RunTicket {
        // The increment happens under the shard lock, so it cannot race with eviction.
        let entry = self.slots.entry(id.clone()).or_default();
        entry.runs.fetch_add(1, Ordering::SeqCst);
        let slot = Arc::clone(entry.value());
        drop(entry);

        RunTicket {
            id: id.clone(),
            slot,
            slots: Arc::clone(&self.slots),
        }
    }

    /// Takes the resource's lock if nobody holds it. Never waits.
    pub fn try_acquire(&self, ticket: &RunTicket) -> Option<AttemptGuard> {
        Arc::clone(&ticket.slot.lock)
            .try_lock_owned()
            .ok()
            .map(|guard| AttemptGuard { _guard: guard })
    }

    /// Number of resources with at least one live run.
    pub fn active_resources(&self) -> usize {
        self.slots.len()
    }

    pub fn is_active(&self, id: &ResourceId) -> bool {
        self.slots.contains_key(id)
    }
}

impl RunTicket {
    pub fn resource_id(&self) -> &ResourceId {
        &self.id
    }
}

impl Drop for RunTicket {
    fn drop(&mut self) {
        self.slot.runs.fetch_sub(1, Ordering::SeqCst);
        let evicted = self
            .slots
            .remove_if(&self.id, |_, slot| slot.runs.load(Ordering::SeqCst) == 0)
            .is_some();
        if evicted {
            trace!(resource_id = %self.id, "Job slot evicted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_is_exclusive_per_resource() {
        let registry = JobRegistry::new();
        let a1 = registry.enter(&"a".into());
        let a2 = registry.enter(&"a".into());
        let b = registry.enter(&"b".into());

        let guard = registry.try_acquire(&a1).expect("free lock");
        assert!(registry.try_acquire(&a2).is_none());
        assert!(registry.try_acquire(&b).is_some());

        drop(guard);
        assert!(registry.try_acquire(&a2).is_some());
    }

    #[test]
    fn test_slot_evicted_after_last_run() {
        let registry = JobRegistry::new();
        let first = registry.enter(&"a".into());
        let second = registry.enter(&"a".into());
        assert_eq!(registry.active_resources(), 1);

        drop(first);
        assert!(registry.is_active(&"a".into()));

        drop(second);
        assert!(!registry.is_active(&"a".into()));
        assert_eq!(registry.active_resources(), 0);
    }

    #[test]
    fn test_guard_outliving_eviction_does_not_leak_slot() {
        let registry = JobRegistry::new();
        let ticket = registry.enter(&"a".into());
        let guard = registry.try_acquire(&ticket);
        drop(ticket);
        drop(guard);
        assert_eq!(registry.active_resources(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_enter_and_leave_leaves_map_empty() {
        let registry = JobRegistry::new();
        let mut handles = Vec::new();
        for i in 0..64 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                let id: ResourceId = format!("r{}", i % 4).into();
                let ticket = registry.enter(&id);
                tokio::task::yield_now().await;
                let _guard = registry.try_acquire(&ticket);
                tokio::task::yield_now().await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(registry.active_resources(), 0);
    }
}
