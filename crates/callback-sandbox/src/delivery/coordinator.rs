//! # Delivery Coordinator
//!
//! Runs the retry loop for one resource at a time, any number of resources in parallel.
//!
//! ## A run
//!
//! 1. Reload the resource; stop if it is unknown or already acknowledged.
//! 2. Resolve the merchant's [`RetryPolicy`](crate::policy::RetryPolicy) and read the ledger.
//!    An acknowledged attempt in the ledger also stops the run, and the resource's status is
//!    written back from it. Otherwise subtract the attempts already made; nothing left means
//!    nothing to do.
//! 3. Prepare the notification body once.
//! 4. For each remaining attempt: wait `interval` (except before the first), take the
//!    resource's lock without waiting, re-check status, ledger and budget, POST, persist the attempt,
//!    publish an event, write back the status. Stop on the first acknowledgement.
//!
//! If the lock is taken, another run is mid-attempt for the same resource; the iteration is
//! skipped without spending budget. The lock covers the attempt's persistence, so the next
//! holder's re-check always sees it.

use super::outcome::RunOutcome;
use super::pool::RunPool;
use super::ports::{DeliveryLedger, MerchantDirectory, ResourceRepository, StoreError};
use super::registry::{JobRegistry, RunTicket};
use super::DeliveryError;
use crate::broker::BrokerClient;
use crate::model::{
    BroadcastEvent, CallbackStatus, DeliveryAttempt, NewAttempt, Resource, ResourceId,
    ResourceKind,
};
use crate::policy::PolicyResolver;
use crate::sender::NotificationSender;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, info_span, instrument, warn, Instrument};

/// Everything a run reads from or writes to.
#[derive(Clone)]
pub struct Collaborators {
    pub resources: Arc<dyn ResourceRepository>,
    pub merchants: Arc<dyn MerchantDirectory>,
    pub ledger: Arc<dyn DeliveryLedger>,
    pub policies: Arc<dyn PolicyResolver>,
    pub sender: Arc<dyn NotificationSender>,
    pub broker: BrokerClient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorSettings {
    pub max_concurrent_runs: usize,
    pub max_queued_runs: usize,
    /// Lower bound on the wait after a skipped iteration.
    pub min_skip_spacing: Duration,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            max_concurrent_runs: 64,
            max_queued_runs: 1024,
            min_skip_spacing: Duration::from_millis(100),
        }
    }
}

struct Inner {
    deps: Collaborators,
    registry: JobRegistry,
    pool: RunPool,
    min_skip_spacing: Duration,
}

#[derive(Clone)]
pub struct DeliveryCoordinator {
    inner: Arc<Inner>,
}

impl DeliveryCoordinator {
    pub fn new(deps: Collaborators, settings: CoordinatorSettings) -> Self {
        Self {
            inner: Arc::new(Inner {
                deps,
                registry: JobRegistry::new(),
                pool: RunPool::new(settings.max_concurrent_runs, settings.max_queued_runs),
                min_skip_spacing: settings.min_skip_spacing,
            }),
        }
    }

    /// Schedules a delivery run and returns immediately.
    ///
    /// Called when a payment or refund reaches its terminal state. Never fails: a rejected
    /// submission is logged.
    pub fn trigger_delivery(&self, id: ResourceId) {
        self.schedule(id, "trigger");
    }

    /// Operator-initiated retry. Same semantics as [`trigger_delivery`](Self::trigger_delivery):
    /// an acknowledged resource is left alone and the attempt budget still applies.
    pub fn retry_delivery(&self, id: ResourceId) {
        info!(resource_id = %id, "Operator requested callback retry");
        self.schedule(id, "retry");
    }

    fn schedule(&self, id: ResourceId, origin: &'static str) {
        let span = info_span!("delivery_run", resource_id = %id, origin);
        let coordinator = self.clone();
        let run_id = id.clone();
        let submitted = self.inner.pool.submit(
            async move {
                coordinator.run_delivery(run_id).await;
            }
            .instrument(span),
        );
        if let Err(e) = submitted {
            warn!(resource_id = %id, origin, error = %e, "Delivery run not scheduled");
        }
    }

    /// Executes one run to completion on the current task.
    #[instrument(skip(self), fields(resource_id = %id))]
    pub async fn run_delivery(&self, id: ResourceId) -> RunOutcome {
        let ticket = self.inner.registry.enter(&id);
        let outcome = match self.execute(&ticket).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "Delivery run aborted");
                RunOutcome::Aborted {
                    reason: e.to_string(),
                }
            }
        };
        info!(%outcome, "Delivery run finished");
        outcome
    }

    /// The attempt history of a resource, oldest first.
    pub async fn history(&self, id: &ResourceId) -> Result<Vec<DeliveryAttempt>, StoreError> {
        self.inner.deps.ledger.history(id).await
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.inner.registry
    }

    /// Runs accepted and not yet finished.
    pub fn pending_runs(&self) -> usize {
        self.inner.pool.pending()
    }

    pub async fn wait_idle(&self) {
        self.inner.pool.wait_idle().await;
    }

    /// Refuses new runs and waits for in-flight ones. In-flight runs are not cancelled.
    pub async fn shutdown(&self) {
        self.inner.pool.shutdown().await;
    }

    async fn execute(&self, ticket: &RunTicket) -> Result<RunOutcome, DeliveryError> {
        let deps = &self.inner.deps;
        let id = ticket.resource_id();

        let Some(resource) = deps.resources.load(id).await? else {
            warn!("Resource not found");
            return Ok(RunOutcome::NotFound);
        };
        if resource.callback_status == CallbackStatus::Success {
            debug!("Callback already acknowledged, skipping");
            return Ok(RunOutcome::AlreadyDelivered);
        }

        let policy = deps.policies.resolve(&resource.mch_id).await;
        let summary = deps.ledger.summary(id).await?;
        if let Some(response) = summary.acknowledgement {
            info!("Ledger holds an acknowledged attempt, repairing callback status");
            deps.resources
                .update_callback_status(id, CallbackStatus::Success, &response)
                .await?;
            return Ok(RunOutcome::AlreadyDelivered);
        }
        let prior = summary.attempts;
        if prior >= policy.max_attempts {
            info!(prior, max_attempts = policy.max_attempts, "Attempt budget exhausted");
            return Ok(RunOutcome::BudgetExhausted {
                prior_attempts: prior,
                max_attempts: policy.max_attempts,
            });
        }
        let remaining = policy.max_attempts - prior;

        let notify_url = self.resolve_notify_url(&resource).await?;
        let notification = deps.sender.prepare(&resource, &notify_url)?;
        debug!(
            remaining,
            interval = ?policy.interval,
            url = %notify_url,
            "Starting attempt loop"
        );

        let mut attempts = 0;
        let mut skipped = 0;
        let mut status = resource.callback_status;
        let mut last_skipped = false;

        for iteration in 1..=remaining {
            if iteration > 1 {
                let delay = if last_skipped {
                    policy.interval.max(self.inner.min_skip_spacing)
                } else {
                    policy.interval
                };
                tokio::time::sleep(delay).await;
            }

            let Some(guard) = self.inner.registry.try_acquire(ticket) else {
                debug!(iteration, "Attempt in flight elsewhere, skipping iteration");
                skipped += 1;
                last_skipped = true;
                continue;
            };
            last_skipped = false;

            match deps.resources.load(id).await? {
                None => {
                    warn!("Resource disappeared mid-run");
                    break;
                }
                Some(current) if current.callback_status == CallbackStatus::Success => {
                    debug!("Acknowledged by a concurrent run");
                    status = CallbackStatus::Success;
                    break;
                }
                Some(_) => {}
            }
            let summary = deps.ledger.summary(id).await?;
            if let Some(response) = summary.acknowledgement {
                debug!("Ledger holds an acknowledged attempt, repairing callback status");
                deps.resources
                    .update_callback_status(id, CallbackStatus::Success, &response)
                    .await?;
                status = CallbackStatus::Success;
                break;
            }
            if summary.attempts >= policy.max_attempts {
                debug!("Budget spent by a concurrent run");
                break;
            }

            let sent = deps.sender.send(&notification).await;
            let row = deps
                .ledger
                .append(
                    id,
                    NewAttempt {
                        notify_url: notification.notify_url.clone(),
                        request_body: notification.body.clone(),
                        response: sent.response,
                        status_code: sent.status_code,
                        outcome: sent.outcome,
                    },
                )
                .await?;
            attempts += 1;

            if let Err(e) = deps.broker.publish(BroadcastEvent::callback(&resource, &row)) {
                warn!(sequence = row.sequence, error = %e, "Callback event not published");
            }

            status = row.outcome.into();
            deps.resources
                .update_callback_status(id, status, &row.response)
                .await?;
            drop(guard);

            if row.outcome.is_success() {
                info!(sequence = row.sequence, status_code = ?row.status_code, "Callback acknowledged");
                break;
            }
            warn!(
                sequence = row.sequence,
                status_code = ?row.status_code,
                response = %row.response,
                "Callback attempt failed"
            );
        }

        Ok(RunOutcome::Completed {
            attempts,
            skipped,
            status,
        })
    }

    /// The resource's own URL, else the merchant's (for refunds, `refund_notify_url` first).
    async fn resolve_notify_url(&self, resource: &Resource) -> Result<String, StoreError> {
        if !resource.notify_url.is_empty() {
            return Ok(resource.notify_url.clone());
        }
        let Some(merchant) = self.inner.deps.merchants.find(&resource.mch_id).await? else {
            warn!(mch_id = %resource.mch_id, "No notify URL and unknown merchant");
            return Ok(String::new());
        };
        let url = match resource.kind() {
            ResourceKind::Refund if !merchant.refund_notify_url.is_empty() => {
                merchant.refund_notify_url
            }
            _ => merchant.notify_url,
        };
        Ok(url)
    }
}
