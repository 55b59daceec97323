use super::{CallbackStatus, ResourceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AttemptOutcome {
    Success,
    Fail,
}

impl AttemptOutcome {
    /// Any 2xx status is an acknowledgement.
    pub fn from_status(status_code: u16) -> Self {
        if (200..300).contains(&status_code) {
            AttemptOutcome::Success
        } else {
            AttemptOutcome::Fail
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success)
    }
}

impl From<AttemptOutcome> for CallbackStatus {
    fn from(outcome: AttemptOutcome) -> Self {
        match outcome {
            AttemptOutcome::Success => CallbackStatus::Success,
            AttemptOutcome::Fail => CallbackStatus::Fail,
        }
    }
}

impl Display for AttemptOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptOutcome::Success => f.write_str("SUCCESS"),
            AttemptOutcome::Fail => f.write_str("FAIL"),
        }
    }
}

/// An attempt as handed to the ledger. The ledger assigns the sequence number and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttempt {
    pub notify_url: String,
    pub request_body: String,
    /// Response body, or the transport error text when no response arrived.
    pub response: String,
    /// `None` when the request never got a response.
    pub status_code: Option<u16>,
    pub outcome: AttemptOutcome,
}

/// One persisted row of the delivery history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryAttempt {
    pub resource_id: ResourceId,
    /// 1-based, gapless per resource.
    pub sequence: u32,
    pub notify_url: String,
    pub request_body: String,
    pub response: String,
    pub status_code: Option<u16>,
    pub outcome: AttemptOutcome,
    pub created_at: DateTime<Utc>,
}

impl DeliveryAttempt {
    pub fn from_new(resource_id: ResourceId, sequence: u32, attempt: NewAttempt) -> Self {
        Self {
            resource_id,
            sequence,
            notify_url: attempt.notify_url,
            request_body: attempt.request_body,
            response: attempt.response,
            status_code: attempt.status_code,
            outcome: attempt.outcome,
            created_at: Utc::now(),
        }
    }
}

/// All attempts for one resource, in sequence order. The ledger actor stores one per resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptHistory {
    pub resource_id: ResourceId,
    pub attempts: Vec<DeliveryAttempt>,
}

impl AttemptHistory {
    pub fn new(resource_id: ResourceId) -> Self {
        Self {
            resource_id,
            attempts: Vec::new(),
        }
    }

    pub fn count(&self) -> u32 {
        self.attempts.len() as u32
    }

    pub fn last(&self) -> Option<&DeliveryAttempt> {
        self.attempts.last()
    }

    /// The first acknowledged attempt, if any.
    pub fn acknowledgement(&self) -> Option<&DeliveryAttempt> {
        self.attempts.iter().find(|a| a.outcome.is_success())
    }

    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary {
            attempts: self.count(),
            acknowledgement: self.acknowledgement().map(|a| a.response.clone()),
        }
    }
}

/// What a delivery run needs to know about a resource's history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerSummary {
    pub attempts: u32,
    /// Response of the acknowledged attempt. `Some` means nothing may be sent again.
    pub acknowledgement: Option<String>,
}

impl LedgerSummary {
    pub fn is_acknowledged(&self) -> bool {
        self.acknowledgement.is_some()
    }
}
