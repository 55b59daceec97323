use crate::model::CallbackStatus;
use std::fmt::Display;

/// How a delivery run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No resource with this id.
    NotFound,
    /// The resource was already acknowledged; nothing was sent.
    AlreadyDelivered,
    /// Earlier runs used up the attempt budget; nothing was sent.
    BudgetExhausted { prior_attempts: u32, max_attempts: u32 },
    /// The attempt loop ran. `status` is the resource's callback status afterwards.
    Completed {
        attempts: u32,
        skipped: u32,
        status: CallbackStatus,
    },
    /// A storage collaborator failed mid-run.
    Aborted { reason: String },
}

impl RunOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            RunOutcome::Completed { attempts, .. } => *attempts,
            _ => 0,
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(
            self,
            RunOutcome::AlreadyDelivered
                | RunOutcome::Completed {
                    status: CallbackStatus::Success,
                    ..
                }
        )
    }
}

impl Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunOutcome::NotFound => f.write_str("resource not found"),
            RunOutcome::AlreadyDelivered => f.write_str("already delivered"),
            RunOutcome::BudgetExhausted {
                prior_attempts,
                max_attempts,
            } => write!(f, "budget exhausted ({prior_attempts}/{max_attempts})"),
            RunOutcome::Completed {
                attempts,
                skipped,
                status,
            } => write!(f, "{attempts} attempts, {skipped} skipped, status {status}"),
            RunOutcome::Aborted { reason } => write!(f, "aborted: {reason}"),
        }
    }
}
