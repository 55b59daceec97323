//! Custom actions for the Ledger actor.

use crate::model::NewAttempt;

#[derive(Debug, Clone)]
pub enum LedgerAction {
    /// Persists one attempt; the reply carries the stored row with its sequence number.
    Append(NewAttempt),
}
