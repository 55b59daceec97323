//! Custom actions for the Resource actor.

use crate::model::CallbackStatus;

#[derive(Debug, Clone)]
pub enum ResourceAction {
    /// Writes back the outcome of the latest delivery attempt.
    ///
    /// `message` is the response body or transport error text of that attempt.
    RecordCallback {
        status: CallbackStatus,
        message: String,
    },
}

/// Results from ResourceActions - variants match 1:1 with ResourceAction
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceActionResult {
    /// The status before the write.
    RecordCallback(CallbackStatus),
}
