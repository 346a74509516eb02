use serde::{Deserialize, Serialize};

/// Identity of the listing whose sold tickets are being proven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Backend id of the listing/order that owns the slots
    pub container_id: i64,
    pub max_quantity: u32,
}

/// Progress counters reported to the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionStatus {
    pub completed: u32,
    pub total: u32,
}

impl CompletionStatus {
    pub fn new(completed: u32, total: u32) -> Self {
        Self { completed, total }
    }

    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }
}

/// Result of a user-initiated submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// The collaborator accepted the payload; the session was cleared
    Submitted,
    /// The diff was empty, nothing was sent
    NothingToSubmit,
}
