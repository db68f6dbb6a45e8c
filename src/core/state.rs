//! Dispatch outcome records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Final status of one triggered execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchStatus {
    /// The unit of work finished without error
    Completed,
    /// The unit of work returned an error nobody handled
    Failed { error: String },
    /// The unit of work panicked
    Panicked { message: String },
}

impl DispatchStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchStatus::Completed)
    }
}

/// Record of a single execution started by `Context::trigger`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchOutcome {
    /// Unique id of this execution
    pub dispatch_id: Uuid,

    /// Identifier of the context the unit ran against
    pub context: String,

    /// Name that was triggered
    pub name: String,

    /// When the execution was spawned
    pub started_at: DateTime<Utc>,

    /// When the execution was collected
    pub finished_at: DateTime<Utc>,

    pub status: DispatchStatus,
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Wall-clock time between spawn and collection
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
