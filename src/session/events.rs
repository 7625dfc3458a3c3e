use serde::{Deserialize, Serialize};

use super::state::ListeningSessionState;

/// What caused a state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionChange {
    Started,
    Stopped,
    /// Healthy check after failed attempts; attempts reset to 0.
    HealthRestored,
    RestartScheduled { attempt: u32 },
    Restarted,
    RestartFailed { error: String },
    /// Caller-reported recognizer error.
    ErrorReported { message: String },
    /// Attempt cap exceeded; the session has been stopped.
    GaveUp,
    ConfigUpdated,
}

/// Published to every subscriber on each state mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEvent {
    pub change: SessionChange,
    pub state: ListeningSessionState,
}
