use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;
use uuid::Uuid;

/// How the recognizer is being driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListeningMode {
    /// Single utterance, then stop.
    #[default]
    Oneshot,
    /// Listen until told to stop. The only mode that gets keep-alive supervision.
    Continuous,
    /// Wait for a trigger phrase. Trigger detection lives outside this crate.
    WakeWord,
}

impl fmt::Display for ListeningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ListeningMode::Oneshot => "oneshot",
            ListeningMode::Continuous => "continuous",
            ListeningMode::WakeWord => "wake-word",
        };
        f.write_str(name)
    }
}

impl FromStr for ListeningMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oneshot" | "one-shot" => Ok(ListeningMode::Oneshot),
            "continuous" => Ok(ListeningMode::Continuous),
            "wake-word" | "wakeword" | "wake_word" => Ok(ListeningMode::WakeWord),
            other => Err(format!("unknown listening mode '{other}'")),
        }
    }
}

/// Coarse view of the supervisor state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Never started.
    Idle,
    ActiveHealthy,
    /// A restart timer or restart callback is outstanding.
    ActiveRestarting,
    Stopped,
}

/// Observable session state. One per manager, lives as long as the manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListeningSessionState {
    /// Id of the current (or most recent) session, for log correlation.
    pub session_id: Option<Uuid>,
    pub is_active: bool,
    pub mode: ListeningMode,
    pub restart_attempts: u32,
    pub restart_pending: bool,
    pub last_error: Option<String>,
    pub last_restart: Option<SystemTime>,
}

impl Default for ListeningSessionState {
    fn default() -> Self {
        Self {
            session_id: None,
            is_active: false,
            mode: ListeningMode::default(),
            restart_attempts: 0,
            restart_pending: false,
            last_error: None,
            last_restart: None,
        }
    }
}

impl ListeningSessionState {
    pub fn phase(&self) -> SessionPhase {
        match (self.is_active, self.restart_pending) {
            (true, true) => SessionPhase::ActiveRestarting,
            (true, false) => SessionPhase::ActiveHealthy,
            (false, _) if self.session_id.is_some() => SessionPhase::Stopped,
            (false, _) => SessionPhase::Idle,
        }
    }
}
