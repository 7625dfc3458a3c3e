use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Operator-supplied supervision settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListeningSessionConfig {
    #[serde(default = "default_true")]
    pub enable_keep_alive: bool,
    /// Health check period for continuous sessions.
    #[serde(default = "default_keep_alive_interval_ms")]
    pub keep_alive_interval_ms: u64,
    #[serde(default = "default_true")]
    pub auto_restart: bool,
    #[serde(default = "default_max_restart_attempts")]
    pub max_restart_attempts: u32,
    /// Fixed delay before each restart (no backoff).
    #[serde(default = "default_restart_delay_ms")]
    pub restart_delay_ms: u64,
}

fn default_true() -> bool {
    true
}
fn default_keep_alive_interval_ms() -> u64 {
    5000
}
fn default_max_restart_attempts() -> u32 {
    5
}
fn default_restart_delay_ms() -> u64 {
    1000
}

impl Default for ListeningSessionConfig {
    fn default() -> Self {
        Self {
            enable_keep_alive: true,
            keep_alive_interval_ms: default_keep_alive_interval_ms(),
            auto_restart: true,
            max_restart_attempts: default_max_restart_attempts(),
            restart_delay_ms: default_restart_delay_ms(),
        }
    }
}

impl ListeningSessionConfig {
    /// Never zero: a zero period would make the ticker spin.
    pub fn keep_alive_interval(&self) -> Duration {
        Duration::from_millis(self.keep_alive_interval_ms.max(1))
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }

    pub fn apply(&mut self, update: ListeningSessionConfigUpdate) {
        if let Some(v) = update.enable_keep_alive {
            self.enable_keep_alive = v;
        }
        if let Some(v) = update.keep_alive_interval_ms {
            self.keep_alive_interval_ms = v;
        }
        if let Some(v) = update.auto_restart {
            self.auto_restart = v;
        }
        if let Some(v) = update.max_restart_attempts {
            self.max_restart_attempts = v;
        }
        if let Some(v) = update.restart_delay_ms {
            self.restart_delay_ms = v;
        }
    }
}

/// Partial config for `update_config`; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListeningSessionConfigUpdate {
    pub enable_keep_alive: Option<bool>,
    pub keep_alive_interval_ms: Option<u64>,
    pub auto_restart: Option<bool>,
    pub max_restart_attempts: Option<u32>,
    pub restart_delay_ms: Option<u64>,
}
