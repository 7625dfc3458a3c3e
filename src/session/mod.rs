//! Listening session supervision: keep-alive health checks and bounded,
//! fixed-delay restarts of the speech recognizer.

pub mod callbacks;
pub mod config;
pub mod events;
pub mod manager;
pub mod state;

pub use callbacks::{BackgroundAudio, BoxFuture, HealthCheckCallback, RestartCallback};
pub use config::{ListeningSessionConfig, ListeningSessionConfigUpdate};
pub use events::{SessionChange, SessionEvent};
pub use manager::{ListeningSessionManager, MAX_RESTART_ERROR};
pub use state::{ListeningMode, ListeningSessionState, SessionPhase};
