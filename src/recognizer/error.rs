use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Fixed taxonomy for adapter errors, derived from code/message text only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecognitionErrorKind {
    /// No speech engine on this platform.
    Unavailable,
    PermissionDenied,
    NoSpeech,
    Network,
    Unknown,
}

/// Checked in order; the first category with a matching substring wins.
const CLASSIFICATION: &[(RecognitionErrorKind, &[&str])] = &[
    (RecognitionErrorKind::Unavailable, &["not available", "no asr adapter"]),
    (RecognitionErrorKind::PermissionDenied, &["permission", "not-allowed", "denied"]),
    (RecognitionErrorKind::NoSpeech, &["no speech", "no-speech"]),
    (RecognitionErrorKind::Network, &["network"]),
];

impl RecognitionErrorKind {
    /// Case-insensitive substring classification over code and message.
    pub fn classify(code: &str, message: &str) -> Self {
        let haystack = format!("{code} {message}").to_lowercase();
        CLASSIFICATION
            .iter()
            .find(|(_, needles)| needles.iter().any(|n| haystack.contains(n)))
            .map(|(kind, _)| *kind)
            .unwrap_or(RecognitionErrorKind::Unknown)
    }

    pub fn is_recoverable(self) -> bool {
        !matches!(self, RecognitionErrorKind::Unavailable)
    }

    /// Whether restarting the recognizer can plausibly help.
    /// Permission problems and silence are retried by the user, not the supervisor.
    pub fn needs_restart(self) -> bool {
        matches!(self, RecognitionErrorKind::Network | RecognitionErrorKind::Unknown)
    }

    pub fn user_action(self) -> &'static str {
        match self {
            RecognitionErrorKind::Unavailable => "Voice commands are not supported on this device",
            RecognitionErrorKind::PermissionDenied => "Allow microphone access, then try again",
            RecognitionErrorKind::NoSpeech => "No speech detected, try again",
            RecognitionErrorKind::Network => "Check your connection and try again",
            RecognitionErrorKind::Unknown => "Something went wrong, try again",
        }
    }
}

impl fmt::Display for RecognitionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecognitionErrorKind::Unavailable => "unavailable",
            RecognitionErrorKind::PermissionDenied => "permission-denied",
            RecognitionErrorKind::NoSpeech => "no-speech",
            RecognitionErrorKind::Network => "network",
            RecognitionErrorKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// An adapter error with its classification attached.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{kind} recognizer error [{code}]: {message}")]
pub struct RecognitionError {
    pub kind: RecognitionErrorKind,
    pub code: String,
    pub message: String,
}

impl RecognitionError {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            kind: RecognitionErrorKind::classify(code, message),
            code: code.to_string(),
            message: message.to_string(),
        }
    }
}
