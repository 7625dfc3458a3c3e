use serde::{Deserialize, Serialize};

/// Confidence assumed when the engine does not report one for a final result.
pub const DEFAULT_FINAL_CONFIDENCE: f32 = 0.85;

/// Events a speech engine emits. Adapters push these into an
/// `mpsc::Sender<RecognizerEvent>` handed to them at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecognizerEvent {
    /// Streaming partial text. May fire many times per utterance.
    Interim { text: String },
    /// Finalized utterance.
    Final {
        text: String,
        confidence: Option<f32>,
    },
    /// Adapter-defined code such as "not-allowed", "no-speech", "network".
    Error { code: String, message: String },
}

impl RecognizerEvent {
    pub fn interim(text: &str) -> Self {
        RecognizerEvent::Interim {
            text: text.to_string(),
        }
    }

    pub fn final_text(text: &str, confidence: Option<f32>) -> Self {
        RecognizerEvent::Final {
            text: text.to_string(),
            confidence,
        }
    }

    pub fn error(code: &str, message: &str) -> Self {
        RecognizerEvent::Error {
            code: code.to_string(),
            message: message.to_string(),
        }
    }
}

/// A native or browser speech engine.
///
/// `start` while started and `stop` while stopped must be no-ops.
pub trait RecognizerAdapter: Send + Sync {
    fn is_available(&self) -> bool;
    fn start(&self) -> anyhow::Result<()>;
    fn stop(&self) -> anyhow::Result<()>;
}
