use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::adapter::{RecognizerEvent, DEFAULT_FINAL_CONFIDENCE};
use super::error::RecognitionError;
use crate::matcher::{CommandParser, ParsedCommand};
use crate::session::ListeningSessionManager;

/// Below this combined confidence the caller should confirm before executing.
pub const DEFAULT_CONFIRMATION_THRESHOLD: f32 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutput {
    Partial(String),
    Command {
        command: ParsedCommand,
        /// Engine confidence for the utterance (defaulted when absent).
        recognizer_confidence: f32,
        needs_confirmation: bool,
    },
    /// Final text that matched nothing. Not an error.
    Unrecognized { text: String },
    Error(RecognitionError),
}

/// Routes recognizer events: finals to the matcher, restart-worthy errors
/// to the session manager. Parsing and supervision stay decoupled; the
/// pipeline only forwards.
pub struct VoicePipeline {
    parser: Arc<CommandParser>,
    session: ListeningSessionManager,
    language: String,
    confirmation_threshold: f32,
}

impl VoicePipeline {
    pub fn new(parser: Arc<CommandParser>, session: ListeningSessionManager, language: &str) -> Self {
        Self {
            parser,
            session,
            language: language.to_string(),
            confirmation_threshold: DEFAULT_CONFIRMATION_THRESHOLD,
        }
    }

    pub fn with_confirmation_threshold(mut self, threshold: f32) -> Self {
        self.confirmation_threshold = threshold;
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, language: &str) {
        self.language = language.to_string();
    }

    pub fn handle_event(&self, event: RecognizerEvent) -> PipelineOutput {
        match event {
            RecognizerEvent::Interim { text } => PipelineOutput::Partial(text),

            RecognizerEvent::Final { text, confidence } => {
                let recognizer_confidence = confidence
                    .filter(|c| c.is_finite())
                    .map(|c| c.clamp(0.0, 1.0))
                    .unwrap_or(DEFAULT_FINAL_CONFIDENCE);

                match self.parser.parse(&text, &self.language) {
                    Some(command) => {
                        let combined = command.confidence.min(recognizer_confidence);
                        let needs_confirmation = combined < self.confirmation_threshold;
                        info!(
                            intent = %command.intent,
                            action = ?command.action,
                            confidence = command.confidence,
                            needs_confirmation,
                            "Utterance parsed"
                        );
                        PipelineOutput::Command {
                            command,
                            recognizer_confidence,
                            needs_confirmation,
                        }
                    }
                    None => {
                        debug!(text = %text, "Utterance did not match any command");
                        PipelineOutput::Unrecognized { text }
                    }
                }
            }

            RecognizerEvent::Error { code, message } => {
                let error = RecognitionError::new(&code, &message);
                warn!(kind = %error.kind, code = %code, "Recognizer error: {}", message);
                if error.kind.needs_restart() {
                    self.session.on_error(&error.to_string());
                }
                PipelineOutput::Error(error)
            }
        }
    }

    /// Drain recognizer events until either channel closes.
    pub async fn run(
        &self,
        mut events: mpsc::Receiver<RecognizerEvent>,
        outputs: mpsc::Sender<PipelineOutput>,
    ) {
        while let Some(event) = events.recv().await {
            let output = self.handle_event(event);
            if outputs.send(output).await.is_err() {
                debug!("Pipeline output receiver dropped");
                break;
            }
        }
        debug!("Recognizer event stream closed");
    }
}
