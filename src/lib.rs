pub mod catalog;
pub mod config;
pub mod errors;
pub mod matcher;
pub mod recognizer;
pub mod session;

// Re-export the composition-root types for convenient access
pub use config::AppConfig;
pub use matcher::{CommandParser, ParsedCommand};
pub use recognizer::{RecognizerAdapter, RecognizerEvent, VoicePipeline};
pub use session::{ListeningMode, ListeningSessionManager};
