use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading or validating a command catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("command #{index} has an empty intent")]
    EmptyIntent { index: usize },

    #[error("command '{intent}' has no utterances for language '{language}'")]
    EmptyUtterances { intent: String, language: String },
}

/// Failures while loading the application configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("confidence threshold must be within [0, 1], got {0}")]
    ThresholdOutOfRange(f32),
}
