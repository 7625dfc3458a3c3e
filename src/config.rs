use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::catalog::{self, CommandDefinition, DEFAULT_LANGUAGE};
use crate::errors::{CatalogError, ConfigError};
use crate::matcher::MatcherConfig;
use crate::recognizer::DEFAULT_CONFIRMATION_THRESHOLD;
use crate::session::ListeningSessionConfig;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "MURMUR_CONFIG";

/// Application configuration. Every field has a default, so an empty
/// JSON object (or no file at all) is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_language")]
    pub language: String,
    /// Catalog JSON file; the embedded catalog is used when unset.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    #[serde(default)]
    pub matcher: MatcherConfig,
    #[serde(default)]
    pub session: ListeningSessionConfig,
    #[serde(default = "default_confirmation_threshold")]
    pub confirmation_threshold: f32,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_confirmation_threshold() -> f32 {
    DEFAULT_CONFIRMATION_THRESHOLD
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            catalog_path: None,
            matcher: MatcherConfig::default(),
            session: ListeningSessionConfig::default(),
            confirmation_threshold: default_confirmation_threshold(),
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from `$MURMUR_CONFIG` if set, defaults otherwise.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for threshold in [self.matcher.confidence_threshold, self.confirmation_threshold] {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError::ThresholdOutOfRange(threshold));
            }
        }
        Ok(())
    }

    /// The configured catalog file, or the embedded one.
    pub fn load_catalog(&self) -> Result<Vec<CommandDefinition>, CatalogError> {
        match &self.catalog_path {
            Some(path) => catalog::load_catalog(path),
            None => catalog::default_catalog(),
        }
    }
}
