use std::fs;
use std::path::Path;
use tracing::info;

use super::types::CommandDefinition;
use crate::errors::CatalogError;

/// Media-player catalog shipped with the crate.
const EMBEDDED_CATALOG: &str = include_str!("../../assets/commands.json");

/// Parse and validate a catalog from JSON text.
pub fn parse_catalog(json: &str) -> Result<Vec<CommandDefinition>, CatalogError> {
    let commands: Vec<CommandDefinition> = serde_json::from_str(json)?;
    validate(&commands)?;
    Ok(commands)
}

/// Load a catalog file. Order of entries is preserved (it is the tie-break order).
pub fn load_catalog(path: &Path) -> Result<Vec<CommandDefinition>, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let commands = parse_catalog(&content)?;
    info!("Loaded {} commands from {}", commands.len(), path.display());
    Ok(commands)
}

/// The embedded default catalog.
pub fn default_catalog() -> Result<Vec<CommandDefinition>, CatalogError> {
    parse_catalog(EMBEDDED_CATALOG)
}

/// Invariants: intent non-empty, every present utterance list non-empty.
pub fn validate(commands: &[CommandDefinition]) -> Result<(), CatalogError> {
    for (index, command) in commands.iter().enumerate() {
        if command.intent.trim().is_empty() {
            return Err(CatalogError::EmptyIntent { index });
        }
        for (language, phrases) in &command.utterances {
            if phrases.iter().all(|p| p.trim().is_empty()) {
                return Err(CatalogError::EmptyUtterances {
                    intent: command.intent.clone(),
                    language: language.clone(),
                });
            }
        }
    }
    Ok(())
}
