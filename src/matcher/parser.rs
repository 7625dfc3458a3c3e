use std::sync::{Arc, RwLock};
use tracing::debug;

use super::patterns;
use super::similarity::similarity;
use super::types::{MatchStage, MatcherConfig, ParsedCommand, PATTERN_CONFIDENCE};
use crate::catalog::{CommandDefinition, SlotMap};

/// Turns finalized utterances into commands.
///
/// Stages run in order and the first hit wins:
/// 1. exact phrase match (always on, confidence 1.0)
/// 2. numeric pattern extraction (confidence 0.9)
/// 3. fuzzy similarity against every phrase (confidence = score)
///
/// The catalog is an immutable snapshot behind an `Arc`; `update_commands`
/// swaps the whole snapshot so a parse in progress never sees a partial update.
pub struct CommandParser {
    commands: RwLock<Arc<Vec<CommandDefinition>>>,
    config: RwLock<MatcherConfig>,
}

impl CommandParser {
    pub fn new(commands: Vec<CommandDefinition>) -> Self {
        Self::with_config(commands, MatcherConfig::default())
    }

    pub fn with_config(commands: Vec<CommandDefinition>, config: MatcherConfig) -> Self {
        Self {
            commands: RwLock::new(Arc::new(commands)),
            config: RwLock::new(config),
        }
    }

    pub fn parse(&self, text: &str, language: &str) -> Option<ParsedCommand> {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return None;
        }

        let commands = self.snapshot();
        let config = self.config();

        // === 1. EXACT ===
        if let Some(command) = exact_match(&commands, &normalized, language) {
            debug!(stage = "exact", intent = %command.intent, "Command matched");
            return Some(from_definition(command, 1.0, text, MatchStage::Exact));
        }

        // === 2. PATTERN ===
        if config.enable_regex_extraction {
            if let Some(hit) = patterns::extract(&normalized, language) {
                debug!(stage = "pattern", intent = hit.kind.intent(), value = %hit.value, "Command matched");
                let mut slot = SlotMap::new();
                slot.insert(hit.kind.slot_key().to_string(), hit.value);
                return Some(ParsedCommand {
                    intent: hit.kind.intent().to_string(),
                    action: Some(hit.kind.action().to_string()),
                    slot: Some(slot),
                    confidence: PATTERN_CONFIDENCE,
                    original_text: text.to_string(),
                    stage: MatchStage::Pattern,
                });
            }
        }

        // === 3. FUZZY ===
        if config.enable_fuzzy_match {
            if let Some((command, score)) = best_fuzzy_match(&commands, &normalized, language) {
                if score > 0.0 && score >= config.confidence_threshold {
                    debug!(stage = "fuzzy", intent = %command.intent, score, "Command matched");
                    return Some(from_definition(command, score, text, MatchStage::Fuzzy));
                }
                debug!(best = score, threshold = config.confidence_threshold, "Fuzzy score below threshold");
            }
        }

        debug!(text = %normalized, language, "No command recognized");
        None
    }

    /// Replace the whole catalog (e.g. after a language change).
    pub fn update_commands(&self, commands: Vec<CommandDefinition>) {
        let count = commands.len();
        *self.commands.write().unwrap_or_else(|e| e.into_inner()) = Arc::new(commands);
        debug!(count, "Command catalog replaced");
    }

    /// Owned copy of the current catalog.
    pub fn get_commands(&self) -> Vec<CommandDefinition> {
        self.snapshot().as_ref().clone()
    }

    pub fn config(&self) -> MatcherConfig {
        self.config.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn update_config(&self, config: MatcherConfig) {
        *self.config.write().unwrap_or_else(|e| e.into_inner()) = config;
    }

    fn snapshot(&self) -> Arc<Vec<CommandDefinition>> {
        self.commands.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Normalized, non-empty phrases of a definition for `language`.
fn phrases<'a>(
    command: &'a CommandDefinition,
    language: &str,
) -> impl Iterator<Item = String> + 'a {
    command
        .utterances_for(language)
        .unwrap_or(&[])
        .iter()
        .map(|p| normalize(p))
        .filter(|p| !p.is_empty())
}

fn exact_match<'a>(
    commands: &'a [CommandDefinition],
    normalized: &str,
    language: &str,
) -> Option<&'a CommandDefinition> {
    commands
        .iter()
        .find(|command| phrases(command, language).any(|p| p == normalized))
}

/// Highest scoring definition. Strictly-greater replacement keeps the
/// first registered definition on ties.
fn best_fuzzy_match<'a>(
    commands: &'a [CommandDefinition],
    normalized: &str,
    language: &str,
) -> Option<(&'a CommandDefinition, f32)> {
    let mut best: Option<(&CommandDefinition, f32)> = None;

    for command in commands {
        for phrase in phrases(command, language) {
            let score = similarity(normalized, &phrase);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((command, score));
            }
        }
    }

    best
}

fn from_definition(
    command: &CommandDefinition,
    confidence: f32,
    original_text: &str,
    stage: MatchStage,
) -> ParsedCommand {
    ParsedCommand {
        intent: command.intent.clone(),
        action: command.action.clone(),
        slot: command.slot.clone().filter(|s| !s.is_empty()),
        confidence,
        original_text: original_text.to_string(),
        stage,
    }
}

