use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Slot values attached to a command (e.g. `{"seconds": 30}`).
pub type SlotMap = serde_json::Map<String, serde_json::Value>;

/// Language used when a definition has no phrases for the requested one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// One entry of the command catalog. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDefinition {
    /// Action family, e.g. "seek_control". Never empty.
    pub intent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Static slot values copied into every match of this command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<SlotMap>,
    /// Language tag -> ordered reference phrases.
    #[serde(default)]
    pub utterances: HashMap<String, Vec<String>>,
}

impl CommandDefinition {
    pub fn new(intent: &str, action: Option<&str>) -> Self {
        Self {
            intent: intent.to_string(),
            action: action.map(str::to_string),
            slot: None,
            utterances: HashMap::new(),
        }
    }

    /// Builder helper, mostly for tests and the embedded catalog.
    pub fn with_utterances(mut self, language: &str, phrases: &[&str]) -> Self {
        self.utterances.insert(
            language.to_string(),
            phrases.iter().map(|p| p.to_string()).collect(),
        );
        self
    }

    pub fn with_slot(mut self, slot: SlotMap) -> Self {
        self.slot = Some(slot);
        self
    }

    /// Reference phrases for `language`.
    ///
    /// Lookup order: exact tag, primary subtag ("es-MX" -> "es"), then "en".
    /// Returns None when none of these have phrases; such definitions are
    /// skipped by the matcher.
    pub fn utterances_for(&self, language: &str) -> Option<&[String]> {
        language_candidates(language)
            .into_iter()
            .find_map(|tag| self.lookup(&tag))
    }

    /// Exact key first; otherwise the smallest case-insensitive match, so
    /// "EN" and "En" in one catalog resolve the same way on every run.
    fn lookup(&self, tag: &str) -> Option<&[String]> {
        if let Some(phrases) = self.utterances.get(tag).filter(|p| !p.is_empty()) {
            return Some(phrases.as_slice());
        }
        self.utterances
            .iter()
            .filter(|(key, phrases)| key.eq_ignore_ascii_case(tag) && !phrases.is_empty())
            .min_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, phrases)| phrases.as_slice())
    }
}

/// Ordered language tags to try for a requested language.
pub fn language_candidates(language: &str) -> Vec<String> {
    let requested = language.trim().to_ascii_lowercase();
    let mut tags = Vec::with_capacity(3);

    if !requested.is_empty() {
        tags.push(requested.clone());
        if let Some((primary, _region)) = requested.split_once(['-', '_']) {
            if !primary.is_empty() {
                tags.push(primary.to_string());
            }
        }
    }
    if !tags.iter().any(|t| t == DEFAULT_LANGUAGE) {
        tags.push(DEFAULT_LANGUAGE.to_string());
    }
    tags
}
