use serde::{Deserialize, Serialize};

use crate::catalog::SlotMap;

/// Confidence assigned to every pattern-extracted command.
pub const PATTERN_CONFIDENCE: f32 = 0.9;

/// Which stage of the matcher produced a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStage {
    Exact,
    Pattern,
    Fuzzy,
}

/// A recognized command. Created per utterance, owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedCommand {
    pub intent: String,
    pub action: Option<String>,
    pub slot: Option<SlotMap>,
    /// 1.0 for exact, 0.9 for pattern, similarity score for fuzzy.
    pub confidence: f32,
    /// Raw utterance as the recognizer produced it.
    pub original_text: String,
    pub stage: MatchStage,
}

impl ParsedCommand {
    /// True when the caller should ask the user before executing.
    pub fn requires_confirmation(&self, threshold: f32) -> bool {
        self.confidence < threshold
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Minimum fuzzy score accepted (stage 3 only).
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
    #[serde(default = "default_true")]
    pub enable_fuzzy_match: bool,
    #[serde(default = "default_true")]
    pub enable_regex_extraction: bool,
}

fn default_confidence_threshold() -> f32 {
    0.6
}

fn default_true() -> bool {
    true
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            enable_fuzzy_match: true,
            enable_regex_extraction: true,
        }
    }
}
