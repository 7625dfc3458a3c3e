//! Language-keyed regex table for numeric commands ("forward 30 seconds",
//! "2x speed"). Adding a language or phrasing is a data change: append a row
//! to `PATTERN_SOURCES`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};
use std::collections::HashMap;

use crate::catalog::language_candidates;

/// Number with optional decimal part; comma decimals are accepted ("1,5").
const NUM: &str = r"(\d+(?:[.,]\d+)?)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    SeekForward,
    SeekRewind,
    SetSpeed,
}

impl PatternKind {
    pub fn intent(self) -> &'static str {
        match self {
            PatternKind::SeekForward | PatternKind::SeekRewind => "seek_control",
            PatternKind::SetSpeed => "speed_control",
        }
    }

    pub fn action(self) -> &'static str {
        match self {
            PatternKind::SeekForward => "forward",
            PatternKind::SeekRewind => "rewind",
            PatternKind::SetSpeed => "set",
        }
    }

    /// A zero seek is a valid (if pointless) request; a zero speed is not.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            PatternKind::SetSpeed => value.as_f64().map_or(false, |v| v > 0.0),
            PatternKind::SeekForward | PatternKind::SeekRewind => true,
        }
    }

    pub fn slot_key(self) -> &'static str {
        match self {
            PatternKind::SeekForward | PatternKind::SeekRewind => "seconds",
            PatternKind::SetSpeed => "speed",
        }
    }
}

/// (language, pattern, kind). `{n}` is replaced by the number capture.
/// Within a language, rows are tried top to bottom.
const PATTERN_SOURCES: &[(&str, &str, PatternKind)] = &[
    // English
    ("en", r"\b(?:forward|ahead)\s+(?:by\s+)?{n}(?:\s*(?:seconds?|secs?|s)\b)?", PatternKind::SeekForward),
    ("en", r"\bskip\s+{n}\s*(?:seconds?|secs?|s)\b", PatternKind::SeekForward),
    ("en", r"\b(?:rewind|back|backwards?)\s+(?:by\s+)?{n}(?:\s*(?:seconds?|secs?|s)\b)?", PatternKind::SeekRewind),
    ("en", r"\b{n}\s*x\b", PatternKind::SetSpeed),
    ("en", r"\bspeed\s+(?:to\s+)?{n}\b", PatternKind::SetSpeed),
    // Spanish
    ("es", r"\b(?:adelanta|adelantar|avanza|avanzar)\s+{n}(?:\s*(?:segundos?|seg|s)\b)?", PatternKind::SeekForward),
    ("es", r"\b(?:retrocede|retroceder|atrasa|atrasar|rebobina|rebobinar)\s+{n}(?:\s*(?:segundos?|seg|s)\b)?", PatternKind::SeekRewind),
    ("es", r"\b{n}\s*x\b", PatternKind::SetSpeed),
    ("es", r"\bvelocidad\s+(?:a\s+)?{n}\b", PatternKind::SetSpeed),
    // French
    ("fr", r"\b(?:avance|avancer|avancez)\s+(?:de\s+)?{n}(?:\s*(?:secondes?|s)\b)?", PatternKind::SeekForward),
    ("fr", r"\b(?:recule|reculer|reculez|retour)\s+(?:de\s+)?{n}(?:\s*(?:secondes?|s)\b)?", PatternKind::SeekRewind),
    ("fr", r"\b{n}\s*x\b", PatternKind::SetSpeed),
    ("fr", r"\bvitesse\s+(?:à\s+)?{n}\b", PatternKind::SetSpeed),
    // German
    ("de", r"\b(?:vorspulen|vor)\s+(?:um\s+)?{n}(?:\s*(?:sekunden|sek|s)\b)?", PatternKind::SeekForward),
    ("de", r"\b{n}\s*(?:sekunden|sek)\s+(?:vor|vorspulen)\b", PatternKind::SeekForward),
    ("de", r"\b(?:zurückspulen|zurück)\s+(?:um\s+)?{n}(?:\s*(?:sekunden|sek|s)\b)?", PatternKind::SeekRewind),
    ("de", r"\b{n}\s*(?:sekunden|sek)\s+(?:zurück|zurückspulen)\b", PatternKind::SeekRewind),
    ("de", r"\b{n}\s*x\b", PatternKind::SetSpeed),
    ("de", r"\bgeschwindigkeit\s+(?:auf\s+)?{n}\b", PatternKind::SetSpeed),
];

#[derive(Debug)]
pub struct CommandPattern {
    pub regex: Regex,
    pub kind: PatternKind,
}

/// A pattern hit with its parsed numeric slot value.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatch {
    pub kind: PatternKind,
    pub value: Value,
}

static PATTERN_TABLE: Lazy<HashMap<&'static str, Vec<CommandPattern>>> = Lazy::new(|| {
    let mut table: HashMap<&'static str, Vec<CommandPattern>> = HashMap::new();
    for (language, source, kind) in PATTERN_SOURCES {
        let regex = Regex::new(&source.replace("{n}", NUM)).expect("static command pattern");
        table.entry(*language).or_default().push(CommandPattern { regex, kind: *kind });
    }
    table
});

/// Ordered patterns for `language`, falling back to the default language.
pub fn patterns_for(language: &str) -> &'static [CommandPattern] {
    language_candidates(language)
        .iter()
        .find_map(|tag| PATTERN_TABLE.get(tag.as_str()))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Run the table against already-normalized text. First hit wins.
pub fn extract(normalized: &str, language: &str) -> Option<PatternMatch> {
    for pattern in patterns_for(language) {
        let Some(caps) = pattern.regex.captures(normalized) else {
            continue;
        };
        // A capture that is not a usable number falls through to the next row
        let value = caps
            .get(1)
            .and_then(|m| number_value(m.as_str()))
            .filter(|v| pattern.kind.accepts(v));
        if let Some(value) = value {
            return Some(PatternMatch {
                kind: pattern.kind,
                value,
            });
        }
    }
    None
}

/// Integral numbers become JSON integers, the rest JSON floats.
/// Negative and non-finite values are rejected.
pub fn number_value(raw: &str) -> Option<Value> {
    let raw = raw.replace(',', ".");
    if let Ok(int) = raw.parse::<u64>() {
        return Some(Value::Number(int.into()));
    }
    let float = raw.parse::<f64>().ok().filter(|f| f.is_finite() && *f >= 0.0)?;
    if float.fract() == 0.0 && float <= u64::MAX as f64 {
        return Some(Value::Number((float as u64).into()));
    }
    Number::from_f64(float).map(Value::Number)
}
