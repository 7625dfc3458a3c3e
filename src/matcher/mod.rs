pub mod parser;
pub mod patterns;
pub mod similarity;
pub mod types;

pub use parser::CommandParser;
pub use patterns::{PatternKind, PatternMatch};
pub use types::{MatchStage, MatcherConfig, ParsedCommand, PATTERN_CONFIDENCE};
