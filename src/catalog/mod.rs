//! Command catalog: the static list of commands the matcher knows about.

pub mod loader;
pub mod types;

pub use loader::{default_catalog, load_catalog, parse_catalog, validate};
pub use types::{language_candidates, CommandDefinition, SlotMap, DEFAULT_LANGUAGE};
