use std::fs;
use std::path::Path;

use murmur::catalog::{default_catalog, load_catalog, parse_catalog, CommandDefinition};
use murmur::errors::{CatalogError, ConfigError};
use murmur::session::ListeningSessionConfig;
use murmur::AppConfig;
use uuid::Uuid;

#[test]
fn test_default_catalog_loads() {
    let catalog = default_catalog().expect("embedded catalog must be valid");

    assert!(!catalog.is_empty());
    assert!(catalog.iter().all(|c| !c.intent.is_empty()));
    assert!(
        catalog.iter().all(|c| c.utterances_for("en").is_some()),
        "Every shipped command needs English phrases"
    );
}

#[test]
fn test_catalog_rejects_empty_intent() {
    let json = r#"[
        { "intent": "playback_control", "action": "play", "utterances": { "en": ["play"] } },
        { "intent": "  ", "utterances": { "en": ["stop"] } }
    ]"#;

    match parse_catalog(json) {
        Err(CatalogError::EmptyIntent { index }) => assert_eq!(index, 1),
        other => panic!("Expected EmptyIntent, got {:?}", other),
    }
}

#[test]
fn test_catalog_rejects_empty_utterance_list() {
    let json = r#"[{ "intent": "help", "utterances": { "en": ["help"], "es": [] } }]"#;

    match parse_catalog(json) {
        Err(CatalogError::EmptyUtterances { intent, language }) => {
            assert_eq!(intent, "help");
            assert_eq!(language, "es");
        }
        other => panic!("Expected EmptyUtterances, got {:?}", other),
    }
}

#[test]
fn test_catalog_rejects_invalid_json() {
    assert!(matches!(parse_catalog("{ not json"), Err(CatalogError::Parse(_))));
    assert!(matches!(parse_catalog(r#"[{ "action": "play" }]"#), Err(CatalogError::Parse(_))));
}

#[test]
fn test_slot_and_action_are_optional() {
    let json = r#"[
        { "intent": "help", "utterances": { "en": ["help"] } },
        { "intent": "seek_control", "action": "forward", "slot": { "seconds": 10 }, "utterances": { "en": ["forward"] } }
    ]"#;
    let catalog = parse_catalog(json).unwrap();

    assert_eq!(catalog[0].action, None);
    assert_eq!(catalog[0].slot, None);
    assert_eq!(catalog[1].slot.as_ref().unwrap()["seconds"], 10);
}

#[test]
fn test_utterances_for_fallback_order() {
    let command = CommandDefinition::new("playback_control", Some("play"))
        .with_utterances("en", &["play"])
        .with_utterances("es", &["reproducir"])
        .with_utterances("es-MX", &["dale play"]);

    assert_eq!(command.utterances_for("es-MX").unwrap(), ["dale play"]);
    assert_eq!(command.utterances_for("ES-mx").unwrap(), ["dale play"], "Tags compare case-insensitively");
    assert_eq!(command.utterances_for("es-AR").unwrap(), ["reproducir"]);
    assert_eq!(command.utterances_for("de").unwrap(), ["play"]);

    let french_only = CommandDefinition::new("help", None).with_utterances("fr", &["aide"]);
    assert!(french_only.utterances_for("de").is_none());
}

#[test]
fn test_load_catalog_missing_file() {
    let path = Path::new("/nonexistent/murmur/commands.json");
    match load_catalog(path) {
        Err(CatalogError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("Expected Io error, got {:?}", other),
    }
}

#[test]
fn test_load_catalog_from_file_preserves_order() {
    let path = std::env::temp_dir().join(format!("murmur-catalog-{}.json", Uuid::new_v4()));
    fs::write(
        &path,
        r#"[
            { "intent": "b", "utterances": { "en": ["bee"] } },
            { "intent": "a", "utterances": { "en": ["ay"] } }
        ]"#,
    )
    .unwrap();

    let catalog = load_catalog(&path);
    fs::remove_file(&path).ok();

    let intents: Vec<String> = catalog.unwrap().into_iter().map(|c| c.intent).collect();
    assert_eq!(intents, ["b", "a"]);
}

#[test]
fn test_empty_config_is_default() {
    let config = AppConfig::from_json("{}").unwrap();
    assert_eq!(config, AppConfig::default());
    assert_eq!(config.language, "en");
    assert_eq!(config.session, ListeningSessionConfig::default());
    assert!(config.load_catalog().is_ok(), "No catalog path uses the embedded catalog");
}

#[test]
fn test_partial_config_keeps_other_defaults() {
    let config = AppConfig::from_json(
        r#"{ "language": "es", "session": { "keep_alive_interval_ms": 2000 }, "matcher": { "enable_fuzzy_match": false } }"#,
    )
    .unwrap();

    assert_eq!(config.language, "es");
    assert_eq!(config.session.keep_alive_interval_ms, 2000);
    assert_eq!(config.session.max_restart_attempts, 5);
    assert!(config.session.auto_restart);
    assert!(!config.matcher.enable_fuzzy_match);
    assert!(config.matcher.enable_regex_extraction);
    assert_eq!(config.matcher.confidence_threshold, 0.6);
}

#[test]
fn test_config_rejects_out_of_range_threshold() {
    let result = AppConfig::from_json(r#"{ "matcher": { "confidence_threshold": 1.5 } }"#);
    assert!(matches!(result, Err(ConfigError::ThresholdOutOfRange(t)) if t == 1.5));

    let result = AppConfig::from_json(r#"{ "confirmation_threshold": -0.1 }"#);
    assert!(matches!(result, Err(ConfigError::ThresholdOutOfRange(_))));
}

#[test]
fn test_config_load_reports_missing_file() {
    let result = AppConfig::load(Path::new("/nonexistent/murmur.json"));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn test_utterances_for_prefers_exact_key_over_case_variants() {
    let command = CommandDefinition::new("playback_control", Some("play"))
        .with_utterances("EN", &["upper"])
        .with_utterances("en", &["lower"])
        .with_utterances("En", &["mixed"]);

    for _ in 0..20 {
        assert_eq!(command.utterances_for("en").unwrap(), ["lower"], "Exact key must win");
    }

    let variants_only = CommandDefinition::new("playback_control", Some("play"))
        .with_utterances("En", &["mixed"])
        .with_utterances("EN", &["upper"]);
    assert_eq!(variants_only.utterances_for("en").unwrap(), ["upper"], "Smallest key wins among variants");
}
