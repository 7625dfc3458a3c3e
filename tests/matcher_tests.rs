use murmur::catalog::{default_catalog, CommandDefinition, SlotMap};
use murmur::matcher::patterns::number_value;
use murmur::matcher::{CommandParser, MatchStage, MatcherConfig, PATTERN_CONFIDENCE};
use serde_json::json;

fn slot(value: serde_json::Value) -> SlotMap {
    value.as_object().cloned().expect("slot literal must be an object")
}

// Small two-command catalog for fuzzy scoring tests
fn play_pause_parser(config: MatcherConfig) -> CommandParser {
    let commands = vec![
        CommandDefinition::new("playback_control", Some("play")).with_utterances("en", &["play"]),
        CommandDefinition::new("playback_control", Some("pause")).with_utterances("en", &["pause"]),
    ];
    CommandParser::with_config(commands, config)
}

fn without_fuzzy() -> MatcherConfig {
    MatcherConfig {
        enable_fuzzy_match: false,
        ..MatcherConfig::default()
    }
}

fn exact_only() -> MatcherConfig {
    MatcherConfig {
        enable_fuzzy_match: false,
        enable_regex_extraction: false,
        ..MatcherConfig::default()
    }
}

#[test]
fn test_exact_match_soundness_over_default_catalog() {
    let catalog = default_catalog().expect("embedded catalog must load");
    let parser = CommandParser::new(catalog.clone());

    for command in &catalog {
        for (language, phrases) in &command.utterances {
            for phrase in phrases {
                let parsed = parser
                    .parse(phrase, language)
                    .unwrap_or_else(|| panic!("'{}' ({}) must match", phrase, language));
                assert_eq!(parsed.intent, command.intent, "Wrong intent for '{}'", phrase);
                assert_eq!(parsed.action, command.action, "Wrong action for '{}'", phrase);
                assert_eq!(parsed.confidence, 1.0, "Exact match must carry confidence 1.0");
                assert_eq!(parsed.stage, MatchStage::Exact);
            }
        }
    }
}

#[test]
fn test_blank_input_returns_none() {
    let parser = CommandParser::new(default_catalog().unwrap());
    for language in ["en", "es", "fr", "de", "xx"] {
        assert!(parser.parse("", language).is_none(), "Empty text must not match ({})", language);
        assert!(parser.parse("   ", language).is_none(), "Whitespace must not match ({})", language);
        assert!(parser.parse("\t\n", language).is_none());
    }
}

#[test]
fn test_gibberish_without_fuzzy_returns_none() {
    let config = MatcherConfig {
        enable_fuzzy_match: false,
        ..MatcherConfig::default()
    };
    let parser = CommandParser::with_config(default_catalog().unwrap(), config);

    for text in ["xyzzy plugh", "qwerty asdf", "plai", "colorless green ideas"] {
        assert!(parser.parse(text, "en").is_none(), "'{}' must not match", text);
    }
}

#[test]
fn test_exact_match_normalizes_but_keeps_original_text() {
    let parser = CommandParser::new(default_catalog().unwrap());
    let parsed = parser.parse("  PAUSE  ", "en").expect("case and padding are ignored");

    assert_eq!(parsed.action.as_deref(), Some("pause"));
    assert_eq!(parsed.original_text, "  PAUSE  ", "Original text must be untouched");
}

#[test]
fn test_exact_match_copies_slot_template() {
    let parser = CommandParser::new(default_catalog().unwrap());
    let parsed = parser.parse("skip forward", "en").unwrap();

    assert_eq!(parsed.intent, "seek_control");
    assert_eq!(parsed.slot, Some(slot(json!({ "seconds": 10 }))));
}

#[test]
fn test_catalog_order_breaks_ties() {
    let commands = vec![
        CommandDefinition::new("first", None).with_utterances("en", &["go"]),
        CommandDefinition::new("second", None).with_utterances("en", &["go"]),
    ];
    let parser = CommandParser::new(commands);

    assert_eq!(parser.parse("go", "en").unwrap().intent, "first");
    // Same rule for fuzzy: equal scores keep the first definition
    assert_eq!(parser.parse("goo", "en").unwrap().intent, "first");
}

#[test]
fn test_regex_seek_forward() {
    let parser = CommandParser::new(default_catalog().unwrap());
    let parsed = parser.parse("forward 30 seconds", "en").expect("seek pattern must match");

    assert_eq!(parsed.intent, "seek_control");
    assert_eq!(parsed.action.as_deref(), Some("forward"));
    assert_eq!(parsed.slot, Some(slot(json!({ "seconds": 30 }))));
    assert_eq!(parsed.confidence, PATTERN_CONFIDENCE);
    assert_eq!(parsed.stage, MatchStage::Pattern);
}

#[test]
fn test_regex_speed() {
    let parser = CommandParser::new(default_catalog().unwrap());
    let parsed = parser.parse("2x speed", "en").expect("speed pattern must match");

    assert_eq!(parsed.intent, "speed_control");
    assert_eq!(parsed.action.as_deref(), Some("set"));
    assert_eq!(parsed.slot, Some(slot(json!({ "speed": 2 }))));
    assert_eq!(parsed.confidence, 0.9);
}

#[test]
fn test_regex_rewind_and_fractional_speed() {
    let parser = CommandParser::new(default_catalog().unwrap());

    let rewind = parser.parse("Rewind 15 seconds", "en").unwrap();
    assert_eq!(rewind.action.as_deref(), Some("rewind"));
    assert_eq!(rewind.slot, Some(slot(json!({ "seconds": 15 }))));

    let speed = parser.parse("set speed to 1.5", "en").unwrap();
    assert_eq!(speed.slot, Some(slot(json!({ "speed": 1.5 }))));
}

#[test]
fn test_regex_tables_per_language() {
    let parser = CommandParser::new(default_catalog().unwrap());

    let es = parser.parse("adelanta 20 segundos", "es").unwrap();
    assert_eq!(es.action.as_deref(), Some("forward"));
    assert_eq!(es.slot, Some(slot(json!({ "seconds": 20 }))));

    let es_speed = parser.parse("velocidad 1,5", "es").unwrap();
    assert_eq!(es_speed.slot, Some(slot(json!({ "speed": 1.5 }))));

    let fr = parser.parse("recule de 10 secondes", "fr").unwrap();
    assert_eq!(fr.action.as_deref(), Some("rewind"));
    assert_eq!(fr.slot, Some(slot(json!({ "seconds": 10 }))));

    let de = parser.parse("30 sekunden zurück", "de").unwrap();
    assert_eq!(de.action.as_deref(), Some("rewind"));
    assert_eq!(de.slot, Some(slot(json!({ "seconds": 30 }))));
}

#[test]
fn test_regex_falls_back_to_default_language_table() {
    let parser = CommandParser::with_config(default_catalog().unwrap(), MatcherConfig {
        enable_fuzzy_match: false,
        ..MatcherConfig::default()
    });
    let parsed = parser.parse("forward 45", "it").expect("unknown language uses the English table");

    assert_eq!(parsed.slot, Some(slot(json!({ "seconds": 45 }))));
}

#[test]
fn test_regex_stage_can_be_disabled() {
    let parser = CommandParser::with_config(default_catalog().unwrap(), exact_only());
    assert!(parser.parse("forward 30 seconds", "en").is_none());
}

#[test]
fn test_exact_match_runs_before_patterns() {
    let commands = vec![CommandDefinition::new("bookmark", Some("jump"))
        .with_utterances("en", &["forward 30 seconds"])];
    let parser = CommandParser::new(commands);
    let parsed = parser.parse("forward 30 seconds", "en").unwrap();

    assert_eq!(parsed.intent, "bookmark");
    assert_eq!(parsed.stage, MatchStage::Exact);
}

#[test]
fn test_fuzzy_match_scores_below_one() {
    let parser = play_pause_parser(MatcherConfig::default());
    let parsed = parser.parse("pausse", "en").expect("one typo should still match");

    assert_eq!(parsed.action.as_deref(), Some("pause"));
    assert_eq!(parsed.stage, MatchStage::Fuzzy);
    assert!((parsed.confidence - 5.0 / 6.0).abs() < 1e-6, "Expected 5/6, got {}", parsed.confidence);
    assert!(parsed.confidence < 1.0);
}

#[test]
fn test_fuzzy_threshold_is_respected() {
    // "please pause" contains "pause": 5/12 ≈ 0.42, below the default 0.6
    let strict = play_pause_parser(MatcherConfig::default());
    assert!(strict.parse("please pause", "en").is_none());

    let lenient = play_pause_parser(MatcherConfig {
        confidence_threshold: 0.4,
        ..MatcherConfig::default()
    });
    let parsed = lenient.parse("please pause", "en").expect("lower threshold accepts containment");
    assert_eq!(parsed.action.as_deref(), Some("pause"));
    assert!((parsed.confidence - 5.0 / 12.0).abs() < 1e-6);
}

#[test]
fn test_language_fallback_to_english() {
    let commands = vec![CommandDefinition::new("playback_control", Some("play"))
        .with_utterances("en", &["play"])];
    let parser = CommandParser::with_config(commands, exact_only());

    let parsed = parser.parse("play", "de").expect("missing language falls back to en");
    assert_eq!(parsed.confidence, 1.0);

    let parser = CommandParser::new(default_catalog().unwrap());
    let parsed = parser.parse("reproducir", "es-MX").expect("region tag uses primary subtag");
    assert_eq!(parsed.action.as_deref(), Some("play"));
}

#[test]
fn test_definitions_without_language_are_skipped() {
    let commands = vec![CommandDefinition::new("only_french", None).with_utterances("fr", &["lecture"])];
    let parser = CommandParser::new(commands);

    assert!(parser.parse("lecture", "de").is_none(), "No de and no en entry: skipped");
    assert!(parser.parse("lecture", "fr").is_some());
}

#[test]
fn test_update_commands_replaces_snapshot() {
    let parser = CommandParser::new(default_catalog().unwrap());
    assert!(parser.parse("play", "en").is_some());

    let mut copy = parser.get_commands();
    copy.clear();
    assert!(parser.parse("play", "en").is_some(), "get_commands must return a copy");

    parser.update_commands(vec![CommandDefinition::new("karaoke", None).with_utterances("en", &["sing"])]);
    assert_eq!(parser.get_commands().len(), 1);
    assert_eq!(parser.parse("sing", "en").unwrap().intent, "karaoke");
    assert!(parser.parse("play", "en").is_none(), "Old catalog must be gone");
}

#[test]
fn test_requires_confirmation() {
    let parser = play_pause_parser(MatcherConfig::default());
    let exact = parser.parse("pause", "en").unwrap();
    let fuzzy = parser.parse("pausse", "en").unwrap();

    assert!(!exact.requires_confirmation(0.9));
    assert!(fuzzy.requires_confirmation(0.9));
}

#[test]
fn test_number_values() {
    assert_eq!(number_value("30"), Some(json!(30)));
    assert_eq!(number_value("1.0"), Some(json!(1)));
    assert_eq!(number_value("0,75"), Some(json!(0.75)));
    assert_eq!(number_value("0"), Some(json!(0)));
    assert_eq!(number_value("abc"), None);
}

#[test]
fn test_zero_seek_matches_but_zero_speed_falls_through() {
    let parser = CommandParser::with_config(default_catalog().unwrap(), without_fuzzy());

    let seek = parser.parse("forward 0 seconds", "en").expect("zero seek is still a seek");
    assert_eq!(seek.stage, MatchStage::Pattern);
    assert_eq!(seek.slot, Some(slot(json!({ "seconds": 0 }))));

    assert!(parser.parse("speed to 0", "en").is_none(), "Zero speed must not produce a command");
}

#[test]
fn test_update_config_toggles_stages() {
    let parser = play_pause_parser(MatcherConfig::default());
    assert!(parser.parse("pausse", "en").is_some());

    parser.update_config(exact_only());
    assert!(!parser.config().enable_fuzzy_match);
    assert!(parser.parse("pausse", "en").is_none(), "Fuzzy stage must be off after update");
    assert!(parser.parse("pause", "en").is_some(), "Exact stage is always on");
}
