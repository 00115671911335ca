//! Tests for the command-line argument source.

use cfgstack_source::{ArgsConfig, ArgsProjection, Config};
use clap::{Arg, ArgAction, Command};
use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};

fn command() -> Command {
    Command::new("tool")
        .arg(Arg::new("message").long("message").default_value("Hello!"))
        .arg(Arg::new("config_file").long("config-file"))
        .arg(Arg::new("verbose").long("verbose").action(ArgAction::SetTrue))
        .arg(
            Arg::new("tag")
                .long("tag")
                .action(ArgAction::Append),
        )
        .arg(Arg::new("point").long("point").num_args(2))
}

/// Uppercase projection exposes only lowercase ids, and only in uppercase.
#[test]
fn uppercase_projection_filters_keys() {
    let mut values = Map::new();
    values.insert("key1".to_string(), json!("testval"));
    values.insert("KEYUPPER".to_string(), json!(1));
    let cfg = ArgsConfig::new(values, ArgsProjection::new().uppercase());

    assert_eq!(cfg.get("missingkey"), None);
    assert_eq!(cfg.get("KEYUPPER"), None);
    assert_eq!(cfg.get("key1"), None);
    assert_eq!(cfg.get("KEY1"), Some(json!("testval")));
    assert_eq!(cfg.keys(), vec!["KEY1"]);
}

/// Relevant keys limit what the config exposes.
#[test]
fn relevant_keys_restrict_visibility() {
    let mut values = Map::new();
    values.insert("message".to_string(), json!("hi"));
    values.insert("debug".to_string(), json!("true"));
    let cfg = ArgsConfig::new(values, ArgsProjection::new().relevant_keys(["message"]));

    assert_eq!(cfg.get("message"), Some(json!("hi")));
    assert_eq!(cfg.get("debug"), None);
    assert_eq!(cfg.keys(), vec!["message"]);
}

/// Defaults filled in by clap are left to lower layers.
#[test]
fn clap_defaults_are_not_collected() {
    let matches = command().get_matches_from(["tool", "--config-file", "cfg.json5"]);
    let cfg = ArgsConfig::from_matches(&command(), &matches, ArgsProjection::new());

    assert_eq!(cfg.get("message"), None);
    assert_eq!(cfg.get("config_file"), Some(json!("cfg.json5")));
    assert_eq!(cfg.get("verbose"), None);
}

/// Flags and repeated values keep their command-line shape.
#[test]
fn flags_and_repeated_values() {
    let matches = command().get_matches_from([
        "tool", "--message", "hey", "--verbose", "--tag", "a", "--tag", "b",
    ]);
    let cfg = ArgsConfig::from_matches(&command(), &matches, ArgsProjection::new().uppercase());

    assert_eq!(cfg.get("MESSAGE"), Some(json!("hey")));
    assert_eq!(cfg.get("VERBOSE"), Some(json!("true")));
    assert_eq!(
        cfg.get("TAG"),
        Some(Value::Array(vec![json!("a"), json!("b")]))
    );
}

/// A repeatable argument given once is still a list.
#[test]
fn single_append_value_is_a_list() {
    let matches = command().get_matches_from(["tool", "--tag", "a", "--message", "hey"]);
    let cfg = ArgsConfig::from_matches(&command(), &matches, ArgsProjection::new());

    assert_eq!(cfg.get("tag"), Some(json!(["a"])));
    assert_eq!(cfg.get("message"), Some(json!("hey")));
}

/// Arguments taking several values per occurrence become lists.
#[test]
fn multi_value_arguments_are_lists() {
    let matches = command().get_matches_from(["tool", "--point", "1", "2"]);
    let cfg = ArgsConfig::from_matches(&command(), &matches, ArgsProjection::new());

    assert_eq!(cfg.get("point"), Some(json!(["1", "2"])));
}

/// Values clap reads from an argument's environment variable count as given.
#[test]
fn env_fallback_values_are_collected() {
    let command = Command::new("tool")
        .arg(
            Arg::new("message")
                .long("message")
                .env("CFGSTACK_ARGS_MESSAGE"),
        )
        .arg(Arg::new("level").long("level").env("CFGSTACK_ARGS_LEVEL"));
    temp_env::with_vars(
        [
            ("CFGSTACK_ARGS_MESSAGE", Some("from env")),
            ("CFGSTACK_ARGS_LEVEL", None),
        ],
        || {
            let matches = command.clone().get_matches_from(["tool"]);
            let cfg = ArgsConfig::from_matches(&command, &matches, ArgsProjection::new());

            assert_eq!(cfg.get("message"), Some(json!("from env")));
            assert_eq!(cfg.get("level"), None);
        },
    );
}
