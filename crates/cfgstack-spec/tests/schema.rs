//! Typed declarations through `config_schema!`.

use cfgstack_source::{Config, EnvConfig};
use cfgstack_spec::validation::{between, one_of};
use cfgstack_spec::{
    ConfigError, ConfigSchema, GlobalConfig, MissingAction, Setting, ValidationError,
    config_schema,
};
use cfgstack_test_utils::layer;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::json;

config_schema! {
    /// Settings of the example tool.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ToolConfig {
        pub message: String as "MESSAGE" = Setting::string().default("Hello!"),
        pub config_file: Option<String> as "CONFIG_FILE" = Setting::string().default(json!(null)),
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Database {
    pub host: String,
    pub port: u16,
}

config_schema! {
    #[derive(Debug, Clone, PartialEq, Deserialize)]
    pub struct DatabaseSchema {
        pub host: String = Setting::string(),
        pub port: u16 = Setting::int().default(5432).validator(between(1, 65535)),
    }
}

config_schema! {
    #[derive(Debug)]
    struct ServiceConfig {
        level: String = Setting::string()
            .default("info")
            .validator(one_of([json!("debug"), json!("info"), json!("warn")])),
        database: Database = Setting::dict().schema::<DatabaseSchema>()?,
        tags: Vec<String> = Setting::list().item(Setting::string()).default(json!([])),
        timeout: Option<f64> = Setting::float().on_missing(MissingAction::Leave),
    }
    allow_extra = true;
}

#[test]
fn defaults_fill_the_struct() {
    let config = ToolConfig::load([layer(json!({}))]).expect("load");
    assert_eq!(
        config,
        ToolConfig {
            message: "Hello!".to_string(),
            config_file: None,
        }
    );
    assert!(!ToolConfig::ALLOW_EXTRA);
}

#[test]
fn explicit_keys_name_the_settings() {
    let spec = ToolConfig::spec().expect("spec");
    assert_eq!(
        spec.names().collect::<Vec<_>>(),
        vec!["MESSAGE", "CONFIG_FILE"]
    );

    let config = ToolConfig::load([
        layer(json!({ "MESSAGE": "low" })),
        layer(json!({ "MESSAGE": "high", "CONFIG_FILE": "tool.yaml" })),
    ])
    .expect("load");
    assert_eq!(config.message, "high");
    assert_eq!(config.config_file.as_deref(), Some("tool.yaml"));
}

#[test]
fn unexpected_keys_fail_closed_schemas() {
    let err = ToolConfig::load([layer(json!({ "OTHER": 1 }))]).unwrap_err();
    assert_eq!(err.to_string(), "unexpected fields in the config: OTHER");
}

#[test]
fn nested_schema_and_lists() {
    let config = ServiceConfig::load([layer(json!({
        "database": { "host": "db.local" },
        "tags": ["a", "b"],
        "unrelated": true,
    }))])
    .expect("load");
    assert!(ServiceConfig::ALLOW_EXTRA);
    assert_eq!(config.level, "info");
    assert_eq!(
        config.database,
        Database {
            host: "db.local".to_string(),
            port: 5432,
        }
    );
    assert_eq!(config.tags, vec!["a", "b"]);
    assert_eq!(config.timeout, None);
}

#[test]
fn nested_errors_use_dotted_paths() {
    let err = ServiceConfig::load([layer(json!({ "database": { "host": "h", "port": 0 } }))])
        .unwrap_err();
    assert_eq!(
        err.as_validation().and_then(ValidationError::field),
        Some("database.port")
    );

    let err = ServiceConfig::load([layer(json!({ "database": {}, "level": "loud" }))]).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Validation(ValidationError::NotOneOf { .. })
    ));
}

#[test]
fn layered_keeps_sources_for_later_reads() {
    temp_env::with_var("CFGSTACK_SCHEMA_MESSAGE", Some("from env"), || {
        let layered = ToolConfig::layered([
            EnvConfig::with_prefix("CFGSTACK_SCHEMA_").preserve_case().boxed(),
        ])
        .expect("layered");
        assert_eq!(layered.name(), "ToolConfig");
        assert_eq!(layered.require("MESSAGE").expect("message"), json!("from env"));
        let config: ToolConfig = layered.extract().expect("extract");
        assert_eq!(config.message, "from env");
    });
}

#[test]
fn validated_values_deserialize_into_plain_structs() {
    let layered = DatabaseSchema::layered([layer(json!({ "host": "h" }))]).expect("layered");
    let database: Database = layered.deserialize().expect("deserialize");
    assert_eq!(database.port, 5432);
}

#[test]
fn global_slot_loads_once() {
    static TOOL: GlobalConfig<ToolConfig> = GlobalConfig::new();

    let config = TOOL
        .get_or_load(|| vec![layer(json!({ "MESSAGE": "first" }))])
        .expect("load");
    assert_eq!(config.message, "first");
    let config = TOOL
        .get_or_load(|| vec![layer(json!({ "MESSAGE": "second" }))])
        .expect("cached");
    assert_eq!(config.message, "first");
}
