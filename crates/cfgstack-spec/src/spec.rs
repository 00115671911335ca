//! A named set of settings validated together.

use crate::{ConfigError, Setting, ValidationError};
use cfgstack_source::Config;
use log::debug;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// A set of settings specifying some config.
#[derive(Debug, Clone)]
pub struct ConfigSpec {
    settings: Vec<Setting>,
    allow_extra: bool,
}

impl ConfigSpec {
    /// Build a spec from named settings, kept in declaration order.
    pub fn new(
        settings: impl IntoIterator<Item = Setting>,
        allow_extra: bool,
    ) -> Result<Self, ConfigError> {
        let settings: Vec<Setting> = settings.into_iter().collect();
        let mut seen = HashSet::new();
        for setting in &settings {
            let Some(name) = setting.name() else {
                return Err(ConfigError::InvalidSpec(format!(
                    "setting name not set for {setting:?}"
                )));
            };
            if !seen.insert(name) {
                return Err(ConfigError::InvalidSpec(format!(
                    "all settings must have unique names, {name} is repeated"
                )));
            }
        }
        Ok(Self {
            settings,
            allow_extra,
        })
    }

    pub fn settings(&self) -> &[Setting] {
        &self.settings
    }

    pub fn setting(&self, name: &str) -> Option<&Setting> {
        self.settings
            .iter()
            .find(|setting| setting.name() == Some(name))
    }

    /// Setting names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.settings.iter().filter_map(Setting::name)
    }

    /// Whether configs may carry keys outside the spec.
    pub fn allow_extra(&self) -> bool {
        self.allow_extra
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Validate one setting of a config.
    ///
    /// Returns `None` when the setting is absent and left absent.
    pub fn validate_setting(
        &self,
        config: &dyn Config,
        name: &str,
    ) -> Result<Option<Value>, ConfigError> {
        let setting = self
            .setting(name)
            .ok_or_else(|| ConfigError::UnknownSetting(name.to_string()))?;
        Ok(setting.validate_value(config.get(name))?)
    }

    /// Validate every setting of a config, returning the validated values.
    ///
    /// Settings left absent are omitted from the result.
    pub fn validate_config(&self, config: &dyn Config) -> Result<Map<String, Value>, ValidationError> {
        self.validate_at(config, None)
    }

    /// Validate a config nested under `prefix`, which prefixes error paths.
    pub(crate) fn validate_at(
        &self,
        config: &dyn Config,
        prefix: Option<&str>,
    ) -> Result<Map<String, Value>, ValidationError> {
        let path = |name: &str| match prefix {
            Some(prefix) => format!("{prefix}.{name}"),
            None => name.to_string(),
        };

        if !self.allow_extra {
            let known: HashSet<&str> = self.names().collect();
            let mut extra: Vec<String> = config
                .keys()
                .into_iter()
                .filter(|key| !known.contains(key.as_str()))
                .map(|key| path(&key))
                .collect();
            if !extra.is_empty() {
                extra.sort();
                return Err(ValidationError::UnexpectedFields { fields: extra });
            }
        }

        let mut validated = Map::new();
        for setting in &self.settings {
            let Some(name) = setting.name() else {
                continue;
            };
            if let Some(value) = setting.validate_at(config.get(name), &path(name))? {
                validated.insert(name.to_string(), value);
            }
        }
        debug!(
            "validated {} of {} settings (prefix={})",
            validated.len(),
            self.settings.len(),
            prefix.unwrap_or("<root>")
        );
        Ok(validated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::value_type;
    use crate::{MissingAction, ValueKind};
    use cfgstack_source::DictConfig;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn dict(value: Value) -> DictConfig {
        DictConfig::from_value(value).expect("object")
    }

    #[test]
    fn settings_must_be_named_and_unique() {
        assert!(matches!(
            ConfigSpec::new([Setting::int()], false),
            Err(ConfigError::InvalidSpec(_))
        ));
        assert!(matches!(
            ConfigSpec::new([Setting::int().named("a"), Setting::string().named("a")], false),
            Err(ConfigError::InvalidSpec(_))
        ));
    }

    #[test]
    fn validate_setting_rejects_unknown_names() {
        let spec = ConfigSpec::new([Setting::int().named("a")], false).expect("spec");
        let err = spec.validate_setting(&dict(json!({})), "b").unwrap_err();
        assert_eq!(err.to_string(), "unknown setting, not in config spec: b");
    }

    #[test]
    fn value_type_on_any_setting() {
        let spec = ConfigSpec::new(
            [Setting::any()
                .named("a")
                .validator(value_type([ValueKind::String, ValueKind::Int]))],
            false,
        )
        .expect("spec");
        assert!(spec.validate_config(&dict(json!({ "a": "string" }))).is_ok());
        assert!(spec.validate_config(&dict(json!({ "a": 42 }))).is_ok());
        assert!(spec.validate_config(&dict(json!({ "a": 42.0 }))).is_err());
    }

    #[test]
    fn extra_fields_are_reported_sorted() {
        let spec = ConfigSpec::new([Setting::int().named("a")], false).expect("spec");
        let err = spec
            .validate_config(&dict(json!({ "a": 1, "z": 2, "b": 3 })))
            .unwrap_err();
        assert_eq!(err.to_string(), "unexpected fields in the config: b,z");

        let open = ConfigSpec::new([Setting::int().named("a")], true).expect("spec");
        let validated = open
            .validate_config(&dict(json!({ "a": 1, "z": 2 })))
            .expect("extra allowed");
        assert_eq!(Value::Object(validated), json!({ "a": 1 }));
    }

    #[test]
    fn left_settings_are_omitted() {
        let spec = ConfigSpec::new(
            [
                Setting::int().named("a").on_missing(MissingAction::Leave),
                Setting::string().named("b").default("x"),
            ],
            false,
        )
        .expect("spec");
        let validated = spec.validate_config(&dict(json!({}))).expect("valid");
        assert_eq!(Value::Object(validated), json!({ "b": "x" }));
    }

    #[test]
    fn nested_spec_errors_carry_dotted_paths() {
        let inner = Arc::new(ConfigSpec::new([Setting::int().named("port")], false).expect("spec"));
        let spec =
            ConfigSpec::new([Setting::dict().named("server").subspec(inner)], false).expect("spec");

        let err = spec
            .validate_config(&dict(json!({ "server": { "port": "x" } })))
            .unwrap_err();
        assert_eq!(err.field(), Some("server.port"));

        let err = spec
            .validate_config(&dict(json!({ "server": { "port": 1, "host": "h" } })))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnexpectedFields {
                fields: vec!["server.host".to_string()]
            }
        );
    }

    #[test]
    fn names_keep_declaration_order() {
        let spec = ConfigSpec::new(
            [Setting::int().named("b"), Setting::int().named("a")],
            false,
        )
        .expect("spec");
        assert_eq!(spec.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(spec.len(), 2);
        assert!(spec.setting("a").is_some());
    }
}
