//! Setting descriptors.
//!
//! A [`Setting`] declares one config value: its name, type, default, what to
//! do when the value is absent, null or (for lists) empty, and the
//! validators it must pass. Validation resolves defaults first, then checks
//! and coerces the type, then runs kind-specific processing and finally the
//! validators.

use crate::validation::{ValidationContext, Validator};
use crate::{ConfigError, ConfigSchema, ConfigSpec, ValidationError, ValueKind};
use cfgstack_source::DictConfig;
use serde_json::{Number, Value};
use std::fmt;
use std::sync::Arc;

/// Action taken when a setting is absent, null or empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingAction {
    /// Fail validation.
    Error,
    /// Substitute the declared default; fail if there is none.
    #[default]
    UseDefault,
    /// Keep the value as it is (absent, null or empty).
    Leave,
}

/// Type of a setting and its kind-specific options.
#[derive(Debug, Clone)]
pub enum SettingKind {
    /// Any value; only validators apply.
    Any,
    String,
    Bool,
    Int,
    Float,
    /// A mapping, optionally validated against a nested spec.
    Dict { subspec: Option<Arc<ConfigSpec>> },
    /// A list, optionally validating each item against a nested setting.
    List {
        on_empty: MissingAction,
        item: Option<Box<Setting>>,
    },
}

impl SettingKind {
    fn expected(&self) -> ValueKind {
        match self {
            Self::Any => ValueKind::Null,
            Self::String => ValueKind::String,
            Self::Bool => ValueKind::Bool,
            Self::Int => ValueKind::Int,
            Self::Float => ValueKind::Float,
            Self::Dict { .. } => ValueKind::Map,
            Self::List { .. } => ValueKind::List,
        }
    }
}

/// Specification for one config setting.
#[derive(Clone)]
pub struct Setting {
    name: Option<String>,
    kind: SettingKind,
    default: Option<Value>,
    on_missing: MissingAction,
    on_null: MissingAction,
    validators: Vec<Arc<dyn Validator>>,
    coerce: bool,
    description: Option<String>,
}

impl Setting {
    fn with_kind(kind: SettingKind) -> Self {
        Self {
            name: None,
            kind,
            default: None,
            on_missing: MissingAction::UseDefault,
            on_null: MissingAction::Leave,
            validators: Vec::new(),
            coerce: true,
            description: None,
        }
    }

    /// A setting accepting any value.
    pub fn any() -> Self {
        Self::with_kind(SettingKind::Any)
    }

    pub fn string() -> Self {
        Self::with_kind(SettingKind::String)
    }

    pub fn bool() -> Self {
        Self::with_kind(SettingKind::Bool)
    }

    pub fn int() -> Self {
        Self::with_kind(SettingKind::Int)
    }

    pub fn float() -> Self {
        Self::with_kind(SettingKind::Float)
    }

    pub fn dict() -> Self {
        Self::with_kind(SettingKind::Dict { subspec: None })
    }

    pub fn list() -> Self {
        Self::with_kind(SettingKind::List {
            on_empty: MissingAction::Leave,
            item: None,
        })
    }

    /// Set the name. Settings declared through a schema are named after
    /// their field instead.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Bind the setting to `name`, refusing to rename an already named one.
    pub fn bind_name(mut self, name: &str) -> Result<Self, ConfigError> {
        match &self.name {
            Some(existing) if existing != name => Err(ConfigError::InvalidSpec(format!(
                "setting name already set to {existing}, cannot bind it to {name}"
            ))),
            _ => {
                self.name = Some(name.to_string());
                Ok(self)
            }
        }
    }

    /// Default used for absent (and, if configured, null or empty) values.
    ///
    /// `Value::Null` is a real default, distinct from having none.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn on_missing(mut self, action: MissingAction) -> Self {
        self.on_missing = action;
        self
    }

    pub fn on_null(mut self, action: MissingAction) -> Self {
        self.on_null = action;
        self
    }

    /// Action for an empty list. Ignored by other kinds.
    pub fn on_empty(mut self, action: MissingAction) -> Self {
        if let SettingKind::List { on_empty, .. } = &mut self.kind {
            *on_empty = action;
        }
        self
    }

    /// Validate every list item against `item`. Ignored by other kinds.
    pub fn item(mut self, item: Setting) -> Self {
        if let SettingKind::List { item: slot, .. } = &mut self.kind {
            *slot = Some(Box::new(item));
        }
        self
    }

    /// Validate a mapping against a nested spec. Ignored by other kinds.
    pub fn subspec(mut self, spec: Arc<ConfigSpec>) -> Self {
        if let SettingKind::Dict { subspec } = &mut self.kind {
            *subspec = Some(spec);
        }
        self
    }

    /// Validate a mapping against a declared schema type.
    pub fn schema<S: ConfigSchema>(self) -> Result<Self, ConfigError> {
        Ok(self.subspec(S::spec()?))
    }

    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Disable conversion of strings into the declared type.
    pub fn strict(mut self) -> Self {
        self.coerce = false;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> &SettingKind {
        &self.kind
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_strict(&self) -> bool {
        !self.coerce
    }

    /// Validate a value, `None` meaning the value is absent.
    ///
    /// Returns `None` only when an absent value is left absent.
    pub fn validate_value(&self, value: Option<Value>) -> Result<Option<Value>, ValidationError> {
        self.validate_at(value, self.name.as_deref().unwrap_or("<?>"))
    }

    /// Validate a value reported under the dotted path `field`.
    pub(crate) fn validate_at(
        &self,
        value: Option<Value>,
        field: &str,
    ) -> Result<Option<Value>, ValidationError> {
        let value = match value {
            None => {
                return match self.on_missing {
                    MissingAction::Error => Err(ValidationError::Missing {
                        field: field.to_string(),
                    }),
                    MissingAction::UseDefault => {
                        self.default.clone().map(Some).ok_or_else(|| {
                            ValidationError::MissingNoDefault {
                                field: field.to_string(),
                            }
                        })
                    }
                    MissingAction::Leave => Ok(None),
                };
            }
            Some(Value::Null) => {
                return match self.on_null {
                    MissingAction::Error => Err(ValidationError::Null {
                        field: field.to_string(),
                    }),
                    MissingAction::UseDefault => {
                        self.default.clone().map(Some).ok_or_else(|| {
                            ValidationError::NullNoDefault {
                                field: field.to_string(),
                            }
                        })
                    }
                    MissingAction::Leave => Ok(Some(Value::Null)),
                };
            }
            Some(value) => value,
        };

        let value = self.check_kind(value, field)?;
        let ctx = ValidationContext::new(field);
        let mut value = value;
        for validator in &self.validators {
            value = validator.validate(&ctx, value)?;
        }
        Ok(Some(value))
    }

    fn check_kind(&self, value: Value, field: &str) -> Result<Value, ValidationError> {
        match &self.kind {
            SettingKind::Any => Ok(value),
            SettingKind::String => match value {
                Value::String(_) => Ok(value),
                other => Err(self.wrong_type(field, &other)),
            },
            SettingKind::Bool => match value {
                Value::Bool(_) => Ok(value),
                Value::String(raw) if self.coerce => {
                    parse_bool(&raw)
                        .map(Value::Bool)
                        .ok_or_else(|| self.coercion_error(field, raw))
                }
                other => Err(self.wrong_type(field, &other)),
            },
            SettingKind::Int => match value {
                Value::Number(ref number) if number.is_i64() || number.is_u64() => Ok(value),
                Value::Number(ref number) if self.coerce => number
                    .as_f64()
                    .and_then(integral_value)
                    .ok_or_else(|| self.wrong_type(field, &value)),
                Value::String(raw) if self.coerce => {
                    parse_int(&raw).ok_or_else(|| self.coercion_error(field, raw))
                }
                other => Err(self.wrong_type(field, &other)),
            },
            SettingKind::Float => match value {
                Value::Number(ref number) if number.is_f64() => Ok(value),
                Value::Number(ref number) if self.coerce => number
                    .as_f64()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| self.wrong_type(field, &value)),
                Value::String(raw) if self.coerce => raw
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| self.coercion_error(field, raw)),
                other => Err(self.wrong_type(field, &other)),
            },
            SettingKind::Dict { subspec } => {
                let map = match value {
                    Value::Object(map) => map,
                    Value::String(raw) if self.coerce => match serde_json::from_str(&raw) {
                        Ok(Value::Object(map)) => map,
                        _ => return Err(self.coercion_error(field, raw)),
                    },
                    other => return Err(self.wrong_type(field, &other)),
                };
                match subspec {
                    Some(spec) => {
                        let nested = DictConfig::new(map);
                        Ok(Value::Object(spec.validate_at(&nested, Some(field))?))
                    }
                    None => Ok(Value::Object(map)),
                }
            }
            SettingKind::List { on_empty, item } => {
                let items = match value {
                    Value::Array(items) => items,
                    Value::String(raw) if self.coerce => match serde_json::from_str(&raw) {
                        Ok(Value::Array(items)) => items,
                        _ => return Err(self.coercion_error(field, raw)),
                    },
                    other => return Err(self.wrong_type(field, &other)),
                };
                if items.is_empty() {
                    match on_empty {
                        MissingAction::Error => {
                            return Err(ValidationError::Empty {
                                field: field.to_string(),
                            });
                        }
                        MissingAction::UseDefault => {
                            return self.default.clone().ok_or_else(|| {
                                ValidationError::EmptyNoDefault {
                                    field: field.to_string(),
                                }
                            });
                        }
                        MissingAction::Leave => return Ok(Value::Array(items)),
                    }
                }
                let Some(item) = item else {
                    return Ok(Value::Array(items));
                };
                let mut validated = Vec::with_capacity(items.len());
                for (index, entry) in items.into_iter().enumerate() {
                    let path = format!("{field}[{index}]");
                    validated.push(item.validate_at(Some(entry), &path)?.unwrap_or(Value::Null));
                }
                Ok(Value::Array(validated))
            }
        }
    }

    fn wrong_type(&self, field: &str, value: &Value) -> ValidationError {
        ValidationError::WrongType {
            field: field.to_string(),
            expected: self.kind.expected().to_string(),
            found: ValueKind::of(value),
        }
    }

    fn coercion_error(&self, field: &str, raw: String) -> ValidationError {
        ValidationError::Coercion {
            field: field.to_string(),
            raw,
            expected: self.kind.expected(),
        }
    }
}

impl fmt::Debug for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setting")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("on_missing", &self.on_missing)
            .field("on_null", &self.on_null)
            .field("validators", &self.validators.len())
            .field("coerce", &self.coerce)
            .finish()
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_int(raw: &str) -> Option<Value> {
    let raw = raw.trim();
    raw.parse::<i64>()
        .map(Value::from)
        .or_else(|_| raw.parse::<u64>().map(Value::from))
        .ok()
}

/// Whole floats within `i64` range convert to integers.
fn integral_value(number: f64) -> Option<Value> {
    let in_range = number >= i64::MIN as f64 && number < i64::MAX as f64;
    (number.fract() == 0.0 && in_range).then(|| Value::from(number as i64))
}
