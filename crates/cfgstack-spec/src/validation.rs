//! Validators attached to settings.
//!
//! A validator receives the value after type checking and may reject it or
//! return a transformed value. Validators run in declaration order, each
//! seeing the previous one's output.

use crate::{ConfigError, ValidationError, ValueKind};
use regex::Regex;
use serde_json::Value;

/// Information about the setting being validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationContext {
    field: String,
}

impl ValidationContext {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Dotted path of the setting, `<?>` for an unnamed one.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Build an [`ValidationError::Invalid`] for this setting.
    pub fn invalid(&self, message: impl Into<String>) -> ValidationError {
        ValidationError::Invalid {
            field: self.field.clone(),
            message: message.into(),
        }
    }
}

/// A single validation rule.
pub trait Validator: Send + Sync {
    fn validate(&self, ctx: &ValidationContext, value: Value) -> Result<Value, ValidationError>;
}

impl<F> Validator for F
where
    F: Fn(&ValidationContext, Value) -> Result<Value, ValidationError> + Send + Sync,
{
    fn validate(&self, ctx: &ValidationContext, value: Value) -> Result<Value, ValidationError> {
        self(ctx, value)
    }
}

/// Accept only values of the listed kinds.
pub fn value_type(kinds: impl IntoIterator<Item = ValueKind>) -> impl Validator {
    let kinds: Vec<ValueKind> = kinds.into_iter().collect();
    move |ctx: &ValidationContext, value: Value| {
        let found = ValueKind::of(&value);
        if kinds.contains(&found) {
            return Ok(value);
        }
        let expected = match kinds.as_slice() {
            [kind] => kind.to_string(),
            _ => {
                let names: Vec<&str> = kinds.iter().map(|kind| kind.name()).collect();
                format!("one of: {}", names.join(", "))
            }
        };
        Err(ValidationError::WrongType {
            field: ctx.field().to_string(),
            expected,
            found,
        })
    }
}

/// Accept only values equal to one of the options.
pub fn one_of(options: impl IntoIterator<Item = Value>) -> impl Validator {
    let options: Vec<Value> = options.into_iter().collect();
    move |ctx: &ValidationContext, value: Value| {
        if options.contains(&value) {
            return Ok(value);
        }
        let rendered: Vec<String> = options.iter().map(Value::to_string).collect();
        Err(ValidationError::NotOneOf {
            field: ctx.field().to_string(),
            options: rendered.join(", "),
        })
    }
}

/// Accept numbers within `[min, max]`.
pub fn between(min: impl Into<f64>, max: impl Into<f64>) -> impl Validator {
    number_bounds(Some(min.into()), Some(max.into()))
}

/// Accept numbers greater than or equal to `min`.
pub fn at_least(min: impl Into<f64>) -> impl Validator {
    number_bounds(Some(min.into()), None)
}

/// Accept numbers less than or equal to `max`.
pub fn at_most(max: impl Into<f64>) -> impl Validator {
    number_bounds(None, Some(max.into()))
}

fn number_bounds(min: Option<f64>, max: Option<f64>) -> impl Validator {
    move |ctx: &ValidationContext, value: Value| {
        let Some(number) = value.as_f64() else {
            return Err(ValidationError::WrongType {
                field: ctx.field().to_string(),
                expected: "a number".to_string(),
                found: ValueKind::of(&value),
            });
        };
        if let Some(min) = min.filter(|min| number < *min) {
            return Err(ctx.invalid(format!("{number} is less than {min}")));
        }
        if let Some(max) = max.filter(|max| number > *max) {
            return Err(ctx.invalid(format!("{number} is greater than {max}")));
        }
        Ok(value)
    }
}

/// Reject empty strings, lists and maps.
pub fn non_empty() -> impl Validator {
    |ctx: &ValidationContext, value: Value| {
        let empty = match &value {
            Value::String(text) => text.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
            _ => false,
        };
        if empty {
            Err(ValidationError::Empty {
                field: ctx.field().to_string(),
            })
        } else {
            Ok(value)
        }
    }
}

/// Accept strings matching a regular expression.
pub fn pattern(regex: &str) -> Result<impl Validator, ConfigError> {
    let compiled = Regex::new(regex)
        .map_err(|err| ConfigError::InvalidSpec(format!("invalid pattern {regex:?}: {err}")))?;
    Ok(move |ctx: &ValidationContext, value: Value| {
        let matched = match value.as_str() {
            Some(text) => compiled.is_match(text),
            None => {
                return Err(ValidationError::WrongType {
                    field: ctx.field().to_string(),
                    expected: ValueKind::String.to_string(),
                    found: ValueKind::of(&value),
                });
            }
        };
        if matched {
            Ok(value)
        } else {
            Err(ctx.invalid(format!(
                "{value} does not match pattern {}",
                compiled.as_str()
            )))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ctx() -> ValidationContext {
        ValidationContext::new("a")
    }

    #[test]
    fn value_type_single_kind() {
        let validator = value_type([ValueKind::String]);
        assert_eq!(validator.validate(&ctx(), json!("s")).expect("ok"), json!("s"));
        let err = validator.validate(&ctx(), json!(1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "a value for setting a must be string, found int"
        );
    }

    #[test]
    fn value_type_multiple_kinds() {
        let validator = value_type([ValueKind::String, ValueKind::Int]);
        assert!(validator.validate(&ctx(), json!("string")).is_ok());
        assert!(validator.validate(&ctx(), json!(42)).is_ok());
        let err = validator.validate(&ctx(), json!(42.0)).unwrap_err();
        assert!(err.to_string().contains("one of: string, int"));
    }

    #[test]
    fn one_of_checks_membership() {
        let validator = one_of([json!(1), json!("hello")]);
        assert!(validator.validate(&ctx(), json!("hello")).is_ok());
        assert!(validator.validate(&ctx(), json!(1)).is_ok());
        assert!(validator.validate(&ctx(), json!("string")).is_err());
        assert!(validator.validate(&ctx(), json!(2)).is_err());
    }

    #[test]
    fn bounds_on_numbers() {
        let validator = between(1, 10);
        assert!(validator.validate(&ctx(), json!(1)).is_ok());
        assert!(validator.validate(&ctx(), json!(10.0)).is_ok());
        assert!(validator.validate(&ctx(), json!(0)).is_err());
        assert!(at_least(5).validate(&ctx(), json!(4)).is_err());
        assert!(at_most(5).validate(&ctx(), json!(4)).is_ok());
        assert!(matches!(
            between(1, 2).validate(&ctx(), json!("1")),
            Err(ValidationError::WrongType { .. })
        ));
    }

    #[test]
    fn non_empty_rejects_empty_collections() {
        let validator = non_empty();
        assert!(validator.validate(&ctx(), json!("")).is_err());
        assert!(validator.validate(&ctx(), json!([])).is_err());
        assert!(validator.validate(&ctx(), json!({})).is_err());
        assert!(validator.validate(&ctx(), json!(0)).is_ok());
    }

    #[test]
    fn pattern_matches_strings() {
        let validator = pattern(r"^[a-z]+$").expect("regex");
        assert!(validator.validate(&ctx(), json!("abc")).is_ok());
        assert!(validator.validate(&ctx(), json!("ABC")).is_err());
        assert!(pattern("(").is_err());
    }

    #[test]
    fn closures_are_validators() {
        let double = |_: &ValidationContext, value: Value| {
            Ok::<_, ValidationError>(json!(value.as_i64().unwrap_or_default() * 2))
        };
        assert_eq!(double.validate(&ctx(), json!(21)).expect("ok"), json!(42));
    }
}
