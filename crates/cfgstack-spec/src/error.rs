//! Error types for setting validation and spec handling.

use crate::ValueKind;
use cfgstack_source::SourceError;
use thiserror::Error;

/// A setting value does not satisfy its declaration.
///
/// Every variant names the dotted path of the offending setting, e.g.
/// `database.port` or `hosts[2]`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("config field {field} missing")]
    Missing { field: String },
    #[error("config field {field} missing and no default is provided")]
    MissingNoDefault { field: String },
    #[error("config field {field} must not be null")]
    Null { field: String },
    #[error("config field {field} is null and no default is provided")]
    NullNoDefault { field: String },
    #[error("config field {field} is empty")]
    Empty { field: String },
    #[error("config field {field} is empty and no default is provided")]
    EmptyNoDefault { field: String },
    /// The value has the wrong JSON type.
    #[error("a value for setting {field} must be {expected}, found {found}")]
    WrongType {
        field: String,
        expected: String,
        found: ValueKind,
    },
    /// A string could not be converted to the declared type.
    #[error("cannot convert {raw:?} to {expected} for setting {field}")]
    Coercion {
        field: String,
        raw: String,
        expected: ValueKind,
    },
    #[error("a value for setting {field} must be one of: {options}")]
    NotOneOf { field: String, options: String },
    /// Source keys with no matching setting in a closed spec.
    #[error("unexpected fields in the config: {}", fields.join(","))]
    UnexpectedFields { fields: Vec<String> },
    /// Any other rule violation, typically from a custom validator.
    #[error("invalid value for setting {field}: {message}")]
    Invalid { field: String, message: String },
}

impl ValidationError {
    /// Path of the offending setting, when the error concerns a single one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Missing { field }
            | Self::MissingNoDefault { field }
            | Self::Null { field }
            | Self::NullNoDefault { field }
            | Self::Empty { field }
            | Self::EmptyNoDefault { field }
            | Self::WrongType { field, .. }
            | Self::Coercion { field, .. }
            | Self::NotOneOf { field, .. }
            | Self::Invalid { field, .. } => Some(field),
            Self::UnexpectedFields { .. } => None,
        }
    }
}

/// Errors returned while declaring, loading or reading a validated config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A source layer could not be read.
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("unknown setting, not in config spec: {0}")]
    UnknownSetting(String),
    /// The declaration itself is inconsistent.
    #[error("invalid config spec: {0}")]
    InvalidSpec(String),
    #[error("key {0} not found")]
    KeyNotFound(String),
    /// A validated value does not fit the requested Rust type.
    #[error("failed to decode setting {key}: {source}")]
    Decode {
        key: String,
        source: serde_json::Error,
    },
    #[error("config has not been initialized")]
    NotInitialized,
    #[error("config has already been initialized")]
    AlreadyInitialized,
}

impl ConfigError {
    /// The validation failure behind this error, if any.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}
