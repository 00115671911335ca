//! Setting declarations and spec validation.
//!
//! Settings describe the name, type, default and rules of each config value.
//! A [`ConfigSpec`] groups them, and a [`SpecValidatedConfig`] reads a stack
//! of source layers through the spec, validating every value it returns.

mod error;
mod global;
mod schema;
mod setting;
mod spec;
mod validated;
pub mod validation;
mod value;

/// Validation and spec errors.
pub use error::{ConfigError, ValidationError};
pub use global::GlobalConfig;
/// Typed declarations.
pub use schema::ConfigSchema;
#[doc(hidden)]
pub use schema::__private;
/// Setting descriptors.
pub use setting::{MissingAction, Setting, SettingKind};
pub use spec::ConfigSpec;
pub use validated::SpecValidatedConfig;
pub use validation::{ValidationContext, Validator};
pub use value::ValueKind;
