//! Typed config declarations.
//!
//! [`config_schema!`](crate::config_schema) declares a struct whose fields
//! each carry a [`Setting`]. The generated [`ConfigSchema`] impl builds the
//! spec from those settings and decodes validated values back into the
//! struct.

use crate::{ConfigError, ConfigSpec, Setting, SpecValidatedConfig};
use cfgstack_source::Config;
use serde_json::{Map, Value};
use std::sync::Arc;

/// A struct whose fields are declared as settings.
pub trait ConfigSchema: Sized {
    /// Whether sources may carry keys outside the declared settings.
    const ALLOW_EXTRA: bool = false;

    /// Declared settings, named after their fields.
    fn settings() -> Result<Vec<Setting>, ConfigError>;

    /// Build the struct from validated values.
    fn from_values(values: &Map<String, Value>) -> Result<Self, ConfigError>;

    fn spec() -> Result<Arc<ConfigSpec>, ConfigError> {
        Ok(Arc::new(ConfigSpec::new(Self::settings()?, Self::ALLOW_EXTRA)?))
    }

    /// Validate sources, lowest precedence first, keeping them layered.
    fn layered(
        layers: impl IntoIterator<Item = Box<dyn Config>>,
    ) -> Result<SpecValidatedConfig, ConfigError> {
        let name = std::any::type_name::<Self>()
            .rsplit("::")
            .next()
            .unwrap_or("SpecValidatedConfig");
        Ok(SpecValidatedConfig::new(Self::spec()?, layers)?.with_name(name))
    }

    /// Validate sources and decode them into the struct.
    fn load(layers: impl IntoIterator<Item = Box<dyn Config>>) -> Result<Self, ConfigError> {
        Self::layered(layers)?.extract()
    }
}

#[doc(hidden)]
pub mod __private {
    use crate::ConfigError;
    use serde::de::DeserializeOwned;

    pub use serde_json::{Map, Value};

    /// Decode one validated value; absent settings decode from null.
    pub fn decode_setting<T: DeserializeOwned>(
        values: &Map<String, Value>,
        key: &str,
    ) -> Result<T, ConfigError> {
        let value = values.get(key).cloned().unwrap_or(Value::Null);
        serde_json::from_value(value).map_err(|source| ConfigError::Decode {
            key: key.to_string(),
            source,
        })
    }
}

/// Declare a config struct with one setting per field.
///
/// ```
/// use cfgstack_spec::{ConfigSchema, Setting, config_schema};
/// use cfgstack_source::{Config, DictConfig};
/// use serde_json::json;
///
/// config_schema! {
///     pub struct ToolConfig {
///         pub message: String as "MESSAGE" = Setting::string().default("Hello!"),
///         pub retries: i64 = Setting::int().default(3),
///     }
/// }
///
/// let layer = DictConfig::from_value(json!({ "retries": "5" })).unwrap();
/// let config = ToolConfig::load([layer.boxed()]).unwrap();
/// assert_eq!(config.message, "Hello!");
/// assert_eq!(config.retries, 5);
/// ```
#[macro_export]
macro_rules! config_schema {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty $(as $key:literal)? = $setting:expr
            ),* $(,)?
        }
        $(allow_extra = $allow:literal;)?
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::ConfigSchema for $name {
            const ALLOW_EXTRA: bool = false $(|| $allow)?;

            fn settings() -> ::std::result::Result<::std::vec::Vec<$crate::Setting>, $crate::ConfigError> {
                ::std::result::Result::Ok(::std::vec![
                    $(
                        $crate::Setting::bind_name(
                            $setting,
                            $crate::__setting_key!($field $(, $key)?),
                        )?,
                    )*
                ])
            }

            fn from_values(
                values: &$crate::__private::Map<::std::string::String, $crate::__private::Value>,
            ) -> ::std::result::Result<Self, $crate::ConfigError> {
                ::std::result::Result::Ok(Self {
                    $(
                        $field: $crate::__private::decode_setting(
                            values,
                            $crate::__setting_key!($field $(, $key)?),
                        )?,
                    )*
                })
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __setting_key {
    ($field:ident) => {
        ::std::stringify!($field)
    };
    ($field:ident, $key:literal) => {
        $key
    };
}
