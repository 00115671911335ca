//! Configs validated against a spec on access.

use crate::{ConfigError, ConfigSchema, ConfigSpec, ValidationError};
use cfgstack_source::{CompositeConfig, Config, DictConfig, MergeStrategy};
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// A stack of source configs whose values are read through a spec.
///
/// Sources are ordered lowest precedence first. Every read validates the
/// requested setting against the current sources, so layers added through
/// [`layers_mut`](Self::layers_mut) are visible immediately.
#[derive(Debug)]
pub struct SpecValidatedConfig {
    name: String,
    spec: Arc<ConfigSpec>,
    layers: CompositeConfig,
}

impl SpecValidatedConfig {
    /// Build the config and validate it once.
    pub fn new(
        spec: Arc<ConfigSpec>,
        layers: impl IntoIterator<Item = Box<dyn Config>>,
    ) -> Result<Self, ConfigError> {
        let config = Self::unvalidated(spec, layers);
        config.validate()?;
        Ok(config)
    }

    /// Build the config without validating it.
    pub fn unvalidated(
        spec: Arc<ConfigSpec>,
        layers: impl IntoIterator<Item = Box<dyn Config>>,
    ) -> Self {
        Self {
            name: "SpecValidatedConfig".to_string(),
            spec,
            layers: CompositeConfig::new(layers),
        }
    }

    /// Name shown by `Display`.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.layers = std::mem::take(&mut self.layers).with_strategy(strategy);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spec(&self) -> &Arc<ConfigSpec> {
        &self.spec
    }

    pub fn layers(&self) -> &CompositeConfig {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut CompositeConfig {
        &mut self.layers
    }

    /// Revalidate the whole config against the current sources.
    pub fn validate(&self) -> Result<Map<String, Value>, ValidationError> {
        self.spec.validate_config(&self.layers)
    }

    /// Validated value of one setting, `None` when it is left absent.
    pub fn get(&self, name: &str) -> Result<Option<Value>, ConfigError> {
        let value = self.spec.validate_setting(&self.layers, name)?;
        debug!(
            "resolved setting {name} from {}",
            self.layers
                .origin_of(name)
                .unwrap_or_else(|| "defaults".to_string())
        );
        Ok(value)
    }

    /// Like [`get`](Self::get), failing when the setting is absent.
    pub fn require(&self, name: &str) -> Result<Value, ConfigError> {
        self.get(name)?
            .ok_or_else(|| ConfigError::KeyNotFound(name.to_string()))
    }

    /// Deserialize one validated setting.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<T, ConfigError> {
        let value = self.require(name)?;
        serde_json::from_value(value).map_err(|source| ConfigError::Decode {
            key: name.to_string(),
            source,
        })
    }

    /// Setting names in declaration order.
    pub fn keys(&self) -> Vec<String> {
        self.spec.names().map(str::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.spec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spec.is_empty()
    }

    /// Reload every source layer.
    pub fn reload(&mut self) -> Result<(), ConfigError> {
        self.layers.reload()?;
        Ok(())
    }

    /// Copy of all validated values.
    pub fn snapshot(&self) -> Result<DictConfig, ConfigError> {
        Ok(DictConfig::new(self.validate()?))
    }

    /// Deserialize all validated values into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        let values = Value::Object(self.validate()?);
        serde_json::from_value(values).map_err(|source| ConfigError::Decode {
            key: self.name.clone(),
            source,
        })
    }

    /// Build a declared schema from the validated values.
    pub fn extract<S: ConfigSchema>(&self) -> Result<S, ConfigError> {
        S::from_values(&self.validate()?)
    }
}

impl fmt::Display for SpecValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.snapshot() {
            Ok(snapshot) => write!(f, "<{} {snapshot}>", self.name),
            Err(err) => write!(f, "<{} invalid: {err}>", self.name),
        }
    }
}
