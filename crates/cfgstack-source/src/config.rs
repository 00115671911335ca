//! The `Config` interface and the in-memory configs built on it.
//!
//! A config is a string-keyed mapping of JSON values with a notion of
//! reloading from whatever backs it. Absence of a key is `None`; an explicit
//! null is `Some(Value::Null)`.

use crate::SourceError;
use log::debug;
use serde_json::{Map, Value};
use std::fmt;

/// Read access to a single configuration layer.
pub trait Config: fmt::Debug + Send + Sync {
    /// Value stored under `key`, or `None` when the key is absent.
    fn get(&self, key: &str) -> Option<Value>;

    /// All keys currently visible in this config.
    fn keys(&self) -> Vec<String>;

    /// Refresh contents from the backing store.
    ///
    /// Configs that cannot meaningfully reload, or that always read fresh
    /// data, treat this as a no-op.
    fn reload(&mut self) -> Result<(), SourceError>;

    /// Short label describing where the values come from.
    fn origin(&self) -> String {
        "config".to_string()
    }

    fn len(&self) -> usize {
        self.keys().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Value stored under `key`, failing when it is absent.
    fn require(&self, key: &str) -> Result<Value, SourceError> {
        self.get(key)
            .ok_or_else(|| SourceError::KeyNotFound(key.to_string()))
    }

    /// Copy the current contents into a memory-backed config.
    fn snapshot(&self) -> DictConfig {
        let mut values = Map::new();
        for key in self.keys() {
            if let Some(value) = self.get(&key) {
                values.insert(key, value);
            }
        }
        DictConfig::new(values)
    }

    /// Mutable view of this config, if it accepts writes at all.
    fn as_mutable(&mut self) -> Option<&mut dyn MutableConfig> {
        None
    }

    /// Box this config for use as a layer.
    fn boxed(self) -> Box<dyn Config>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

/// Write access to a configuration layer.
pub trait MutableConfig: Config {
    /// Store `value` under `key`.
    fn set(&mut self, key: &str, value: Value) -> Result<(), SourceError>;

    /// Remove `key`, returning the previous value if there was one.
    fn remove(&mut self, key: &str) -> Result<Option<Value>, SourceError>;
}

impl Config for Box<dyn Config> {
    fn get(&self, key: &str) -> Option<Value> {
        (**self).get(key)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }

    fn reload(&mut self) -> Result<(), SourceError> {
        (**self).reload()
    }

    fn origin(&self) -> String {
        (**self).origin()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn as_mutable(&mut self) -> Option<&mut dyn MutableConfig> {
        (**self).as_mutable()
    }
}

/// A config backed by its own map in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DictConfig {
    values: Map<String, Value>,
}

impl DictConfig {
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Build from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, SourceError> {
        match value {
            Value::Object(values) => Ok(Self::new(values)),
            _ => Err(SourceError::NotAMapping {
                origin: "dict".to_string(),
            }),
        }
    }

    /// Make this config a shallow copy of `other`.
    pub fn replace(&mut self, other: &dyn Config) {
        self.values = other.snapshot().into_inner();
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.values
    }
}

impl From<Map<String, Value>> for DictConfig {
    fn from(values: Map<String, Value>) -> Self {
        Self::new(values)
    }
}

impl fmt::Display for DictConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.values.clone()))
    }
}

impl Config for DictConfig {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    fn reload(&mut self) -> Result<(), SourceError> {
        Ok(())
    }

    fn origin(&self) -> String {
        "dict".to_string()
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn snapshot(&self) -> DictConfig {
        self.clone()
    }

    fn as_mutable(&mut self) -> Option<&mut dyn MutableConfig> {
        Some(self)
    }
}

impl MutableConfig for DictConfig {
    fn set(&mut self, key: &str, value: Value) -> Result<(), SourceError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<Option<Value>, SourceError> {
        Ok(self.values.remove(key))
    }
}

/// A config that forwards to a separately owned config.
///
/// Useful to adapt any config to a fixed slot and to switch the backing
/// source later with [`ProxyConfig::set_source`]. Writes succeed only when
/// the wrapped config is itself mutable.
#[derive(Debug)]
pub struct ProxyConfig {
    source: Box<dyn Config>,
}

impl ProxyConfig {
    pub fn new(source: impl Config + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    pub fn from_boxed(source: Box<dyn Config>) -> Self {
        Self { source }
    }

    /// Swap the backing source, returning the previous one.
    pub fn set_source(&mut self, source: Box<dyn Config>) -> Box<dyn Config> {
        debug!("proxy source switched to {}", source.origin());
        std::mem::replace(&mut self.source, source)
    }

    pub fn source(&self) -> &dyn Config {
        self.source.as_ref()
    }
}

impl Config for ProxyConfig {
    fn get(&self, key: &str) -> Option<Value> {
        self.source.get(key)
    }

    fn keys(&self) -> Vec<String> {
        self.source.keys()
    }

    fn reload(&mut self) -> Result<(), SourceError> {
        self.source.reload()
    }

    fn origin(&self) -> String {
        self.source.origin()
    }

    fn as_mutable(&mut self) -> Option<&mut dyn MutableConfig> {
        Some(self)
    }
}

impl MutableConfig for ProxyConfig {
    fn set(&mut self, key: &str, value: Value) -> Result<(), SourceError> {
        let origin = self.source.origin();
        match self.source.as_mutable() {
            Some(source) => source.set(key, value),
            None => Err(SourceError::Immutable(format!("proxy source {origin}"))),
        }
    }

    fn remove(&mut self, key: &str) -> Result<Option<Value>, SourceError> {
        let origin = self.source.origin();
        match self.source.as_mutable() {
            Some(source) => source.remove(key),
            None => Err(SourceError::Immutable(format!("proxy source {origin}"))),
        }
    }
}

/// A config that copies a wrapped config once and serves that copy until
/// reloaded.
///
/// Writes go to the copy and never reach the wrapped config; `reload`
/// discards them.
#[derive(Debug)]
pub struct CachingConfig {
    wrapped: Box<dyn Config>,
    cache: DictConfig,
}

impl CachingConfig {
    pub fn new(wrapped: impl Config + 'static) -> Self {
        let cache = wrapped.snapshot();
        Self {
            wrapped: Box::new(wrapped),
            cache,
        }
    }
}

impl Config for CachingConfig {
    fn get(&self, key: &str) -> Option<Value> {
        self.cache.get(key)
    }

    fn keys(&self) -> Vec<String> {
        self.cache.keys()
    }

    /// Reload the wrapped config and refresh the cache from it.
    fn reload(&mut self) -> Result<(), SourceError> {
        self.wrapped.reload()?;
        self.cache.replace(self.wrapped.as_ref());
        debug!(
            "refreshed cache from {} (keys={})",
            self.wrapped.origin(),
            self.cache.len()
        );
        Ok(())
    }

    fn origin(&self) -> String {
        format!("cached({})", self.wrapped.origin())
    }

    fn len(&self) -> usize {
        self.cache.len()
    }

    fn as_mutable(&mut self) -> Option<&mut dyn MutableConfig> {
        Some(&mut self.cache)
    }
}
