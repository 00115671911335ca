//! Key renaming and filtering over another config.
//!
//! A projection maps between the keys a [`ProjectedConfig`] exposes and the
//! keys of the config it wraps ("source keys"). A consistent projection
//! round-trips every relevant key in both directions, and a key is relevant
//! exactly when its source key is.

use crate::{Config, MutableConfig, SourceError};
use serde_json::Value;
use std::fmt;

/// Mapping between exposed keys and source keys.
pub trait ConfigProjection: fmt::Debug + Send + Sync {
    /// Whether an exposed key is accepted by the projected config.
    fn is_relevant_key(&self, key: &str) -> bool;

    /// Whether a source config key is visible through the projection.
    fn is_relevant_source_key(&self, source_key: &str) -> bool;

    fn key_to_source_key(&self, key: &str) -> String;

    fn source_key_to_key(&self, source_key: &str) -> String;
}

type KeyPredicate = Box<dyn Fn(&str) -> bool + Send + Sync>;
type KeyMap = Box<dyn Fn(&str) -> String + Send + Sync>;

/// A projection assembled from optional closures.
///
/// Missing key maps default to the identity. Relevance always requires the
/// key to survive a round trip through both maps; beyond that, key relevance
/// defaults to the relevance of the mapped source key, and source-key
/// relevance defaults to `true`.
#[derive(Default)]
pub struct BasicConfigProjection {
    relevant_key: Option<KeyPredicate>,
    relevant_source_key: Option<KeyPredicate>,
    to_source_key: Option<KeyMap>,
    to_key: Option<KeyMap>,
}

impl BasicConfigProjection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_relevant_key(
        mut self,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.relevant_key = Some(Box::new(predicate));
        self
    }

    pub fn with_relevant_source_key(
        mut self,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.relevant_source_key = Some(Box::new(predicate));
        self
    }

    pub fn with_key_to_source_key(
        mut self,
        map: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.to_source_key = Some(Box::new(map));
        self
    }

    pub fn with_source_key_to_key(
        mut self,
        map: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.to_key = Some(Box::new(map));
        self
    }
}

impl fmt::Debug for BasicConfigProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicConfigProjection")
            .field("relevant_key", &self.relevant_key.is_some())
            .field("relevant_source_key", &self.relevant_source_key.is_some())
            .field("to_source_key", &self.to_source_key.is_some())
            .field("to_key", &self.to_key.is_some())
            .finish()
    }
}

impl ConfigProjection for BasicConfigProjection {
    fn is_relevant_key(&self, key: &str) -> bool {
        let source_key = self.key_to_source_key(key);
        if self.source_key_to_key(&source_key) != key {
            return false;
        }
        match &self.relevant_key {
            Some(predicate) => predicate(key),
            None => self.is_relevant_source_key(&source_key),
        }
    }

    fn is_relevant_source_key(&self, source_key: &str) -> bool {
        if self.key_to_source_key(&self.source_key_to_key(source_key)) != source_key {
            return false;
        }
        match &self.relevant_source_key {
            Some(predicate) => predicate(source_key),
            None => true,
        }
    }

    fn key_to_source_key(&self, key: &str) -> String {
        match &self.to_source_key {
            Some(map) => map(key),
            None => key.to_string(),
        }
    }

    fn source_key_to_key(&self, source_key: &str) -> String {
        match &self.to_key {
            Some(map) => map(source_key),
            None => source_key.to_string(),
        }
    }
}

/// Exposes uppercase source keys under lowercase names.
pub fn lowercase_projection() -> BasicConfigProjection {
    BasicConfigProjection::new()
        .with_key_to_source_key(|key| key.to_uppercase())
        .with_source_key_to_key(|source_key| source_key.to_lowercase())
}

/// Exposes lowercase source keys under uppercase names.
pub fn uppercase_projection() -> BasicConfigProjection {
    BasicConfigProjection::new()
        .with_key_to_source_key(|key| key.to_lowercase())
        .with_source_key_to_key(|source_key| source_key.to_uppercase())
}

/// Exposes source keys starting with a prefix, with the prefix stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixProjection {
    prefix: String,
}

impl PrefixProjection {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl ConfigProjection for PrefixProjection {
    fn is_relevant_key(&self, _key: &str) -> bool {
        true
    }

    fn is_relevant_source_key(&self, source_key: &str) -> bool {
        source_key.starts_with(&self.prefix)
    }

    fn key_to_source_key(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }

    fn source_key_to_key(&self, source_key: &str) -> String {
        source_key
            .strip_prefix(&self.prefix)
            .unwrap_or(source_key)
            .to_string()
    }
}

/// A config that renames or filters another config's keys.
#[derive(Debug)]
pub struct ProjectedConfig {
    inner: Box<dyn Config>,
    projection: Box<dyn ConfigProjection>,
}

impl ProjectedConfig {
    pub fn new(inner: impl Config + 'static, projection: impl ConfigProjection + 'static) -> Self {
        Self {
            inner: Box::new(inner),
            projection: Box::new(projection),
        }
    }

    pub fn inner(&self) -> &dyn Config {
        self.inner.as_ref()
    }

    pub fn projection(&self) -> &dyn ConfigProjection {
        self.projection.as_ref()
    }

    /// Resolve a writable source key, checking mutability before relevance.
    fn writable_source_key(&mut self, key: &str) -> Result<(String, &mut dyn MutableConfig), SourceError> {
        let origin = self.inner.origin();
        let inner = self
            .inner
            .as_mutable()
            .ok_or_else(|| SourceError::Immutable(format!("projected source {origin}")))?;
        if !self.projection.is_relevant_key(key) {
            return Err(SourceError::IrrelevantKey(key.to_string()));
        }
        Ok((self.projection.key_to_source_key(key), inner))
    }
}

impl Config for ProjectedConfig {
    fn get(&self, key: &str) -> Option<Value> {
        if !self.projection.is_relevant_key(key) {
            return None;
        }
        self.inner.get(&self.projection.key_to_source_key(key))
    }

    fn keys(&self) -> Vec<String> {
        self.inner
            .keys()
            .into_iter()
            .filter(|source_key| self.projection.is_relevant_source_key(source_key))
            .map(|source_key| self.projection.source_key_to_key(&source_key))
            .collect()
    }

    fn reload(&mut self) -> Result<(), SourceError> {
        self.inner.reload()
    }

    fn origin(&self) -> String {
        format!("projected({})", self.inner.origin())
    }

    fn as_mutable(&mut self) -> Option<&mut dyn MutableConfig> {
        Some(self)
    }
}

impl MutableConfig for ProjectedConfig {
    fn set(&mut self, key: &str, value: Value) -> Result<(), SourceError> {
        let (source_key, inner) = self.writable_source_key(key)?;
        inner.set(&source_key, value)
    }

    fn remove(&mut self, key: &str) -> Result<Option<Value>, SourceError> {
        let (source_key, inner) = self.writable_source_key(key)?;
        inner.remove(&source_key)
    }
}

/// At least one uppercase char and no lowercase ones.
pub(crate) fn is_upper(value: &str) -> bool {
    value.chars().any(char::is_uppercase) && !value.chars().any(char::is_lowercase)
}

/// Counterpart of [`is_upper`] for lowercase.
pub(crate) fn is_lower(value: &str) -> bool {
    value.chars().any(char::is_lowercase) && !value.chars().any(char::is_uppercase)
}
