//! Environment variable source.

use crate::{Config, SourceError};
use log::debug;
use serde_json::{Map, Value};
use std::fmt;

type KeyMap = Box<dyn Fn(&str) -> String + Send + Sync>;

/// A config that reads environment variables on every access.
///
/// Only variables starting with the prefix are visible. The prefix is
/// stripped and the remainder is passed through the key map, which
/// lowercases by default.
pub struct EnvConfig {
    prefix: String,
    keymap: KeyMap,
}

impl EnvConfig {
    /// Every variable, keys lowercased.
    pub fn new() -> Self {
        Self::with_prefix("")
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            keymap: Box::new(|key| key.to_lowercase()),
        }
    }

    /// Replace the key map applied after stripping the prefix.
    pub fn with_keymap(mut self, keymap: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.keymap = Box::new(keymap);
        self
    }

    /// Keep variable names exactly as they appear after the prefix.
    pub fn preserve_case(self) -> Self {
        self.with_keymap(str::to_string)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn filtered(&self) -> Map<String, Value> {
        let mut values = Map::new();
        for (name, value) in std::env::vars_os() {
            let (Some(name), Some(value)) = (name.to_str(), value.to_str()) else {
                debug!("skipping non-unicode environment variable {name:?}");
                continue;
            };
            if let Some(stripped) = name.strip_prefix(&self.prefix) {
                values.insert((self.keymap)(stripped), Value::String(value.to_string()));
            }
        }
        values
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EnvConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvConfig")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl Config for EnvConfig {
    fn get(&self, key: &str) -> Option<Value> {
        self.filtered().remove(key)
    }

    fn keys(&self) -> Vec<String> {
        self.filtered().keys().cloned().collect()
    }

    /// Environment reads are always fresh.
    fn reload(&mut self) -> Result<(), SourceError> {
        Ok(())
    }

    fn origin(&self) -> String {
        format!("env({}*)", self.prefix)
    }

    fn len(&self) -> usize {
        self.filtered().len()
    }
}
