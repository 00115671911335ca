use cfgstack_source::{Config, DictConfig, MutableConfig, SourceError};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Build a `DictConfig` from a JSON object literal.
///
/// Panics when `value` is not an object.
pub fn dict(value: Value) -> DictConfig {
    match DictConfig::from_value(value) {
        Ok(config) => config,
        Err(err) => panic!("test layer must be an object: {err}"),
    }
}

/// Boxed [`dict`] for building layer stacks.
pub fn layer(value: Value) -> Box<dyn Config> {
    Box::new(dict(value))
}

/// A mutable config that counts reloads.
#[derive(Debug, Clone, Default)]
pub struct RecordingConfig {
    values: DictConfig,
    reloads: Arc<AtomicUsize>,
}

impl RecordingConfig {
    pub fn new(values: Value) -> Self {
        Self {
            values: dict(values),
            reloads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter, still readable after the config is boxed away.
    pub fn reload_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.reloads)
    }

    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

impl Config for RecordingConfig {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key)
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys()
    }

    fn reload(&mut self) -> Result<(), SourceError> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn origin(&self) -> String {
        "recording".to_string()
    }

    fn as_mutable(&mut self) -> Option<&mut dyn MutableConfig> {
        Some(&mut self.values)
    }
}

/// A read-only config whose reload always fails.
#[derive(Debug, Clone, Default)]
pub struct FailingConfig {
    values: DictConfig,
}

impl FailingConfig {
    pub fn new(values: Value) -> Self {
        Self {
            values: dict(values),
        }
    }
}

impl Config for FailingConfig {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key)
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys()
    }

    fn reload(&mut self) -> Result<(), SourceError> {
        Err(SourceError::ReadFailed(std::io::Error::other("reload refused")))
    }

    fn origin(&self) -> String {
        "failing".to_string()
    }
}
