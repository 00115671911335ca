//! Ordered overlay of several configs.
//!
//! Layers are stored lowest precedence first. A lookup walks the stack from
//! the top and the first layer holding the key wins, unless the composite is
//! set to merge nested objects across layers.

use crate::merge::merge_layers;
use crate::{Config, SourceError};
use log::{debug, warn};
use serde_json::Value;
use std::collections::BTreeSet;

/// How values for the same key in several layers are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergeStrategy {
    /// The highest layer holding the key supplies the whole value.
    #[default]
    Replace,
    /// Objects are merged recursively across layers; higher layers override
    /// leaf values.
    Deep,
}

/// A config backed by an ordered stack of configs.
#[derive(Debug, Default)]
pub struct CompositeConfig {
    layers: Vec<Box<dyn Config>>,
    strategy: MergeStrategy,
}

impl CompositeConfig {
    /// Create a composite from layers ordered lowest precedence first.
    pub fn new(layers: impl IntoIterator<Item = Box<dyn Config>>) -> Self {
        Self {
            layers: layers.into_iter().collect(),
            strategy: MergeStrategy::Replace,
        }
    }

    pub fn with_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> MergeStrategy {
        self.strategy
    }

    /// Add a layer above every existing layer.
    pub fn push(&mut self, layer: impl Config + 'static) {
        debug!("pushing layer {} at top of stack", layer.origin());
        self.layers.push(Box::new(layer));
    }

    /// Place a layer at `index`, 0 being the lowest precedence.
    ///
    /// An index past the end places the layer on top.
    pub fn insert(&mut self, index: usize, layer: impl Config + 'static) {
        let index = index.min(self.layers.len());
        debug!("inserting layer {} at position {index}", layer.origin());
        self.layers.insert(index, Box::new(layer));
    }

    /// Remove and return the layer at `index`.
    pub fn remove_layer(&mut self, index: usize) -> Option<Box<dyn Config>> {
        (index < self.layers.len()).then(|| self.layers.remove(index))
    }

    pub fn layers(&self) -> &[Box<dyn Config>] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut Vec<Box<dyn Config>> {
        &mut self.layers
    }

    pub fn len_layers(&self) -> usize {
        self.layers.len()
    }

    /// Index of the highest layer that holds `key`.
    pub fn source_index(&self, key: &str) -> Option<usize> {
        self.layers.iter().rposition(|layer| layer.contains_key(key))
    }

    /// Origin label of the highest layer that holds `key`.
    pub fn origin_of(&self, key: &str) -> Option<String> {
        self.source_index(key)
            .map(|index| self.layers[index].origin())
    }

    fn get_deep(&self, key: &str) -> Option<Value> {
        merge_layers(self.layers.iter().filter_map(|layer| layer.get(key)))
    }
}

impl Config for CompositeConfig {
    fn get(&self, key: &str) -> Option<Value> {
        match self.strategy {
            MergeStrategy::Replace => self.layers.iter().rev().find_map(|layer| layer.get(key)),
            MergeStrategy::Deep => self.get_deep(key),
        }
    }

    /// Union of every layer's keys.
    fn keys(&self) -> Vec<String> {
        let keys: BTreeSet<String> = self.layers.iter().flat_map(|layer| layer.keys()).collect();
        keys.into_iter().collect()
    }

    /// Reload every layer, reporting the first failure after all were tried.
    fn reload(&mut self) -> Result<(), SourceError> {
        let mut first_error = None;
        for layer in &mut self.layers {
            if let Err(err) = layer.reload() {
                warn!("failed to reload layer {}: {err}", layer.origin());
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn origin(&self) -> String {
        let origins: Vec<String> = self.layers.iter().map(|layer| layer.origin()).collect();
        format!("composite[{}]", origins.join(", "))
    }
}
