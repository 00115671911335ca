//! Command-line argument source.

use crate::projection::{is_lower, is_upper};
use crate::{Config, ConfigProjection, DictConfig, MutableConfig, ProjectedConfig, SourceError};
use clap::{ArgAction, ArgMatches, Command};
use clap::parser::ValueSource;
use log::debug;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Projection commonly used for parsed arguments: optional key filtering and
/// optional uppercasing of exposed keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgsProjection {
    uppercase: bool,
    relevant_keys: Option<HashSet<String>>,
}

impl ArgsProjection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expose lowercase argument ids under uppercase keys.
    pub fn uppercase(mut self) -> Self {
        self.uppercase = true;
        self
    }

    /// Only expose the listed argument ids.
    pub fn relevant_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.relevant_keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }
}

impl ConfigProjection for ArgsProjection {
    fn is_relevant_key(&self, key: &str) -> bool {
        if self.uppercase && !is_upper(key) {
            return false;
        }
        self.is_relevant_source_key(&self.key_to_source_key(key))
    }

    fn is_relevant_source_key(&self, source_key: &str) -> bool {
        if self.uppercase && !is_lower(source_key) {
            return false;
        }
        self.relevant_keys
            .as_ref()
            .is_none_or(|keys| keys.contains(source_key))
    }

    fn key_to_source_key(&self, key: &str) -> String {
        if self.uppercase {
            key.to_lowercase()
        } else {
            key.to_string()
        }
    }

    fn source_key_to_key(&self, source_key: &str) -> String {
        if self.uppercase {
            source_key.to_uppercase()
        } else {
            source_key.to_string()
        }
    }
}

/// A config holding values given explicitly on the command line.
///
/// Arguments that fell back to a clap default are left out, so lower
/// precedence layers can still supply them.
#[derive(Debug)]
pub struct ArgsConfig {
    inner: ProjectedConfig,
}

impl ArgsConfig {
    /// Wrap already collected argument values.
    pub fn new(values: Map<String, Value>, projection: ArgsProjection) -> Self {
        Self {
            inner: ProjectedConfig::new(DictConfig::new(values), projection),
        }
    }

    /// Collect explicitly provided arguments from parsed matches.
    ///
    /// `command` is the definition `matches` came from. Arguments that can
    /// take several values (appended or with `num_args` above one) always
    /// become lists of strings, other arguments become strings. Flags carry
    /// the `"true"`/`"false"` text clap records for them.
    pub fn from_matches(
        command: &Command,
        matches: &ArgMatches,
        projection: ArgsProjection,
    ) -> Self {
        let mut values = Map::new();
        for id in matches.ids() {
            let key = id.as_str();
            let explicit = matches!(
                matches.value_source(key),
                Some(ValueSource::CommandLine | ValueSource::EnvVariable)
            );
            if !explicit {
                continue;
            }
            let raw = match matches.try_get_raw(key) {
                Ok(Some(raw)) => raw,
                Ok(None) => continue,
                Err(err) => {
                    debug!("skipping argument {key}: {err}");
                    continue;
                }
            };
            let mut items: Vec<Value> = raw
                .map(|value| Value::String(value.to_string_lossy().into_owned()))
                .collect();
            let value = if items.len() == 1 && !takes_many(command, key) {
                items.remove(0)
            } else {
                Value::Array(items)
            };
            values.insert(key.to_string(), value);
        }
        debug!("collected {} explicit arguments", values.len());
        Self::new(values, projection)
    }
}

/// Whether the argument `id` of `command` may collect several values.
fn takes_many(command: &Command, id: &str) -> bool {
    command
        .get_arguments()
        .find(|arg| arg.get_id() == id)
        .is_some_and(|arg| {
            matches!(arg.get_action(), ArgAction::Append)
                || arg
                    .get_num_args()
                    .is_some_and(|range| range.max_values() > 1)
        })
}

impl Config for ArgsConfig {
    fn get(&self, key: &str) -> Option<Value> {
        self.inner.get(key)
    }

    fn keys(&self) -> Vec<String> {
        self.inner.keys()
    }

    /// Parsed arguments never change.
    fn reload(&mut self) -> Result<(), SourceError> {
        Ok(())
    }

    fn origin(&self) -> String {
        "args".to_string()
    }

    fn as_mutable(&mut self) -> Option<&mut dyn MutableConfig> {
        Some(&mut self.inner)
    }
}
