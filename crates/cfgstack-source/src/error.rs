//! Error types for config sources.

use thiserror::Error;

/// Errors returned while reading or mutating config sources.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Reading a config file failed.
    #[error("failed to read config: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// Parsing a JSON5 config file failed.
    #[error("failed to parse config: {0}")]
    ParseFailed(#[from] json5::Error),
    /// Parsing a YAML config file failed.
    #[error("failed to parse config: {0}")]
    YamlParseFailed(#[from] serde_yaml::Error),
    /// A source produced something other than a key/value mapping.
    #[error("config source {origin} is not a mapping")]
    NotAMapping { origin: String },
    /// A write was attempted on a read-only source.
    #[error("{0} is not mutable")]
    Immutable(String),
    /// The key is filtered out by a projection.
    #[error("key {0} is not relevant to this projection")]
    IrrelevantKey(String),
    /// The key is absent from every consulted source.
    #[error("key {0} not found")]
    KeyNotFound(String),
}
