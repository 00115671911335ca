//! Configuration source layers.
//!
//! This crate owns the `Config` interface, the in-memory, composite and
//! projected configs built on it, and the environment, argument and file
//! sources that feed layered configuration.

mod composite;
mod config;
mod error;
mod merge;
mod projection;
mod sources;

/// Ordered layer stack and merge strategies.
pub use composite::{CompositeConfig, MergeStrategy};
/// Core config interface and memory-backed configs.
pub use config::{CachingConfig, Config, DictConfig, MutableConfig, ProxyConfig};
/// Public error type returned by config sources.
pub use error::SourceError;
pub use merge::{merge_layers, merge_values};
/// Key projections.
pub use projection::{
    BasicConfigProjection, ConfigProjection, PrefixProjection, ProjectedConfig,
    lowercase_projection, uppercase_projection,
};
/// Environment, argument and file sources.
pub use sources::{
    ArgsConfig, ArgsProjection, EnvConfig, FileConfig, FileFormat, default_user_config_path,
};
