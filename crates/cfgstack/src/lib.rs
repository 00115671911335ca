//! Public surface for cfgstack.
//!
//! This crate re-exports the source and spec crates and provides a small
//! initialization helper to keep consumer setup consistent.

/// Re-export for convenience.
pub use cfgstack_source as source;
/// Re-export for convenience.
pub use cfgstack_spec as spec;

pub use cfgstack_spec::config_schema;

/// Common imports for declaring and loading configs.
pub mod prelude {
    pub use cfgstack_source::{
        ArgsConfig, ArgsProjection, CompositeConfig, Config, DictConfig, EnvConfig, FileConfig,
        MergeStrategy, ProjectedConfig, lowercase_projection, uppercase_projection,
    };
    pub use cfgstack_spec::{
        ConfigError, ConfigSchema, ConfigSpec, GlobalConfig, MissingAction, Setting,
        SpecValidatedConfig, ValidationError, config_schema,
    };
}

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
    log::debug!("cfgstack logging initialized");
}
