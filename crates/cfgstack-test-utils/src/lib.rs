//! Test helpers shared across cfgstack crates.

pub mod configs;
pub mod files;

pub use configs::{FailingConfig, RecordingConfig, dict, layer};
pub use files::{ConfigDir, write_config_file};
