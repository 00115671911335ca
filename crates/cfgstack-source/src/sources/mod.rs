//! Configs backed by the process environment, command-line arguments and
//! files on disk.

mod args;
mod env;
mod file;

pub use args::{ArgsConfig, ArgsProjection};
pub use env::EnvConfig;
pub use file::{FileConfig, FileFormat, default_user_config_path};
