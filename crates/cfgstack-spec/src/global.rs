//! Process-wide config slot.

use crate::{ConfigError, ConfigSchema};
use cfgstack_source::Config;
use log::debug;
use std::sync::OnceLock;

/// A config initialized once and shared for the rest of the process.
///
/// ```
/// use cfgstack_spec::GlobalConfig;
///
/// static PORT: GlobalConfig<u16> = GlobalConfig::new();
///
/// assert!(PORT.get().is_err());
/// PORT.initialize(8080).unwrap();
/// assert_eq!(*PORT.get().unwrap(), 8080);
/// assert!(PORT.initialize(9090).is_err());
/// ```
#[derive(Debug)]
pub struct GlobalConfig<T> {
    cell: OnceLock<T>,
}

impl<T> GlobalConfig<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Store the config; fails if it was already set.
    pub fn initialize(&self, value: T) -> Result<&T, ConfigError> {
        self.cell
            .set(value)
            .map_err(|_| ConfigError::AlreadyInitialized)?;
        debug!("global config initialized");
        self.get()
    }

    pub fn get(&self) -> Result<&T, ConfigError> {
        self.cell.get().ok_or(ConfigError::NotInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Return the stored config, building it first if needed.
    ///
    /// Concurrent callers may each run `build`; only one result is kept.
    pub fn get_or_try_init<E>(&self, build: impl FnOnce() -> Result<T, E>) -> Result<&T, E> {
        if let Some(value) = self.cell.get() {
            return Ok(value);
        }
        let value = build()?;
        Ok(self.cell.get_or_init(|| value))
    }
}

impl<T: ConfigSchema> GlobalConfig<T> {
    /// Load the schema from the given layers on first use.
    pub fn get_or_load(
        &self,
        layers: impl FnOnce() -> Vec<Box<dyn Config>>,
    ) -> Result<&T, ConfigError> {
        self.get_or_try_init(|| T::load(layers()))
    }
}

impl<T> Default for GlobalConfig<T> {
    fn default() -> Self {
        Self::new()
    }
}
