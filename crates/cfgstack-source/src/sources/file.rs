//! File-backed config layers.

use crate::{Config, DictConfig, SourceError};
use directories::UserDirs;
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Serialization format of a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// JSON or JSON5.
    Json5,
    Yaml,
}

impl FileFormat {
    /// Pick a format from the file extension; unknown extensions read as JSON5.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json5,
        }
    }

    /// Parse file contents into a JSON value.
    pub fn parse(self, contents: &str) -> Result<Value, SourceError> {
        match self {
            Self::Json5 => Ok(json5::from_str(contents)?),
            Self::Yaml => Ok(serde_yaml::from_str(contents)?),
        }
    }
}

/// A config loaded from a file, re-read on reload.
#[derive(Debug, Clone)]
pub struct FileConfig {
    path: PathBuf,
    format: FileFormat,
    required: bool,
    values: DictConfig,
}

impl FileConfig {
    /// Load a file that must exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        Self::open(path.as_ref(), true)
    }

    /// Load a file if it exists; a missing file yields an empty layer.
    pub fn optional(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        Self::open(path.as_ref(), false)
    }

    /// Override the format picked from the extension and re-read the file.
    pub fn with_format(mut self, format: FileFormat) -> Result<Self, SourceError> {
        self.format = format;
        self.reload()?;
        Ok(self)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    fn open(path: &Path, required: bool) -> Result<Self, SourceError> {
        let mut config = Self {
            path: path.to_path_buf(),
            format: FileFormat::from_path(path),
            required,
            values: DictConfig::default(),
        };
        config.reload()?;
        Ok(config)
    }

    fn read_values(&self) -> Result<DictConfig, SourceError> {
        if !self.required && !self.path.exists() {
            debug!("optional config file missing (path={})", self.path.display());
            return Ok(DictConfig::default());
        }
        debug!(
            "loading config file (path={}, format={:?})",
            self.path.display(),
            self.format
        );
        let contents = fs::read_to_string(&self.path)?;
        match self.format.parse(&contents)? {
            Value::Object(values) => Ok(DictConfig::new(values)),
            _ => Err(SourceError::NotAMapping {
                origin: self.origin(),
            }),
        }
    }
}

impl Config for FileConfig {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key)
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys()
    }

    fn reload(&mut self) -> Result<(), SourceError> {
        self.values = self.read_values()?;
        info!(
            "config file loaded (path={}, keys={})",
            self.path.display(),
            self.values.len()
        );
        Ok(())
    }

    fn origin(&self) -> String {
        format!("file({})", self.path.display())
    }

    fn len(&self) -> usize {
        self.values.len()
    }
}

/// Default per-user config path, `~/.<app_dir>/<file_name>`.
pub fn default_user_config_path(app_dir: &str, file_name: &str) -> Option<PathBuf> {
    UserDirs::new().map(|dirs| dirs.home_dir().join(format!(".{app_dir}")).join(file_name))
}
