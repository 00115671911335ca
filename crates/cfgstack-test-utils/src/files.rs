use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write `contents` to `dir/name`, returning the full path.
///
/// Panics on I/O errors.
pub fn write_config_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Err(err) = fs::write(&path, contents) {
        panic!("failed to write {}: {err}", path.display());
    }
    path
}

/// Temporary directory holding config files for one test.
pub struct ConfigDir {
    dir: TempDir,
}

impl ConfigDir {
    pub fn new() -> Self {
        match tempfile::tempdir() {
            Ok(dir) => Self { dir },
            Err(err) => panic!("failed to create temp dir: {err}"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        write_config_file(self.path(), name, contents)
    }
}

impl Default for ConfigDir {
    fn default() -> Self {
        Self::new()
    }
}
