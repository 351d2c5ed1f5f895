//! Path utilities for qari.

use std::io;
use std::path::{Path, PathBuf};

/// Default base directory name under the user's home.
pub const DEFAULT_BASE_DIR: &str = ".qari";

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Default reciter catalog filename.
pub const DEFAULT_CATALOG_FILE: &str = "reciters_db.json";

/// Default fingerprint cache directory name.
pub const DEFAULT_CACHE_DIR: &str = "features_cache";

/// Provides access to the qari directory structure.
#[derive(Debug, Clone)]
pub struct Paths {
    base_dir: PathBuf,
}

impl Paths {
    /// Paths rooted at `~/.qari`.
    pub fn new() -> io::Result<Self> {
        let home_dir = dirs::home_dir().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "could not find home directory")
        })?;
        Ok(Self::at(home_dir.join(DEFAULT_BASE_DIR)))
    }

    /// Paths rooted at an explicit directory.
    pub fn at(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Returns the base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns the config file path (`<base>/config.yaml`).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join(DEFAULT_CONFIG_FILE)
    }

    /// Returns the catalog path (`<base>/reciters_db.json`).
    pub fn catalog_file(&self) -> PathBuf {
        self.base_dir.join(DEFAULT_CATALOG_FILE)
    }

    /// Returns the fingerprint cache directory (`<base>/features_cache`).
    pub fn cache_dir(&self) -> PathBuf {
        self.base_dir.join(DEFAULT_CACHE_DIR)
    }
}
