//! Configuration management for the qari CLI.
//!
//! Configuration is stored in `~/.qari/config.yaml`. Unset paths resolve to
//! files beside the config file, so a custom `--config` location carries
//! its own catalog and cache.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::paths::Paths;

/// Default download timeout in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 60;

/// Keys accepted by [`Config::set`].
pub const KEYS: &[&str] = &["catalog_path", "cache_dir", "fetch_timeout_secs", "min_similarity"];

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Reciter catalog JSON file.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub catalog_path: String,

    /// Fingerprint cache directory.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cache_dir: String,

    /// Reference audio download timeout in seconds (0 means default).
    #[serde(default, skip_serializing_if = "is_zero")]
    pub fetch_timeout_secs: u64,

    /// Similarity floor below which a best match is not confident.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_similarity: Option<f64>,

    /// Path to the config file (not serialized).
    #[serde(skip)]
    config_path: PathBuf,
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

impl Config {
    /// Gets the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        Paths::new().ok().map(|p| p.config_file())
    }

    /// Returns the config file path.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Directory layout rooted at the config file's directory.
    pub fn paths(&self) -> Paths {
        match self.config_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => Paths::at(dir),
            _ => Paths::at("."),
        }
    }

    /// Catalog path, falling back to `reciters_db.json` beside the config.
    pub fn catalog_path(&self) -> PathBuf {
        if self.catalog_path.is_empty() {
            self.paths().catalog_file()
        } else {
            PathBuf::from(&self.catalog_path)
        }
    }

    /// Cache directory, falling back to `features_cache/` beside the config.
    pub fn cache_dir(&self) -> PathBuf {
        if self.cache_dir.is_empty() {
            self.paths().cache_dir()
        } else {
            PathBuf::from(&self.cache_dir)
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        match self.fetch_timeout_secs {
            0 => Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            n => Duration::from_secs(n),
        }
    }

    /// Sets a field from its string form. An empty value resets it.
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let value = value.trim();
        match key {
            "catalog_path" => self.catalog_path = value.to_string(),
            "cache_dir" => self.cache_dir = value.to_string(),
            "fetch_timeout_secs" => {
                self.fetch_timeout_secs = if value.is_empty() {
                    0
                } else {
                    value
                        .parse()
                        .map_err(|e| anyhow::anyhow!("invalid fetch_timeout_secs '{}': {}", value, e))?
                };
            }
            "min_similarity" => {
                self.min_similarity = if value.is_empty() {
                    None
                } else {
                    let v: f64 = value
                        .parse()
                        .map_err(|e| anyhow::anyhow!("invalid min_similarity '{}': {}", value, e))?;
                    if !(-1.0..=1.0).contains(&v) {
                        anyhow::bail!("min_similarity must be within [-1, 1], got {}", v);
                    }
                    Some(v)
                };
            }
            _ => anyhow::bail!("unknown key '{}' (expected one of: {})", key, KEYS.join(", ")),
        }
        Ok(())
    }

    /// Saves the configuration to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }
}

/// Loads configuration from `custom_path`, or the default location.
///
/// A missing file yields the default configuration; nothing is written
/// until [`Config::save`].
pub fn load_config(custom_path: Option<&str>) -> anyhow::Result<Config> {
    let config_path = match custom_path {
        Some(p) => PathBuf::from(p),
        None => Config::default_config_path()
            .ok_or_else(|| anyhow::anyhow!("cannot determine config path"))?,
    };

    let mut cfg: Config = if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content)?
        }
    } else {
        Config::default()
    };

    cfg.config_path = config_path;
    Ok(cfg)
}
