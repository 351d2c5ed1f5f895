//! Configuration management commands.

use clap::{Args, Subcommand};
use serde::Serialize;

use super::{get_config, output, print_success};
use crate::Cli;

/// Manage CLI configuration.
///
/// Configuration is stored in ~/.qari/config.yaml
#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// View the effective configuration
    View,
    /// Set a configuration value (an empty value resets it)
    Set {
        /// One of: catalog_path, cache_dir, fetch_timeout_secs, min_similarity
        key: String,
        /// New value
        value: String,
    },
}

#[derive(Serialize)]
struct ConfigView {
    config_file: String,
    catalog_path: String,
    cache_dir: String,
    fetch_timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_similarity: Option<f64>,
}

impl ConfigCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            ConfigSubcommand::View => {
                let cfg = get_config(cli)?;
                output(cli).write(&ConfigView {
                    config_file: cfg.path().display().to_string(),
                    catalog_path: cfg.catalog_path().display().to_string(),
                    cache_dir: cfg.cache_dir().display().to_string(),
                    fetch_timeout_secs: cfg.fetch_timeout().as_secs(),
                    min_similarity: cfg.min_similarity,
                })
            }

            ConfigSubcommand::Set { key, value } => {
                let mut cfg = get_config(cli)?;
                cfg.set(key, value)?;
                cfg.save()?;
                print_success(&format!("Set {} in {}", key, cfg.path().display()));
                Ok(())
            }
        }
    }
}
