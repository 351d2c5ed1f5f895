//! Utility functions for CLI commands.

use qari_cli::{Config, Output, OutputFormat, load_config};
use qari_voiceprint::{
    BuildReport, DirStore, Fetcher, JsonCatalog, Matcher, MatcherConfig, MfccExtractor, Recognizer,
};
use serde::Serialize;

use crate::Cli;

/// Gets the global configuration.
pub fn get_config(cli: &Cli) -> anyhow::Result<Config> {
    load_config(cli.config.as_deref())
}

/// Opens the catalog, cache and fetcher described by the configuration.
pub fn open_recognizer(cfg: &Config) -> anyhow::Result<Recognizer> {
    let store = DirStore::open(cfg.cache_dir())?;
    let matcher = Matcher::with_config(MatcherConfig {
        min_similarity: cfg.min_similarity,
    });

    tracing::debug!(
        catalog = %cfg.catalog_path().display(),
        cache = %cfg.cache_dir().display(),
        timeout_secs = cfg.fetch_timeout().as_secs(),
        "opening recognizer"
    );

    Ok(Recognizer::new(
        Box::new(JsonCatalog::new(cfg.catalog_path())),
        Box::new(store),
        Box::new(Fetcher::new(cfg.fetch_timeout())),
        Box::new(MfccExtractor::new()),
        matcher,
    ))
}

/// Output sink for the global `--output` and `--json` flags.
pub fn output(cli: &Cli) -> Output {
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Yaml
    };
    Output::new(format, cli.output.clone())
}

/// A catalog entry left out of the database.
#[derive(Serialize)]
pub struct SkippedEntry {
    pub name: String,
    pub reason: String,
}

/// Prints a warning per skipped entry and returns them for output.
pub fn skipped_entries(report: &BuildReport) -> Vec<SkippedEntry> {
    report
        .warnings()
        .map(|(name, reason)| {
            print_warning(&format!("skipped \"{}\": {}", name, reason));
            SkippedEntry {
                name: name.to_string(),
                reason: reason.to_string(),
            }
        })
        .collect()
}

/// Prints success message.
pub fn print_success(msg: &str) {
    eprintln!("\x1b[32m✓\x1b[0m {}", msg);
}

/// Prints info message.
pub fn print_info(msg: &str) {
    eprintln!("\x1b[34mℹ\x1b[0m {}", msg);
}

/// Prints warning message.
pub fn print_warning(msg: &str) {
    eprintln!("\x1b[33m⚠\x1b[0m {}", msg);
}
