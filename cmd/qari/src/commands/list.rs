//! Catalog listing.

use clap::Args;
use qari_voiceprint::FingerprintStore;
use serde::Serialize;

use super::{get_config, open_recognizer, output, print_warning};
use crate::Cli;

/// List known reciters and whether their fingerprint is cached.
#[derive(Args)]
pub struct ListCommand {}

#[derive(Debug, Serialize)]
struct ListEntry {
    name: String,
    audio_url: String,
    source: String,
    cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    cache_error: Option<String>,
}

/// Cache status of one identity. An unreadable entry counts as not cached
/// and carries the error.
fn cache_status(store: &dyn FingerprintStore, identity: &str) -> (bool, Option<String>) {
    match store.load(identity) {
        Ok(found) => (found.is_some(), None),
        Err(e) => {
            print_warning(&format!("cache entry for \"{}\": {}", identity, e));
            (false, Some(e.to_string()))
        }
    }
}

impl ListCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let recognizer = open_recognizer(&cfg)?;

        let mut entries = Vec::new();
        for record in recognizer.catalog().load_all()? {
            let (cached, cache_error) = cache_status(recognizer.store(), &record.identity);
            entries.push(ListEntry {
                name: record.identity,
                audio_url: record.audio_source,
                source: record.source_reference,
                cached,
                cache_error,
            });
        }

        if entries.is_empty() && !cli.json {
            println!("No reciters configured");
            return Ok(());
        }
        output(cli).write(&entries)
    }
}
