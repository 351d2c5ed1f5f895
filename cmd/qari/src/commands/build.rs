//! Cache warm-up.

use clap::Args;
use qari_voiceprint::EntryOutcome;
use serde::Serialize;

use super::{SkippedEntry, get_config, open_recognizer, output, print_success, skipped_entries};
use crate::Cli;

/// Fingerprint every catalog entry that is not cached yet.
///
/// Recognition does this on demand; running it ahead of time moves the
/// downloads out of the first request.
#[derive(Args)]
pub struct BuildCommand {}

#[derive(Serialize)]
struct BuildOutput {
    total: usize,
    cached: usize,
    computed: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    skipped: Vec<SkippedEntry>,
}

impl BuildCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let recognizer = open_recognizer(&cfg)?;

        let build = recognizer.build_database()?;
        let report = &build.report;
        let out = BuildOutput {
            total: report.entries.len(),
            cached: report.count(|o| *o == EntryOutcome::Cached),
            computed: report.count(|o| *o == EntryOutcome::Computed),
            skipped: skipped_entries(report),
        };

        print_success(&format!(
            "{} of {} reciters fingerprinted",
            build.database.len(),
            out.total
        ));
        output(cli).write(&out)
    }
}
