//! Clip recognition.

use std::path::PathBuf;

use clap::Args;
use qari_cli::round2;
use qari_voiceprint::Verdict;
use serde::Serialize;

use super::{SkippedEntry, get_config, open_recognizer, output, print_info, skipped_entries};
use crate::Cli;

/// Identify the reciter of an audio clip.
///
/// Builds the fingerprint database from the catalog (computing and caching
/// any missing fingerprints), then reports the closest reciter.
#[derive(Args)]
pub struct RecognizeCommand {
    /// Audio clip (mp3, wav, flac, ogg, ...)
    clip: PathBuf,

    /// Also list the N closest reciters
    #[arg(long, default_value_t = 0)]
    top: usize,
}

#[derive(Serialize)]
struct Candidate {
    name: String,
    similarity: f64,
}

#[derive(Serialize)]
struct RecognizeOutput {
    verdict: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reciter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    similarity: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    candidates: Vec<Candidate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    skipped: Vec<SkippedEntry>,
}

impl RecognizeCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let recognizer = open_recognizer(&cfg)?;

        let result = recognizer.recognize_file(&self.clip)?;
        let skipped = skipped_entries(&result.report);

        if result.verdict == Verdict::NoCandidates {
            print_info("no reciters in the database; add one with 'qari add'");
        }

        let candidates = result
            .ranked
            .iter()
            .take(self.top)
            .map(|(entry, d)| Candidate {
                name: entry.record.identity.clone(),
                similarity: round2(1.0 - d),
            })
            .collect();

        let out = RecognizeOutput {
            verdict: result.verdict.to_string(),
            reciter: result.best.as_ref().map(|e| e.record.identity.clone()),
            source: result.best.as_ref().map(|e| e.record.source_reference.clone()),
            similarity: result.best.as_ref().map(|_| round2(result.similarity())),
            candidates,
            skipped,
        };
        output(cli).write(&out)
    }
}
