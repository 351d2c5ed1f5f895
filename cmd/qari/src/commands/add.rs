//! Reciter registration.

use clap::Args;
use qari_voiceprint::ReciterRecord;
use serde::Serialize;

use super::{get_config, open_recognizer, output, print_success};
use crate::Cli;

/// Register a new reciter from a reference recitation.
///
/// The reference audio is downloaded and fingerprinted before anything is
/// written; on any failure the catalog and cache are left unchanged.
#[derive(Args)]
pub struct AddCommand {
    /// Reciter name (must be unique)
    #[arg(long)]
    name: String,

    /// Reference recitation URL or local path
    #[arg(long)]
    audio_url: String,

    /// Where the recording comes from
    #[arg(long)]
    source: String,
}

#[derive(Serialize)]
struct AddOutput<'a> {
    name: &'a str,
    audio_url: &'a str,
    source: &'a str,
    fingerprint: Vec<f32>,
}

impl AddCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let recognizer = open_recognizer(&cfg)?;

        let record = ReciterRecord::new(self.name.trim(), self.audio_url.trim(), self.source.trim());
        let fp = recognizer.add_reciter(record)?;
        print_success(&format!("Reciter \"{}\" added", self.name.trim()));

        output(cli).write(&AddOutput {
            name: self.name.trim(),
            audio_url: self.audio_url.trim(),
            source: self.source.trim(),
            fingerprint: fp.as_slice().to_vec(),
        })
    }
}
