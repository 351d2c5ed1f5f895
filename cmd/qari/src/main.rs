//! qari - identify the reciter of a Quranic recitation clip.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{AddCommand, BuildCommand, ConfigCommand, ListCommand, RecognizeCommand};

/// qari - identify the reciter of a Quranic recitation clip.
///
/// Each known reciter is represented by a timbral fingerprint computed from
/// one reference recitation. A clip is attributed to the reciter whose
/// fingerprint is closest by cosine distance.
///
/// Configuration is stored in ~/.qari/config.yaml; the reciter catalog and
/// the fingerprint cache live beside it unless configured otherwise.
#[derive(Parser)]
#[command(name = "qari")]
#[command(about = "Quranic reciter identification")]
#[command(version)]
pub struct Cli {
    /// Config file (default is ~/.qari/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Identify the reciter of an audio clip
    Recognize(RecognizeCommand),
    /// Register a new reciter from a reference recitation
    Add(AddCommand),
    /// List known reciters
    List(ListCommand),
    /// Fingerprint every catalog entry that is not cached yet
    Build(BuildCommand),
    /// Manage CLI configuration
    Config(ConfigCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    match &cli.command {
        Commands::Recognize(cmd) => cmd.run(&cli),
        Commands::Add(cmd) => cmd.run(&cli),
        Commands::List(cmd) => cmd.run(&cli),
        Commands::Build(cmd) => cmd.run(&cli),
        Commands::Config(cmd) => cmd.run(&cli),
    }
}
