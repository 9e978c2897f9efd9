use std::path::PathBuf;

use clap::Parser;

/// Turn a raw conversational transcript into a structured lecture transcript.
#[derive(Debug, Parser)]
#[command(name = "lectern", version, about)]
pub struct Cli {
    /// Path to the raw transcript to transform.
    pub input: PathBuf,

    /// Target lecture duration in minutes.
    #[arg(long, default_value_t = 30)]
    pub duration: u32,

    /// Skip practical examples in the generated sections.
    #[arg(long)]
    pub no_examples: bool,

    /// Path to a lectern.toml configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the lecture transcript here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}
