//! lyricmidi - turn lyric text into a MIDI note track and alignment labels
//!
//! Subcommands:
//! - `lyricmidi generate [input]` - Write the MIDI file and label file
//! - `lyricmidi tokenize <text>` - Show how text splits into units
//! - `lyricmidi hint [input]` - Suggest a maximum label silence
//! - `lyricmidi config` - Print the effective configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lyricconf::LyricConfig;

mod commands;

#[derive(Parser)]
#[command(name = "lyricmidi")]
#[command(about = "Generate MIDI notes and aligned labels from romaji or kana text")]
#[command(version)]
struct Cli {
    /// Config file (replaces ./lyricmidi.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a MIDI file and a label file from text
    Generate {
        /// Input text file, or "-" for stdin
        #[arg(default_value = "-")]
        input: String,

        #[command(flatten)]
        overrides: commands::GenerationOverrides,
    },

    /// Print the units each token splits into
    Tokenize {
        /// Text to tokenize (joined with spaces)
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Suggest the largest label silence that keeps labels apart
    Hint {
        /// Input text file, or "-" for stdin
        #[arg(default_value = "-")]
        input: String,

        /// Treat '_' as a rest
        #[arg(long)]
        rests: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, sources) = LyricConfig::load_with_sources_from(cli.config.as_deref())
        .context("Failed to load configuration")?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.logging.log_level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    for file in &sources.files {
        tracing::debug!(path = %file.display(), "loaded config file");
    }

    match cli.command {
        Commands::Generate { input, overrides } => {
            commands::generate(&config, &input, &overrides)?;
        }
        Commands::Tokenize { text } => {
            commands::tokenize(&text.join(" "));
        }
        Commands::Hint { input, rests } => {
            commands::hint(&config, &input, rests)?;
        }
        Commands::Config => {
            commands::show_config(&config, &sources);
        }
    }

    Ok(())
}
