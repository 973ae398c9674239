use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate a single text
    Translate {
        /// Text to translate
        text: String,

        /// Source language code
        #[arg(short, long, default_value = "en")]
        source: String,

        /// Target language code
        #[arg(short, long, default_value = "es")]
        target: String,

        /// Print the full outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Translate a file of texts, one per line
    Batch {
        /// Input file, one text per line
        #[arg(short, long)]
        input: PathBuf,

        /// Source language code
        #[arg(short, long, default_value = "en")]
        source: String,

        /// Target language code
        #[arg(short, long, default_value = "es")]
        target: String,

        /// Output file for translated lines (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List supported languages
    Languages {
        /// Only languages reachable by a direct or pivot path
        #[arg(long)]
        available: bool,

        /// Only languages with no translation path
        #[arg(long)]
        unavailable: bool,
    },

    /// Show the translation path for a language pair
    Route {
        /// Source language code
        #[arg(short, long)]
        source: String,

        /// Target language code
        #[arg(short, long)]
        target: String,
    },

    /// Show service status and per-route state
    Status,

    /// Write the default configuration file
    InitConfig {
        /// Destination path
        #[arg(short, long, default_value = "tolka.toml")]
        path: PathBuf,
    },
}
