//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Newshound CLI - adaptive news-article extraction.
#[derive(Debug, Parser)]
#[command(name = "newshound")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Database path override
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// API key for the generation client
    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch an article page and extract its fields
    Extract(ExtractArgs),

    /// Extract fields from a saved HTML file
    ExtractFile(ExtractFileArgs),

    /// Extract every article listed in a URL file, one per line
    Batch(BatchArgs),

    /// Show what has been learned about a source
    Show {
        /// Source identifier (e.g. example.com) or an article URL
        source: String,
    },

    /// Show persisted pipeline statistics
    Stats,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Article URL
    pub url: String,

    /// Skip the direct-extraction fallback for this run
    #[arg(long)]
    pub no_direct: bool,
}

/// Arguments for the extract-file command.
#[derive(Debug, Parser)]
pub struct ExtractFileArgs {
    /// Path to a saved HTML file
    pub path: PathBuf,

    /// Canonical URL of the article, used as the record key and to
    /// derive the source
    #[arg(short, long)]
    pub url: String,

    /// Skip the direct-extraction fallback for this run
    #[arg(long)]
    pub no_direct: bool,
}

/// Arguments for the batch command.
#[derive(Debug, Parser)]
pub struct BatchArgs {
    /// File listing article URLs, one per line; blank lines and lines
    /// starting with '#' are skipped
    pub path: PathBuf,

    /// Seconds to wait between requests
    #[arg(long, default_value_t = 5)]
    pub delay_secs: u64,

    /// Skip the direct-extraction fallback for this run
    #[arg(long)]
    pub no_direct: bool,
}
