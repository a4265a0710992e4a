//! Command-line interface definition.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use lakecal_core::{OutputFormat, YearMonth};

/// lakecal - Vacation rental availability from calendar feeds
#[derive(Debug, Parser)]
#[command(name = "lakecal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "LAKECAL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the apartments in the catalog
    Apartments {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Sync an apartment's feed and print its busy intervals
    Intervals {
        /// Apartment id from the catalog
        apartment: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Sync an apartment's feed and render availability month grids
    Calendar {
        /// Apartment id from the catalog
        apartment: String,

        /// First month to show (YYYY-MM), defaults to the current month
        #[arg(long)]
        month: Option<YearMonth>,

        /// Number of consecutive months to show
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=24))]
        months: u32,

        /// Date to treat as today (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Parse a local calendar document and print its busy intervals
    Parse {
        /// Calendar file, or '-' for stdin
        file: PathBuf,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Re-sync an apartment's feed periodically until interrupted
    Watch {
        /// Apartment id from the catalog
        apartment: String,

        /// Seconds between syncs (overrides watch.interval_secs)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}

/// Maps a `--json` flag to an output format.
pub fn output_format(json: bool) -> OutputFormat {
    if json {
        OutputFormat::Json
    } else {
        OutputFormat::Tty
    }
}
