//! Command-line parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use roster_core::{RecordId, RosterError};

#[derive(Debug, Parser)]
#[command(name = "roster")]
#[command(about = "Browse a remote roster catalog with cached, cyclic navigation")]
pub struct Cli {
    /// TOML config file (falls back to $ROSTER_CONFIG, then defaults).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show a record with its previous/next ids, or the redirect target.
    Show {
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
    },
    /// Find a record by name (case-insensitive, exact).
    Search {
        /// Unquoted multi-word names are joined with single spaces.
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// List every resolvable record in id order.
    List,
    /// Show the nearest resolvable ids around a record.
    Neighbors {
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
    },
}

fn parse_record_id(raw: &str) -> Result<RecordId, RosterError> {
    raw.parse()
}
