//! Command-line arguments.
//!
//! Commands:
//! - tally query --records <file.json> --query <file.toml>
//! - tally totals --order <file.json>
//! - tally settings [--write]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tally - filter, sort and page business records
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Settings file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a list query over a JSON array of records
    Query {
        /// JSON file holding an array of record objects
        #[arg(long)]
        records: PathBuf,

        /// TOML file holding the query
        #[arg(long)]
        query: PathBuf,

        /// Field that identifies each record
        #[arg(long, default_value = "id")]
        id_field: String,

        /// TOML file declaring field kinds
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Count matched records per value of this field
        #[arg(long)]
        group_by: Option<String>,

        /// Sum this field per group
        #[arg(long, requires = "group_by")]
        sum: Option<String>,
    },

    /// Compute totals for an order or invoice
    Totals {
        /// JSON file holding the order
        #[arg(long)]
        order: PathBuf,
    },

    /// Print the effective settings
    Settings {
        /// Write the effective settings back to disk
        #[arg(long)]
        write: bool,
    },
}
