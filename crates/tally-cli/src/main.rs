//! Tally - main entry point.
//!
//! Loads settings, dispatches the subcommand and prints its output to stdout.
//! Logs go to stderr, filtered by `RUST_LOG`.

mod args;
mod commands;
mod error;

use clap::Parser;

use args::{Cli, Command};
use commands::QueryArgs;
use error::CliError;

fn run(cli: Cli) -> Result<String, CliError> {
    let settings = commands::load_settings(cli.config.as_deref())?;

    match cli.command {
        Command::Query {
            records,
            query,
            id_field,
            schema,
            group_by,
            sum,
        } => {
            let args = QueryArgs {
                records,
                query,
                id_field,
                schema,
                group_by,
                sum,
            };
            let output = commands::run_query(&args, &settings)?;
            serde_json::to_string_pretty(&output).map_err(|e| CliError::Output(e.to_string()))
        }
        Command::Totals { order } => {
            let output = commands::run_totals(&order)?;
            serde_json::to_string_pretty(&output).map_err(|e| CliError::Output(e.to_string()))
        }
        Command::Settings { write } => {
            commands::run_settings(&settings, cli.config.as_deref(), write)
        }
    }
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            tracing::error!("Command failed: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
