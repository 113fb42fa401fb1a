//! Errors surfaced by the command-line front end.

use std::path::PathBuf;
use thiserror::Error;

use tally_core::{ConfigError, QueryError, RecordError};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read {path:?}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Invalid JSON in {path:?}: {message}")]
    Json { path: PathBuf, message: String },

    #[error("Invalid TOML in {path:?}: {message}")]
    Toml { path: PathBuf, message: String },

    #[error("Failed to write output: {0}")]
    Output(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Record(#[from] RecordError),
}
