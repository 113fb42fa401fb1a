//! Error types for Tally.
//!
//! Query evaluation itself never fails. These errors only surface at the
//! boundaries: importing records, validating a query, loading settings.

use std::path::PathBuf;
use thiserror::Error;

/// Record import errors.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The input is not a JSON array.
    #[error("Record collection must be a JSON array")]
    NotAnArray,

    /// An array element is not a JSON object.
    #[error("Record at index {index} is not an object")]
    NotAnObject { index: usize },

    /// A record has no usable identifier.
    #[error("Record is missing id field '{0}'")]
    MissingId(String),
}

/// Query validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// Pages are 1-indexed.
    #[error("Page must be at least 1")]
    InvalidPage,

    /// No view with the given id is registered.
    #[error("Unknown view: {0}")]
    UnknownView(String),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config directory found.
    #[error("Config directory not found")]
    NoConfigDir,

    /// IO error.
    #[error("IO error at {path:?}: {message}")]
    Io { path: PathBuf, message: String },

    /// Parse error.
    #[error("Parse error in {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Serialization error.
    #[error("Serialize error: {0}")]
    Serialize(String),
}
