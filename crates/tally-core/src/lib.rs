//! Core types for Tally.
//!
//! This crate contains shared data structures used across all Tally crates:
//! - Field values, records and record import
//! - Page size and selection policies
//! - Role/plan access requirements
//! - Settings
//! - Order and invoice totals
//! - Error types

mod access;
mod config;
mod error;
mod paging;
mod record;
pub mod sales;
mod selection;
mod value;

pub use access::{AccessRequirement, Plan, Principal, Role};
pub use config::{
    config_dir, settings_path, AccentColor, AppearanceConfig, ListConfig, Settings, ThemeMode,
};
pub use error::{ConfigError, QueryError, RecordError};
pub use paging::PageSize;
pub use record::{records_from_json, Identify, Record, RecordId, RecordSchema};
pub use selection::{SelectionGranularity, StaleSelection};
pub use value::{parse_date, parse_number, FieldKind, FieldValue, Fields};
