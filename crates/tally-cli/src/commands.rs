//! Command implementations.
//!
//! Each command reads its inputs, runs the library code and returns the
//! output value. Printing is left to `main`.

use std::path::{Path, PathBuf};

use serde_json::json;
use tally_core::sales::OrderDraft;
use tally_core::{records_from_json, settings_path, ConfigError, RecordSchema, Settings};
use tally_query::{AggregateSpec, ListQueryEngine, Query};

use crate::error::CliError;

// =============================================================================
// Input
// =============================================================================

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| CliError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn read_json(path: &Path) -> Result<serde_json::Value, CliError> {
    serde_json::from_str(&read_file(path)?).map_err(|e| CliError::Json {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn read_toml(path: &Path) -> Result<toml::Table, CliError> {
    toml::from_str(&read_file(path)?).map_err(|e| CliError::Toml {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Settings from `--config`, or the default location.
pub fn load_settings(config: Option<&Path>) -> Result<Settings, CliError> {
    match config {
        Some(path) => Ok(Settings::load_from(path)?),
        None => match Settings::load() {
            Ok(settings) => Ok(settings),
            Err(ConfigError::NoConfigDir) => {
                tracing::warn!("No config directory available, using default settings");
                Ok(Settings::default())
            }
            Err(e) => Err(e.into()),
        },
    }
}

/// Parse a query file. A missing `page_size` falls back to the settings.
pub fn load_query(path: &Path, settings: &Settings) -> Result<Query, CliError> {
    let table = read_toml(path)?;
    let has_page_size = table.contains_key("page_size");

    let mut query: Query = toml::Value::Table(table)
        .try_into()
        .map_err(|e: toml::de::Error| CliError::Toml {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if !has_page_size {
        query.page_size = settings.lists.default_page_size;
    }
    query.validate()?;
    Ok(query)
}

fn load_schema(path: Option<&Path>) -> Result<RecordSchema, CliError> {
    let Some(path) = path else {
        return Ok(RecordSchema::default());
    };
    toml::Value::Table(read_toml(path)?)
        .try_into()
        .map_err(|e: toml::de::Error| CliError::Toml {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

// =============================================================================
// Commands
// =============================================================================

/// Arguments of `tally query`.
#[derive(Debug, Clone)]
pub struct QueryArgs {
    pub records: PathBuf,
    pub query: PathBuf,
    pub id_field: String,
    pub schema: Option<PathBuf>,
    pub group_by: Option<String>,
    pub sum: Option<String>,
}

/// Run a query and report the visible page plus counts and aggregates.
pub fn run_query(args: &QueryArgs, settings: &Settings) -> Result<serde_json::Value, CliError> {
    let schema = load_schema(args.schema.as_deref())?;
    let records = records_from_json(&read_json(&args.records)?, &args.id_field, &schema)?;
    tracing::info!("Loaded {} records from {:?}", records.len(), args.records);

    let query = load_query(&args.query, settings)?;

    let mut engine = ListQueryEngine::new();
    if let Some(group_field) = &args.group_by {
        engine = engine.with_aggregate(AggregateSpec {
            group_field: group_field.clone(),
            sum_field: args.sum.clone(),
        });
    }

    let result = engine.run(&records, &query);
    Ok(json!({
        "rows": result.visible_rows(),
        "total_matched": result.total_matched,
        "total_pages": result.total_pages,
        "page": result.page,
        "aggregates": result.aggregates,
    }))
}

/// Compute totals, payments and balance for an order file.
pub fn run_totals(order: &Path) -> Result<serde_json::Value, CliError> {
    let draft: OrderDraft =
        serde_json::from_value(read_json(order)?).map_err(|e| CliError::Json {
            path: order.to_path_buf(),
            message: e.to_string(),
        })?;

    let totals = draft.totals();
    Ok(json!({
        "subtotal": totals.subtotal,
        "discount": totals.discount,
        "tax": totals.tax,
        "total": totals.total,
        "paid": draft.total_paid(),
        "remaining": draft.remaining(),
    }))
}

/// Render the effective settings, optionally saving them.
pub fn run_settings(
    settings: &Settings,
    config: Option<&Path>,
    write: bool,
) -> Result<String, CliError> {
    if write {
        let path = match config {
            Some(path) => path.to_path_buf(),
            None => settings_path().ok_or(ConfigError::NoConfigDir)?,
        };
        settings.save_to(&path)?;
    }
    toml::to_string_pretty(settings).map_err(|e| CliError::Output(e.to_string()))
}
