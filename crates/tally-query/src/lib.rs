//! List-view query engine for Tally.
//!
//! This crate provides:
//! - [`Query`] - Search text, facet and range filters, sort and page window
//! - [`ListQueryEngine`] - Runs a query over borrowed records
//! - [`SelectionTracker`] - Selected ids kept across re-evaluation
//! - [`ViewRegistry`] and [`ViewSession`] - Registered list pages and their mounted state
//!
//! # Example
//!
//! ```
//! use tally_core::{FieldValue, PageSize, Record};
//! use tally_query::{ListQueryEngine, Query, SortDirection};
//!
//! let records = vec![
//!     Record::new("1").with("price", 10.0).with("status", FieldValue::tag("active")),
//!     Record::new("2").with("price", 50.0).with("status", FieldValue::tag("low-stock")),
//!     Record::new("3").with("price", 30.0).with("status", FieldValue::tag("active")),
//! ];
//!
//! let query = Query::new()
//!     .with_facet("status", ["active"])
//!     .sorted_by("price", SortDirection::Asc)
//!     .with_page_size(PageSize::rows(1))
//!     .with_page(2);
//!
//! let result = ListQueryEngine::new().run(&records, &query);
//! assert_eq!(result.total_matched, 2);
//! assert_eq!(result.visible_rows()[0].id.to_string(), "3");
//! ```

pub mod engine;
mod query;
mod selection;
mod session;
mod views;

pub use engine::{
    apply_facet_filters, apply_range_filter, apply_range_filters, apply_search,
    compute_aggregates, facet_values, paginate, sort_by, total_pages, Aggregate, AggregateSpec,
    GroupStats, ListQueryEngine, QueryResult,
};
pub use query::{DatePreset, Query, RangeBound, RangeFilter, SortDirection};
pub use selection::SelectionTracker;
pub use session::ViewSession;
pub use views::{ViewDefinition, ViewRegistry, ViewRegistryError};
