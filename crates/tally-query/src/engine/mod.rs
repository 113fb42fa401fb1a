//! The list query engine.
//!
//! Evaluation is a fixed pipeline over borrowed records:
//!
//! ```text
//! search -> facet filters -> range filters -> sort -> paginate
//! ```
//!
//! Aggregates are taken after the filters and before pagination, so they
//! describe everything the user has narrowed down to rather than one page.
//! Nothing here fails: bad input degrades to exclusion, a no-op or an empty
//! page.

mod aggregate;
mod filter;
mod page;
mod search;
mod sort;

use std::ops::Range;

use tally_core::{Fields, Identify, RecordId};

use crate::query::Query;

pub use aggregate::{compute_aggregates, Aggregate, AggregateSpec, GroupStats};
pub use filter::{apply_facet_filters, apply_range_filter, apply_range_filters, facet_values};
pub use page::{page_range, paginate, total_pages};
pub use search::apply_search;
pub use sort::sort_by;

// =============================================================================
// Query Result
// =============================================================================

/// Output of one engine run.
#[derive(Debug, Clone)]
pub struct QueryResult<'a, R> {
    /// Every record that passed the filters, in sorted order.
    pub matched: Vec<&'a R>,

    /// Window of `matched` shown on the requested page.
    pub visible: Range<usize>,

    /// Number of matched records before pagination.
    pub total_matched: usize,

    /// Pages needed for the matched records.
    pub total_pages: usize,

    /// The page that was requested.
    pub page: usize,

    /// One entry per configured [`AggregateSpec`].
    pub aggregates: Vec<Aggregate>,
}

impl<'a, R> QueryResult<'a, R> {
    /// Records on the requested page.
    pub fn visible_rows(&self) -> &[&'a R] {
        &self.matched[self.visible.clone()]
    }

    /// All matched records across pages.
    pub fn matched_rows(&self) -> &[&'a R] {
        &self.matched
    }

    /// Aggregate for a group field, if configured.
    pub fn aggregate(&self, group_field: &str) -> Option<&Aggregate> {
        self.aggregates.iter().find(|a| a.group_field == group_field)
    }
}

impl<R: Identify> QueryResult<'_, R> {
    /// Ids of the rows on the requested page.
    pub fn visible_ids(&self) -> Vec<RecordId> {
        self.visible_rows().iter().map(|r| r.record_id()).collect()
    }

    /// Ids of every matched row.
    pub fn matched_ids(&self) -> Vec<RecordId> {
        self.matched.iter().map(|r| r.record_id()).collect()
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Evaluates queries against an in-memory record collection.
#[derive(Debug, Clone, Default)]
pub struct ListQueryEngine {
    aggregates: Vec<AggregateSpec>,
}

impl ListQueryEngine {
    /// Create an engine with no aggregates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an aggregate to compute on every run.
    pub fn with_aggregate(mut self, spec: AggregateSpec) -> Self {
        self.aggregates.push(spec);
        self
    }

    /// Configured aggregates.
    pub fn aggregates(&self) -> &[AggregateSpec] {
        &self.aggregates
    }

    /// Run the pipeline.
    pub fn run<'a, R: Fields>(&self, records: &'a [R], query: &Query) -> QueryResult<'a, R> {
        let rows = apply_search(records, &query.search_text, &query.search_fields);
        let rows = apply_facet_filters(rows, &query.facet_filters);
        let mut rows = apply_range_filters(rows, &query.range_filters);

        if let Some(key) = &query.sort_key {
            sort_by(&mut rows, key, query.sort_direction);
        }

        let aggregates = self
            .aggregates
            .iter()
            .map(|spec| {
                compute_aggregates(
                    rows.iter().copied(),
                    &spec.group_field,
                    spec.sum_field.as_deref(),
                )
            })
            .collect();

        let total_matched = rows.len();
        let visible = page_range(total_matched, query.page, query.page_size);

        tracing::debug!(
            "Query matched {} of {} records, showing {:?}",
            total_matched,
            records.len(),
            visible
        );

        QueryResult {
            matched: rows,
            visible,
            total_matched,
            total_pages: total_pages(total_matched, query.page_size),
            page: query.page,
            aggregates,
        }
    }
}
