//! The declarative query a list view evaluates.
//!
//! A [`Query`] is plain data: search text, facet and range filters, a sort
//! key and a page window. Form controls mutate it; the engine reads it.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use tally_core::{parse_date, parse_number, FieldValue, PageSize, QueryError};

// =============================================================================
// Sort Direction
// =============================================================================

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Apply the direction to an ascending ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

// =============================================================================
// Range Filter
// =============================================================================

/// One end of a range filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeBound {
    Number(f64),
    Date(NaiveDate),
}

impl RangeBound {
    /// Parse a bound from form text: a number first, then an ISO date.
    ///
    /// Empty or unparseable text is no bound.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if let Some(n) = parse_number(text) {
            return Some(RangeBound::Number(n));
        }
        if let Some(d) = parse_date(text) {
            return Some(RangeBound::Date(d));
        }
        tracing::warn!("Ignoring unparseable range bound: {:?}", text);
        None
    }

    /// Compare a field value against this bound.
    ///
    /// Returns None when the value cannot be coerced to the bound's kind.
    fn compare(&self, value: &FieldValue) -> Option<Ordering> {
        match self {
            RangeBound::Number(bound) => value.as_number()?.partial_cmp(bound),
            RangeBound::Date(bound) => Some(value.as_date()?.cmp(bound)),
        }
    }
}

/// Inclusive `[min, max]` filter. An unset bound imposes no constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<RangeBound>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<RangeBound>,
}

impl RangeFilter {
    pub fn new(min: Option<RangeBound>, max: Option<RangeBound>) -> Self {
        Self { min, max }
    }

    /// Only a lower bound.
    pub fn at_least(min: f64) -> Self {
        Self::new(Some(RangeBound::Number(min)), None)
    }

    /// Only an upper bound.
    pub fn at_most(max: f64) -> Self {
        Self::new(None, Some(RangeBound::Number(max)))
    }

    /// Both bounds, numeric.
    pub fn between(min: f64, max: f64) -> Self {
        Self::new(Some(RangeBound::Number(min)), Some(RangeBound::Number(max)))
    }

    /// Both bounds, dates.
    pub fn dates(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self::new(from.map(RangeBound::Date), to.map(RangeBound::Date))
    }

    /// Build a filter from the text of min/max inputs.
    pub fn from_inputs(min_text: &str, max_text: &str) -> Self {
        Self::new(RangeBound::parse(min_text), RangeBound::parse(max_text))
    }

    /// True when neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Check a field value against the bounds.
    ///
    /// A missing value, or one that cannot be coerced to a set bound's kind,
    /// does not match.
    pub fn matches(&self, value: Option<&FieldValue>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(value) = value else {
            return false;
        };

        let above_min = self.min.as_ref().map_or(true, |b| {
            matches!(b.compare(value), Some(Ordering::Greater | Ordering::Equal))
        });
        let below_max = self.max.as_ref().map_or(true, |b| {
            matches!(b.compare(value), Some(Ordering::Less | Ordering::Equal))
        });
        above_min && below_max
    }
}

// =============================================================================
// Date Presets
// =============================================================================

/// Date windows offered by date filter dropdowns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "preset")]
pub enum DatePreset {
    /// No date constraint.
    #[default]
    All,
    /// First to last day of the month containing `today`.
    CurrentMonth,
    /// January 1 to December 31 of the year containing `today`.
    Annual,
    /// Caller-chosen bounds.
    Custom {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

impl DatePreset {
    /// Resolve the preset into a date range relative to `today`.
    pub fn resolve(&self, today: NaiveDate) -> RangeFilter {
        match *self {
            DatePreset::All => RangeFilter::default(),
            DatePreset::CurrentMonth => {
                let first = today.with_day(1);
                let last = first.and_then(|f| {
                    let (year, month) = if f.month() == 12 {
                        (f.year() + 1, 1)
                    } else {
                        (f.year(), f.month() + 1)
                    };
                    NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
                });
                RangeFilter::dates(first, last)
            }
            DatePreset::Annual => RangeFilter::dates(
                NaiveDate::from_ymd_opt(today.year(), 1, 1),
                NaiveDate::from_ymd_opt(today.year(), 12, 31),
            ),
            DatePreset::Custom { from, to } => RangeFilter::dates(from, to),
        }
    }
}

// =============================================================================
// Query
// =============================================================================

/// A list-view query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    /// Free-text search, matched case-insensitively.
    pub search_text: String,

    /// Fields the search text is matched against.
    pub search_fields: Vec<String>,

    /// Selected values per facet field. An empty set means no constraint.
    pub facet_filters: BTreeMap<String, BTreeSet<String>>,

    /// Inclusive range per field.
    pub range_filters: BTreeMap<String, RangeFilter>,

    /// Field to sort by, if any.
    pub sort_key: Option<String>,

    /// Sort direction.
    pub sort_direction: SortDirection,

    /// 1-indexed page number.
    pub page: usize,

    /// Rows per page.
    pub page_size: PageSize,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            search_fields: Vec::new(),
            facet_filters: BTreeMap::new(),
            range_filters: BTreeMap::new(),
            sort_key: None,
            sort_direction: SortDirection::Asc,
            page: 1,
            page_size: PageSize::default(),
        }
    }
}

impl Query {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search text and the fields it applies to.
    pub fn with_search<I, S>(mut self, text: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_text = text.into();
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the selected values of a facet.
    pub fn with_facet<I, S>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facet_filters
            .insert(field.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Set a range filter.
    pub fn with_range(mut self, field: impl Into<String>, range: RangeFilter) -> Self {
        self.range_filters.insert(field.into(), range);
        self
    }

    /// Set the sort key and direction.
    pub fn sorted_by(mut self, key: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_key = Some(key.into());
        self.sort_direction = direction;
        self
    }

    /// Set the page number.
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Check the caller-facing contract.
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.page == 0 {
            return Err(QueryError::InvalidPage);
        }
        Ok(())
    }

    /// Column header click: same key flips direction, a new key sorts ascending.
    pub fn toggle_sort(&mut self, key: &str) {
        if self.sort_key.as_deref() == Some(key) {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_key = Some(key.to_string());
            self.sort_direction = SortDirection::Asc;
        }
    }

    /// Checkbox click in a facet list: add or remove one value.
    pub fn toggle_facet(&mut self, field: &str, value: &str) {
        let selected = self.facet_filters.entry(field.to_string()).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        if selected.is_empty() {
            self.facet_filters.remove(field);
        }
    }

    /// True when search text, a facet value or a range bound is set.
    ///
    /// Sorting is not a filter.
    pub fn has_active_filters(&self) -> bool {
        !self.search_text.is_empty()
            || self.facet_filters.values().any(|v| !v.is_empty())
            || self.range_filters.values().any(|r| !r.is_unbounded())
    }

    /// Reset search, filters and page. Sort, search fields and page size stay.
    pub fn clear_filters(&mut self) {
        self.search_text.clear();
        self.facet_filters.clear();
        self.range_filters.clear();
        self.page = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_range_matches_inclusive() {
        let range = RangeFilter::between(10.0, 20.0);
        assert!(range.matches(Some(&FieldValue::Number(10.0))));
        assert!(range.matches(Some(&FieldValue::Number(20.0))));
        assert!(!range.matches(Some(&FieldValue::Number(20.01))));
        assert!(!range.matches(None));
    }

    #[test]
    fn test_range_coercion_failure_excludes() {
        let range = RangeFilter::at_least(0.0);
        assert!(range.matches(Some(&FieldValue::text("15"))));
        assert!(!range.matches(Some(&FieldValue::text("n/a"))));
        assert!(!range.matches(Some(&FieldValue::Date(date(2024, 1, 1)))));
    }

    #[test]
    fn test_unbounded_range_matches_anything() {
        let range = RangeFilter::default();
        assert!(range.matches(None));
        assert!(range.matches(Some(&FieldValue::text("n/a"))));
    }

    #[test]
    fn test_from_inputs() {
        let range = RangeFilter::from_inputs("", "100");
        assert_eq!(range, RangeFilter::at_most(100.0));

        let range = RangeFilter::from_inputs("2024-01-01", "abc");
        assert_eq!(range, RangeFilter::dates(Some(date(2024, 1, 1)), None));
    }

    #[test]
    fn test_date_presets() {
        let today = date(2024, 2, 14);
        assert_eq!(DatePreset::All.resolve(today), RangeFilter::default());
        assert_eq!(
            DatePreset::CurrentMonth.resolve(today),
            RangeFilter::dates(Some(date(2024, 2, 1)), Some(date(2024, 2, 29)))
        );
        assert_eq!(
            DatePreset::CurrentMonth.resolve(date(2023, 12, 31)),
            RangeFilter::dates(Some(date(2023, 12, 1)), Some(date(2023, 12, 31)))
        );
        assert_eq!(
            DatePreset::Annual.resolve(today),
            RangeFilter::dates(Some(date(2024, 1, 1)), Some(date(2024, 12, 31)))
        );
        let custom = DatePreset::Custom {
            from: None,
            to: Some(date(2024, 3, 1)),
        };
        assert_eq!(
            custom.resolve(today),
            RangeFilter::dates(None, Some(date(2024, 3, 1)))
        );
    }

    #[test]
    fn test_toggle_sort() {
        let mut query = Query::new();
        query.toggle_sort("price");
        assert_eq!(query.sort_key.as_deref(), Some("price"));
        assert_eq!(query.sort_direction, SortDirection::Asc);

        query.toggle_sort("price");
        assert_eq!(query.sort_direction, SortDirection::Desc);

        query.toggle_sort("name");
        assert_eq!(query.sort_key.as_deref(), Some("name"));
        assert_eq!(query.sort_direction, SortDirection::Asc);
    }

    #[test]
    fn test_toggle_facet() {
        let mut query = Query::new();
        query.toggle_facet("status", "active");
        query.toggle_facet("status", "low-stock");
        assert_eq!(query.facet_filters["status"].len(), 2);

        query.toggle_facet("status", "active");
        query.toggle_facet("status", "low-stock");
        assert!(!query.facet_filters.contains_key("status"));
    }

    #[test]
    fn test_has_active_filters_and_clear() {
        let mut query = Query::new()
            .with_search("mat", ["name"])
            .with_page_size(PageSize::rows(25))
            .with_page(3);
        assert!(query.has_active_filters());

        query.clear_filters();
        assert!(!query.has_active_filters());
        assert_eq!(query.page, 1);
        assert_eq!(query.search_fields, vec!["name".to_string()]);
        assert_eq!(query.page_size, PageSize::rows(25));

        query = query.with_range("price", RangeFilter::default());
        assert!(!query.has_active_filters());
    }

    #[test]
    fn test_sort_is_not_a_filter() {
        let mut query = Query::new()
            .sorted_by("due_date", SortDirection::Desc)
            .with_facet("status", ["paid"]);
        assert!(query.has_active_filters());

        query.clear_filters();
        assert!(!query.has_active_filters());
        assert_eq!(query.sort_key.as_deref(), Some("due_date"));
        assert_eq!(query.sort_direction, SortDirection::Desc);
    }

    #[test]
    fn test_validate() {
        assert!(Query::new().validate().is_ok());
        assert_eq!(
            Query::new().with_page(0).validate(),
            Err(QueryError::InvalidPage)
        );
    }

    #[test]
    fn test_deserialize_partial_query() {
        let query: Query = serde_json::from_str(
            r#"{"search_text":"coffee","range_filters":{"price":{"min":20}},"page_size":"all"}"#,
        )
        .unwrap();
        assert_eq!(query.search_text, "coffee");
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, PageSize::All);
        assert_eq!(query.range_filters["price"], RangeFilter::at_least(20.0));
    }
}
