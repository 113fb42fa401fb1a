//! Facet and range filters.

use std::collections::{BTreeMap, BTreeSet};

use tally_core::Fields;

use crate::query::RangeFilter;

/// Keep records whose value for every facet is among the selected values.
///
/// A facet with an empty selection imposes no constraint. A record without
/// the field fails any non-empty facet.
pub fn apply_facet_filters<'a, R, I>(
    records: I,
    facet_filters: &BTreeMap<String, BTreeSet<String>>,
) -> Vec<&'a R>
where
    R: Fields + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let active: Vec<(&String, &BTreeSet<String>)> = facet_filters
        .iter()
        .filter(|(_, selected)| !selected.is_empty())
        .collect();

    records
        .into_iter()
        .filter(|record| {
            active.iter().all(|(field, selected)| {
                record
                    .field(field)
                    .is_some_and(|value| selected.contains(&value.to_string()))
            })
        })
        .collect()
}

/// Keep records whose `field` lies within the range.
pub fn apply_range_filter<'a, R, I>(records: I, field: &str, range: &RangeFilter) -> Vec<&'a R>
where
    R: Fields + 'a,
    I: IntoIterator<Item = &'a R>,
{
    if range.is_unbounded() {
        return records.into_iter().collect();
    }
    records
        .into_iter()
        .filter(|record| range.matches(record.field(field).as_ref()))
        .collect()
}

/// Apply every range filter in turn.
pub fn apply_range_filters<'a, R, I>(
    records: I,
    range_filters: &BTreeMap<String, RangeFilter>,
) -> Vec<&'a R>
where
    R: Fields + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut rows: Vec<&'a R> = records.into_iter().collect();
    for (field, range) in range_filters {
        rows = apply_range_filter(rows, field, range);
    }
    rows
}

/// Distinct stringified values of a field, for populating facet pickers.
pub fn facet_values<'a, R, I>(records: I, field: &str) -> BTreeSet<String>
where
    R: Fields + 'a,
    I: IntoIterator<Item = &'a R>,
{
    records
        .into_iter()
        .filter_map(|record| record.field(field))
        .map(|value| value.to_string())
        .collect()
}
