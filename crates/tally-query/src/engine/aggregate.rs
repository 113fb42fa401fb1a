//! Grouped count and sum statistics over the filtered rows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tally_core::Fields;

/// Which statistic a view wants computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSpec {
    /// Rows are counted per distinct value of this field.
    pub group_field: String,

    /// Optional numeric field summed per group.
    #[serde(default)]
    pub sum_field: Option<String>,
}

impl AggregateSpec {
    /// Count per group.
    pub fn count_by(group_field: impl Into<String>) -> Self {
        Self {
            group_field: group_field.into(),
            sum_field: None,
        }
    }

    /// Count per group and sum `sum_field`.
    pub fn sum_by(group_field: impl Into<String>, sum_field: impl Into<String>) -> Self {
        Self {
            group_field: group_field.into(),
            sum_field: Some(sum_field.into()),
        }
    }
}

/// Stats for one group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupStats {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sum: Option<f64>,
}

/// Computed statistics for one [`AggregateSpec`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregate {
    pub group_field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sum_field: Option<String>,
    pub groups: BTreeMap<String, GroupStats>,
    /// Rows considered, including those without the group field.
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sum: Option<f64>,
}

impl Aggregate {
    /// Count for one group value, zero if absent.
    pub fn count_of(&self, group: &str) -> usize {
        self.groups.get(group).map_or(0, |g| g.count)
    }

    /// Sum for one group value, if a sum field was configured.
    pub fn sum_of(&self, group: &str) -> Option<f64> {
        self.sum_field.as_ref()?;
        Some(self.groups.get(group).and_then(|g| g.sum).unwrap_or(0.0))
    }
}

/// Count rows per distinct `group_field` value and optionally sum `sum_field`.
///
/// Rows without the group field count toward the totals but no group.
/// Values that do not coerce to a number add nothing to a sum.
pub fn compute_aggregates<'a, R, I>(
    rows: I,
    group_field: &str,
    sum_field: Option<&str>,
) -> Aggregate
where
    R: Fields + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut groups: BTreeMap<String, GroupStats> = BTreeMap::new();
    let mut count = 0;
    let mut sum = sum_field.map(|_| 0.0);

    for row in rows {
        count += 1;
        let amount = sum_field
            .and_then(|field| row.field(field))
            .and_then(|value| value.as_number())
            .unwrap_or(0.0);
        if let Some(total) = sum.as_mut() {
            *total += amount;
        }

        let Some(group) = row.field(group_field) else {
            continue;
        };
        let stats = groups.entry(group.to_string()).or_insert_with(|| GroupStats {
            count: 0,
            sum: sum_field.map(|_| 0.0),
        });
        stats.count += 1;
        if let Some(total) = stats.sum.as_mut() {
            *total += amount;
        }
    }

    tracing::debug!(
        "Aggregated {} rows into {} groups by {}",
        count,
        groups.len(),
        group_field
    );

    Aggregate {
        group_field: group_field.to_string(),
        sum_field: sum_field.map(str::to_string),
        groups,
        count,
        sum,
    }
}
