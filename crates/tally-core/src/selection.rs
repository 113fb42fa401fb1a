//! Selection policy types.

use serde::{Deserialize, Serialize};

/// Which rows "select all" refers to.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SelectionGranularity {
    /// Only the rows on the current page.
    Page,
    /// Every row in the filtered result, across all pages.
    #[default]
    Filtered,
}

/// What happens to selected ids that drop out of the filtered result.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StaleSelection {
    /// Keep them selected until explicitly cleared.
    #[default]
    Retain,
    /// Drop them whenever the result is recomputed.
    Prune,
}
