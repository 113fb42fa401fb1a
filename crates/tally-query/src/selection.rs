//! Selected record ids for bulk actions.

use std::collections::BTreeSet;

use tally_core::{RecordId, StaleSelection};

/// Tracks which records are selected while the query changes underneath.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    selected: BTreeSet<RecordId>,
    stale: StaleSelection,
}

impl SelectionTracker {
    /// Create an empty tracker with the given stale-id policy.
    pub fn new(stale: StaleSelection) -> Self {
        Self {
            selected: BTreeSet::new(),
            stale,
        }
    }

    /// Replace the selection with exactly these ids.
    pub fn select_all<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a RecordId>,
    {
        self.selected = ids.into_iter().cloned().collect();
    }

    /// Clear the selection.
    pub fn select_none(&mut self) {
        self.selected.clear();
    }

    /// Add or remove one id.
    pub fn toggle(&mut self, id: &RecordId, included: bool) {
        if included {
            self.selected.insert(id.clone());
        } else {
            self.selected.remove(id);
        }
    }

    /// True when the selection is non-empty and equals `ids` exactly.
    pub fn is_all_selected(&self, ids: &[RecordId]) -> bool {
        if self.selected.is_empty() {
            return false;
        }
        let current: BTreeSet<&RecordId> = ids.iter().collect();
        current.len() == self.selected.len() && self.selected.iter().all(|id| current.contains(id))
    }

    /// True when the selection overlaps `ids` without equalling them.
    ///
    /// Drives the indeterminate state of a header checkbox.
    pub fn is_partially_selected(&self, ids: &[RecordId]) -> bool {
        ids.iter().any(|id| self.selected.contains(id)) && !self.is_all_selected(ids)
    }

    /// Apply the stale-id policy after the result set changes.
    pub fn reconcile(&mut self, ids: &[RecordId]) {
        if self.stale == StaleSelection::Retain {
            return;
        }
        let current: BTreeSet<&RecordId> = ids.iter().collect();
        let before = self.selected.len();
        self.selected.retain(|id| current.contains(id));
        let pruned = before - self.selected.len();
        if pruned > 0 {
            tracing::debug!("Pruned {} stale selections", pruned);
        }
    }

    /// Whether an id is selected.
    pub fn contains(&self, id: &RecordId) -> bool {
        self.selected.contains(id)
    }

    /// Selected ids in sorted order.
    pub fn selected(&self) -> impl Iterator<Item = &RecordId> {
        self.selected.iter()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn stale_policy(&self) -> StaleSelection {
        self.stale
    }
}
