//! Per-view state while a list page is mounted.

use std::sync::Arc;

use tally_core::{Fields, Identify, ListConfig, RecordId, SelectionGranularity};

use crate::engine::{ListQueryEngine, QueryResult};
use crate::query::Query;
use crate::selection::SelectionTracker;
use crate::views::ViewDefinition;

/// Query, selection and last result ids for one mounted view.
///
/// Created empty on mount and dropped on navigation away. Nothing here is
/// persisted.
#[derive(Debug, Clone)]
pub struct ViewSession {
    // -------------------------------------------------------------------------
    // View
    // -------------------------------------------------------------------------
    definition: Arc<ViewDefinition>,
    engine: ListQueryEngine,

    // -------------------------------------------------------------------------
    // Query State
    // -------------------------------------------------------------------------
    query: Query,

    /// Ids on the page shown by the last refresh.
    visible_ids: Vec<RecordId>,

    /// Ids of every row matched by the last refresh.
    matched_ids: Vec<RecordId>,

    // -------------------------------------------------------------------------
    // Selection State
    // -------------------------------------------------------------------------
    selection: SelectionTracker,
    granularity: SelectionGranularity,
}

impl ViewSession {
    /// Mount a view with the list defaults from settings.
    pub fn mount(definition: Arc<ViewDefinition>, lists: &ListConfig) -> Self {
        let mut engine = ListQueryEngine::new();
        for spec in &definition.aggregates {
            engine = engine.with_aggregate(spec.clone());
        }

        let session = Self {
            query: Self::initial_query(&definition, lists),
            engine,
            definition,
            visible_ids: Vec::new(),
            matched_ids: Vec::new(),
            selection: SelectionTracker::new(lists.stale_selection),
            granularity: lists.selection_granularity,
        };
        tracing::debug!("Mounted view: {}", session.definition.id);
        session
    }

    fn initial_query(definition: &ViewDefinition, lists: &ListConfig) -> Query {
        let mut query = Query::new()
            .with_search("", definition.search_fields.iter().cloned())
            .with_page_size(lists.default_page_size);
        if let Some(key) = &definition.default_sort {
            query = query.sorted_by(key.clone(), definition.default_direction);
        }
        query
    }

    pub fn definition(&self) -> &ViewDefinition {
        &self.definition
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Mutable access for form controls. Call [`refresh`](Self::refresh) after.
    pub fn query_mut(&mut self) -> &mut Query {
        &mut self.query
    }

    /// Re-run the query and reconcile the selection with the new result.
    pub fn refresh<'a, R>(&mut self, records: &'a [R]) -> QueryResult<'a, R>
    where
        R: Fields + Identify,
    {
        let result = self.engine.run(records, &self.query);
        self.visible_ids = result.visible_ids();
        self.matched_ids = result.matched_ids();
        self.selection.reconcile(&self.matched_ids);
        result
    }

    /// Ids that "select all" covers under the configured granularity.
    pub fn selectable_ids(&self) -> &[RecordId] {
        match self.granularity {
            SelectionGranularity::Page => &self.visible_ids,
            SelectionGranularity::Filtered => &self.matched_ids,
        }
    }

    pub fn visible_ids(&self) -> &[RecordId] {
        &self.visible_ids
    }

    pub fn matched_ids(&self) -> &[RecordId] {
        &self.matched_ids
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    /// Header checkbox: select the page or the whole filtered result.
    pub fn select_all(&mut self) {
        let ids = match self.granularity {
            SelectionGranularity::Page => &self.visible_ids,
            SelectionGranularity::Filtered => &self.matched_ids,
        };
        self.selection.select_all(ids);
    }

    pub fn select_none(&mut self) {
        self.selection.select_none();
    }

    /// Row checkbox.
    pub fn toggle(&mut self, id: &RecordId, included: bool) {
        self.selection.toggle(id, included);
    }

    pub fn is_all_selected(&self) -> bool {
        self.selection.is_all_selected(self.selectable_ids())
    }

    pub fn is_partially_selected(&self) -> bool {
        self.selection.is_partially_selected(self.selectable_ids())
    }

    /// Reset search, filters and page and drop the selection. The sort stays.
    pub fn clear_filters(&mut self) {
        self.query.clear_filters();
        self.selection.select_none();
        tracing::debug!("Cleared filters on view: {}", self.definition.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AggregateSpec;
    use crate::query::SortDirection;
    use tally_core::{FieldValue, PageSize, Record, StaleSelection};

    fn products() -> Vec<Record> {
        vec![
            Record::new("1")
                .with("name", "Headphones")
                .with("price", 10.0)
                .with("status", FieldValue::tag("active")),
            Record::new("2")
                .with("name", "Smart Watch")
                .with("price", 50.0)
                .with("status", FieldValue::tag("low-stock")),
            Record::new("3")
                .with("name", "Coffee Maker")
                .with("price", 30.0)
                .with("status", FieldValue::tag("active")),
        ]
    }

    fn definition() -> Arc<ViewDefinition> {
        Arc::new(
            ViewDefinition::new("products")
                .searching(["name"])
                .with_facets(["status"])
                .with_aggregate(AggregateSpec::count_by("status"))
                .sorted_by("price", SortDirection::Asc),
        )
    }

    fn lists(granularity: SelectionGranularity, stale: StaleSelection) -> ListConfig {
        ListConfig {
            default_page_size: PageSize::rows(1),
            selection_granularity: granularity,
            stale_selection: stale,
        }
    }

    fn rid(s: &str) -> RecordId {
        RecordId::from(s)
    }

    #[test]
    fn test_mount_applies_defaults() {
        let session = ViewSession::mount(definition(), &ListConfig::default());
        let query = session.query();
        assert_eq!(query.search_fields, vec!["name".to_string()]);
        assert_eq!(query.sort_key.as_deref(), Some("price"));
        assert_eq!(query.page_size, PageSize::rows(10));
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_refresh_reports_aggregates() {
        let records = products();
        let mut session = ViewSession::mount(definition(), &ListConfig::default());
        let result = session.refresh(&records);

        assert_eq!(result.total_matched, 3);
        assert_eq!(result.aggregate("status").unwrap().count_of("active"), 2);
        assert_eq!(session.matched_ids(), &[rid("1"), rid("3"), rid("2")]);
    }

    #[test]
    fn test_select_all_filtered_spans_pages() {
        let records = products();
        let mut session = ViewSession::mount(
            definition(),
            &lists(SelectionGranularity::Filtered, StaleSelection::Retain),
        );
        session.refresh(&records);
        session.select_all();

        assert_eq!(session.selection().len(), 3);
        assert!(session.is_all_selected());
    }

    #[test]
    fn test_select_all_page_only() {
        let records = products();
        let mut session = ViewSession::mount(
            definition(),
            &lists(SelectionGranularity::Page, StaleSelection::Retain),
        );
        session.refresh(&records);
        session.select_all();

        assert_eq!(session.selection().len(), 1);
        assert!(session.selection().contains(&rid("1")));
        assert!(session.is_all_selected());

        session.toggle(&rid("1"), false);
        assert!(!session.is_all_selected());
        assert!(!session.is_partially_selected());
    }

    #[test]
    fn test_selection_survives_disjoint_filter() {
        let records = products();
        let mut session = ViewSession::mount(
            definition(),
            &lists(SelectionGranularity::Filtered, StaleSelection::Retain),
        );
        session.query_mut().toggle_facet("status", "active");
        session.refresh(&records);
        session.select_all();

        session.query_mut().toggle_facet("status", "active");
        session.query_mut().toggle_facet("status", "low-stock");
        session.refresh(&records);

        let selected: Vec<&RecordId> = session.selection().selected().collect();
        assert_eq!(selected, vec![&rid("1"), &rid("3")]);
        assert!(!session.is_partially_selected());
    }

    #[test]
    fn test_prune_policy_drops_filtered_out_ids() {
        let records = products();
        let mut session = ViewSession::mount(
            definition(),
            &lists(SelectionGranularity::Filtered, StaleSelection::Prune),
        );
        session.refresh(&records);
        session.select_all();

        session.query_mut().search_text = "coffee".to_string();
        session.refresh(&records);

        let selected: Vec<&RecordId> = session.selection().selected().collect();
        assert_eq!(selected, vec![&rid("3")]);
        assert!(session.is_all_selected());
    }

    #[test]
    fn test_default_sort_is_not_an_active_filter() {
        let records = products();
        let definition = Arc::new(
            ViewDefinition::new("invoices").sorted_by("price", SortDirection::Desc),
        );
        let mut session = ViewSession::mount(definition, &ListConfig::default());
        assert!(!session.query().has_active_filters());

        session.query_mut().toggle_facet("status", "active");
        assert!(session.query().has_active_filters());

        session.clear_filters();
        assert!(!session.query().has_active_filters());
        assert_eq!(session.query().sort_key.as_deref(), Some("price"));
        assert_eq!(session.query().sort_direction, SortDirection::Desc);

        session.refresh(&records);
        assert_eq!(session.matched_ids(), &[rid("2"), rid("3"), rid("1")]);
    }

    #[test]
    fn test_clear_filters_resets_query_and_selection() {
        let records = products();
        let mut session = ViewSession::mount(definition(), &ListConfig::default());
        session.query_mut().search_text = "watch".to_string();
        session.refresh(&records);
        session.select_all();
        assert!(session.query().has_active_filters());

        session.clear_filters();
        assert!(!session.query().has_active_filters());
        assert!(session.selection().is_empty());
        assert_eq!(session.query().search_fields, vec!["name".to_string()]);
    }
}
