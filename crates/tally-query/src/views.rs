//! View Registry.
//!
//! This module provides:
//! - `ViewDefinition` - A list page: searchable fields, facets, stats and access gate
//! - `ViewRegistry` - Storage for registered views

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tally_core::{AccessRequirement, ListConfig, Principal, QueryError};

use crate::engine::AggregateSpec;
use crate::query::SortDirection;
use crate::session::ViewSession;

/// A registered list view.
///
/// Describes how one list page queries its records. The records themselves
/// are supplied per refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewDefinition {
    /// Unique identifier for the view.
    pub id: String,

    /// Optional title displayed in the view header.
    #[serde(default)]
    pub title: Option<String>,

    /// Fields the search box matches against.
    #[serde(default)]
    pub search_fields: Vec<String>,

    /// Fields offered as facet pickers.
    #[serde(default)]
    pub facet_fields: Vec<String>,

    /// Statistics shown above the list.
    #[serde(default)]
    pub aggregates: Vec<AggregateSpec>,

    /// Sort applied when the view mounts.
    #[serde(default)]
    pub default_sort: Option<String>,

    #[serde(default)]
    pub default_direction: SortDirection,

    /// Who may open the view.
    #[serde(default)]
    pub required: AccessRequirement,
}

impl ViewDefinition {
    /// Create a view with no search, facets or stats.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            search_fields: Vec::new(),
            facet_fields: Vec::new(),
            aggregates: Vec::new(),
            default_sort: None,
            default_direction: SortDirection::Asc,
            required: AccessRequirement::OPEN,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn searching<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_facets<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facet_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_aggregate(mut self, spec: AggregateSpec) -> Self {
        self.aggregates.push(spec);
        self
    }

    pub fn sorted_by(mut self, key: impl Into<String>, direction: SortDirection) -> Self {
        self.default_sort = Some(key.into());
        self.default_direction = direction;
        self
    }

    pub fn requiring(mut self, required: AccessRequirement) -> Self {
        self.required = required;
        self
    }
}

/// Registry for storing view definitions.
///
/// Views are registered once at startup and looked up by ID when a page
/// mounts. Safe to share across threads.
pub struct ViewRegistry {
    /// Registered views by ID.
    views: RwLock<HashMap<String, Arc<ViewDefinition>>>,
}

impl ViewRegistry {
    /// Create a new empty view registry.
    pub fn new() -> Self {
        Self {
            views: RwLock::new(HashMap::new()),
        }
    }

    /// Register a view definition.
    ///
    /// Returns an error if a view with the same ID already exists.
    pub fn add(&self, view: ViewDefinition) -> Result<(), ViewRegistryError> {
        let mut views = self.views.write();
        if views.contains_key(&view.id) {
            return Err(ViewRegistryError::ViewAlreadyExists(view.id));
        }
        let id = view.id.clone();
        views.insert(id.clone(), Arc::new(view));
        tracing::info!("Registered view: {}", id);
        Ok(())
    }

    /// Get a view definition by ID.
    pub fn get(&self, id: &str) -> Option<Arc<ViewDefinition>> {
        self.views.read().get(id).cloned()
    }

    /// List all registered view IDs, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.views.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Check if a view with the given ID exists.
    pub fn exists(&self, id: &str) -> bool {
        self.views.read().contains_key(id)
    }

    /// Get the count of registered views.
    pub fn count(&self) -> usize {
        self.views.read().len()
    }

    /// IDs of the views a principal may open, sorted.
    pub fn visible_to(&self, principal: &Principal) -> Vec<String> {
        let views = self.views.read();
        let mut ids: Vec<String> = views
            .values()
            .filter(|view| view.required.permits(principal))
            .map(|view| view.id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Start a session on a registered view.
    pub fn mount(&self, id: &str, lists: &ListConfig) -> Result<ViewSession, QueryError> {
        let definition = self
            .get(id)
            .ok_or_else(|| QueryError::UnknownView(id.to_string()))?;
        Ok(ViewSession::mount(definition, lists))
    }
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur during view registry operations.
#[derive(Debug, thiserror::Error)]
pub enum ViewRegistryError {
    #[error("View '{0}' already exists")]
    ViewAlreadyExists(String),
}
