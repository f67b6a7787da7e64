//! Selection state
//!
//! The ephemeral UI state (current view, active filters, search text) as one
//! explicit, serializable object with a small set of update operations, so
//! the filter engine and graph builder stay pure. The view maps to and from a
//! shareable URL-style path; an unrecognized or empty path lands on the
//! guide, which is the default view.

use serde::{Deserialize, Serialize};

/// The addressable views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", content = "slug", rename_all = "snake_case")]
pub enum View {
    Guide,
    Map,
    Tool(String),
    Objective(String),
}

impl View {
    /// Encode as a shareable path
    pub fn to_path(&self) -> String {
        match self {
            View::Guide => "/guide".to_string(),
            View::Map => "/map".to_string(),
            View::Tool(slug) => format!("/tools/{slug}"),
            View::Objective(slug) => format!("/objectives/{slug}"),
        }
    }

    /// Decode a path; anything unrecognized redirects to the guide
    pub fn from_path(path: &str) -> View {
        let mut parts = path.trim_matches('/').splitn(2, '/');
        match (parts.next().unwrap_or(""), parts.next()) {
            ("map", None) => View::Map,
            ("tools", Some(slug)) if !slug.is_empty() => View::Tool(slug.to_string()),
            ("objectives", Some(slug)) if !slug.is_empty() => View::Objective(slug.to_string()),
            _ => View::Guide,
        }
    }
}

impl Default for View {
    fn default() -> Self {
        View::Guide
    }
}

/// The full selection state passed through the update cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    #[serde(default)]
    pub view: View,
    /// Active filter slugs, insertion-ordered, no duplicates
    #[serde(default)]
    pub active_filters: Vec<String>,
    #[serde(default)]
    pub search_text: String,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter slug; a slug already active is left where it is
    pub fn add_filter(&mut self, slug: &str) {
        if !self.active_filters.iter().any(|s| s == slug) {
            self.active_filters.push(slug.to_string());
        }
    }

    /// Remove a filter slug if active
    pub fn remove_filter(&mut self, slug: &str) {
        self.active_filters.retain(|s| s != slug);
    }

    /// Toggle a filter slug
    pub fn toggle_filter(&mut self, slug: &str) {
        if self.active_filters.iter().any(|s| s == slug) {
            self.remove_filter(slug);
        } else {
            self.add_filter(slug);
        }
    }

    /// Clear search text and all active filters in one call
    pub fn clear(&mut self) {
        self.active_filters.clear();
        self.search_text.clear();
    }

    pub fn set_search(&mut self, text: &str) {
        self.search_text = text.to_string();
    }

    pub fn select(&mut self, view: View) {
        self.view = view;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_round_trip() {
        for view in [
            View::Guide,
            View::Map,
            View::Tool("r_and_d_tax_credits".to_string()),
            View::Objective("boost_rd".to_string()),
        ] {
            assert_eq!(View::from_path(&view.to_path()), view);
        }
    }

    #[test]
    fn test_unknown_path_defaults_to_guide() {
        assert_eq!(View::from_path(""), View::Guide);
        assert_eq!(View::from_path("/"), View::Guide);
        assert_eq!(View::from_path("/nonsense"), View::Guide);
        assert_eq!(View::from_path("/tools/"), View::Guide);
    }

    #[test]
    fn test_add_filter_is_idempotent() {
        let mut state = SelectionState::new();
        state.add_filter("ict");
        state.add_filter("early_stage");
        state.add_filter("ict");
        assert_eq!(state.active_filters, vec!["ict", "early_stage"]);
    }

    #[test]
    fn test_remove_and_toggle() {
        let mut state = SelectionState::new();
        state.toggle_filter("ict");
        assert_eq!(state.active_filters, vec!["ict"]);
        state.toggle_filter("ict");
        assert!(state.active_filters.is_empty());
        state.remove_filter("ict"); // no-op on absent slug
    }

    #[test]
    fn test_clear_resets_search_and_filters() {
        let mut state = SelectionState::new();
        state.add_filter("ict");
        state.set_search("tax");
        state.select(View::Map);
        state.clear();
        assert!(state.active_filters.is_empty());
        assert!(state.search_text.is_empty());
        // The selected view survives a clear.
        assert_eq!(state.view, View::Map);
    }

    #[test]
    fn test_state_serializes() {
        let mut state = SelectionState::new();
        state.select(View::Tool("grants".to_string()));
        state.add_filter("ict");
        let json = serde_json::to_string(&state).unwrap();
        let back: SelectionState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
