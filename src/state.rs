use std::collections::HashSet;

use crate::graph::Graph;
use crate::search;

/// The view state driving the display reducers. One instance lives in
/// the view and is handed to the reducers by reference on every draw
/// pass; nothing else holds onto it.
///
/// `hovered_neighbors` is the "emphasized set" and has two producers:
/// the neighbor set of `hovered_node`, or the member set of a color
/// class when a palette swatch is clicked.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub hovered_node: Option<String>,
    pub hovered_neighbors: Option<HashSet<String>>,
    pub search_query: String,

    // Derived from the query. Never both set at once: an exact match
    // selects, anything else suggests.
    pub selected_node: Option<String>,
    pub suggestions: Option<HashSet<String>>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hover a node (recomputing its neighbor set from the graph) or
    /// clear the hover entirely.
    pub fn set_hovered_node(&mut self, graph: &Graph, node: Option<String>) {
        match node {
            Some(id) => {
                self.hovered_neighbors = Some(graph.neighbors(&id));
                self.hovered_node = Some(id);
            }
            None => {
                self.hovered_node = None;
                self.hovered_neighbors = None;
            }
        }
    }

    /// Apply a search query. A single verbatim label match selects that
    /// node and hovers it; any other non-empty query produces a
    /// suggestion set; an empty query resets everything.
    ///
    /// Returns the newly selected node, if any, so the caller can move
    /// the camera to it.
    pub fn set_search_query(&mut self, graph: &Graph, query: &str) -> Option<String> {
        self.search_query = query.to_string();

        if query.is_empty() {
            self.selected_node = None;
            self.suggestions = None;
            self.set_hovered_node(graph, None);
            return None;
        }

        let matches = search::find_matches(&graph.nodes, query);
        if let Some(node) = search::exact_match(&matches, query) {
            let id = node.id.clone();
            self.selected_node = Some(id.clone());
            self.suggestions = None;
            self.set_hovered_node(graph, Some(id.clone()));
            Some(id)
        } else {
            self.selected_node = None;
            self.suggestions = Some(matches.iter().map(|node| node.id.clone()).collect());
            self.set_hovered_node(graph, None);
            None
        }
    }

    /// Emphasize every node of one color class. This reuses the
    /// emphasized set with different semantics than a hover, so any
    /// active node hover is dropped first: a stale hovered node would
    /// otherwise leak into the reducers alongside an unrelated set.
    pub fn set_color_filter(&mut self, graph: &Graph, color: &str) {
        self.hovered_node = None;
        self.hovered_neighbors = Some(
            graph
                .nodes
                .iter()
                .filter(|node| node.color_key == color)
                .map(|node| node.id.clone())
                .collect(),
        );
    }

    pub fn reset_hover(&mut self) {
        self.hovered_node = None;
        self.hovered_neighbors = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dataset, DatasetEdge, DatasetNode};
    use proptest::prelude::*;

    fn dataset_node(id: &str, label: &str, color: &str) -> DatasetNode {
        DatasetNode {
            id: id.to_string(),
            label: label.to_string(),
            x: 0.0,
            y: 0.0,
            size: 5.0,
            color: color.to_string(),
        }
    }

    fn city_graph() -> Graph {
        Graph::from_dataset(&Dataset {
            nodes: vec![
                dataset_node("a", "Paris", "rgb(255,0,0)"),
                dataset_node("b", "Paris Hilton", "rgb(0,255,0)"),
                dataset_node("c", "Berlin", "rgb(255,0,0)"),
                dataset_node("d", "Madrid", "rgb(0,0,255)"),
            ],
            edges: vec![
                DatasetEdge {
                    source: "a".to_string(),
                    target: "c".to_string(),
                },
                DatasetEdge {
                    source: "d".to_string(),
                    target: "a".to_string(),
                },
            ],
        })
    }

    #[test]
    fn hovering_computes_the_neighbor_set() {
        let graph = city_graph();
        let mut state = ViewState::new();

        state.set_hovered_node(&graph, Some("a".to_string()));
        assert_eq!(state.hovered_node.as_deref(), Some("a"));
        let neighbors = state.hovered_neighbors.as_ref().unwrap();
        assert_eq!(neighbors.len(), 2);
        assert!(neighbors.contains("c"));
        assert!(neighbors.contains("d"));

        state.set_hovered_node(&graph, None);
        assert!(state.hovered_node.is_none());
        assert!(state.hovered_neighbors.is_none());
    }

    #[test]
    fn ambiguous_query_suggests_without_selecting() {
        let graph = city_graph();
        let mut state = ViewState::new();

        // Two substring matches, and the one verbatim label does not
        // make it exact while its sibling also matches.
        let centered = state.set_search_query(&graph, "Paris");
        assert!(centered.is_none());
        assert!(state.selected_node.is_none());
        let suggestions = state.suggestions.as_ref().unwrap();
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions.contains("a") && suggestions.contains("b"));
        assert!(state.hovered_node.is_none());
    }

    #[test]
    fn unique_verbatim_match_selects_and_hovers() {
        let graph = city_graph();
        let mut state = ViewState::new();

        let centered = state.set_search_query(&graph, "Paris Hilton");
        assert_eq!(centered.as_deref(), Some("b"));
        assert_eq!(state.selected_node.as_deref(), Some("b"));
        assert!(state.suggestions.is_none());
        assert_eq!(state.hovered_node.as_deref(), Some("b"));
        assert_eq!(state.hovered_neighbors, Some(HashSet::new()));
    }

    #[test]
    fn no_match_leaves_an_empty_suggestion_set() {
        let graph = city_graph();
        let mut state = ViewState::new();

        state.set_search_query(&graph, "zzz");
        assert_eq!(state.suggestions, Some(HashSet::new()));
        assert!(state.selected_node.is_none());
    }

    #[test]
    fn empty_query_resets_regardless_of_prior_state() {
        let graph = city_graph();
        let mut state = ViewState::new();

        state.set_search_query(&graph, "Paris Hilton");
        state.set_search_query(&graph, "");
        assert!(state.selected_node.is_none());
        assert!(state.suggestions.is_none());
        assert!(state.hovered_node.is_none());
        assert!(state.hovered_neighbors.is_none());
        assert_eq!(state.search_query, "");

        // Idempotent on an already-clean state.
        state.set_search_query(&graph, "");
        assert!(state.selected_node.is_none());
        assert!(state.suggestions.is_none());
    }

    #[test]
    fn color_filter_emphasizes_the_class_and_drops_the_hover() {
        let graph = city_graph();
        let mut state = ViewState::new();

        state.set_hovered_node(&graph, Some("d".to_string()));
        state.set_color_filter(&graph, "rgb(255,0,0)");

        assert!(state.hovered_node.is_none());
        let members = state.hovered_neighbors.as_ref().unwrap();
        assert_eq!(members.len(), 2);
        assert!(members.contains("a") && members.contains("c"));
    }

    proptest! {
        #[test]
        fn selection_and_suggestions_stay_mutually_exclusive(
            queries in proptest::collection::vec("[a-zA-Z ]{0,12}", 1..8)
        ) {
            let graph = city_graph();
            let mut state = ViewState::new();
            for query in &queries {
                state.set_search_query(&graph, query);
                prop_assert!(
                    state.selected_node.is_none() || state.suggestions.is_none()
                );
            }
        }
    }
}
