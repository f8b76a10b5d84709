//! Per-entity display overrides.
//!
//! The draw pass starts every node and edge from its base attributes
//! and runs them through one of these reducers with the current view
//! state. The reducers are pure: they never touch the graph or the
//! state, so the same inputs always produce the same attributes.

use iced::Color;

use crate::state::ViewState;

/// Renderer-visible attributes of a node or edge.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayAttrs {
    pub color: Color,
    pub size: f32,
    pub label: Option<String>,
    pub hidden: bool,
    pub highlighted: bool,
}

/// Node display rules:
/// 1. a hover (or color filter) hides every node that is neither the
///    hovered node nor in the emphasized set;
/// 2. the selected node is highlighted;
/// 3. otherwise an active suggestion set hides every non-member.
///
/// Rules 1 and 3 stack: either alone is enough to hide a node.
pub fn node_reducer(node: &str, base: &DisplayAttrs, state: &ViewState) -> DisplayAttrs {
    let mut attrs = base.clone();

    if let Some(neighbors) = &state.hovered_neighbors {
        if !neighbors.contains(node) && state.hovered_node.as_deref() != Some(node) {
            attrs.hidden = true;
        }
    }

    if state.selected_node.as_deref() == Some(node) {
        attrs.highlighted = true;
    } else if let Some(suggestions) = &state.suggestions {
        if !suggestions.contains(node) {
            attrs.hidden = true;
        }
    }

    attrs
}

/// Edge display rules: hidden unless it touches the hovered node (when
/// there is one), and hidden unless both endpoints are suggestions
/// (when there are any).
pub fn edge_reducer(
    source: &str,
    target: &str,
    base: &DisplayAttrs,
    state: &ViewState,
) -> DisplayAttrs {
    let mut attrs = base.clone();

    if let Some(hovered) = state.hovered_node.as_deref() {
        if source != hovered && target != hovered {
            attrs.hidden = true;
        }
    }

    if let Some(suggestions) = &state.suggestions {
        if !suggestions.contains(source) || !suggestions.contains(target) {
            attrs.hidden = true;
        }
    }

    attrs
}
