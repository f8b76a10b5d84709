use iced::{Color, Point};
use std::collections::{HashMap, HashSet};

use crate::color;
use crate::dataset::Dataset;

/// A rendered graph node. Position, size and color come straight from
/// the dataset; `color_key` keeps the raw color string so nodes can be
/// grouped into color classes without re-parsing.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub position: Point,
    pub size: f32,
    pub color: Color,
    pub color_key: String,
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

/// The loaded graph. Nodes keep dataset order, which makes search
/// results and the color palette stable across runs.
#[derive(Debug, Default)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    index: HashMap<String, usize>,
}

impl Graph {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut nodes = Vec::with_capacity(dataset.nodes.len());
        let mut index = HashMap::new();

        for entry in &dataset.nodes {
            if index.contains_key(&entry.id) {
                tracing::warn!(id = %entry.id, "duplicate node id, keeping the first");
                continue;
            }
            index.insert(entry.id.clone(), nodes.len());
            let hex = color::rgb_str_to_hex(&entry.color);
            nodes.push(Node {
                id: entry.id.clone(),
                label: entry.label.clone(),
                position: Point::new(entry.x, entry.y),
                size: entry.size,
                color: color::hex_to_color(&hex),
                color_key: entry.color.clone(),
            });
        }

        let mut edges = Vec::with_capacity(dataset.edges.len());
        for entry in &dataset.edges {
            if index.contains_key(&entry.source) && index.contains_key(&entry.target) {
                edges.push(Edge {
                    source: entry.source.clone(),
                    target: entry.target.clone(),
                });
            } else {
                tracing::warn!(
                    source = %entry.source,
                    target = %entry.target,
                    "edge references a missing node, dropped"
                );
            }
        }

        Self { nodes, edges, index }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Neighbor set of a node, recomputed from the edge list on every
    /// call. Self-loops do not make a node its own neighbor.
    pub fn neighbors(&self, id: &str) -> HashSet<String> {
        let mut neighbors = HashSet::new();
        for edge in &self.edges {
            if edge.source == id && edge.target != id {
                neighbors.insert(edge.target.clone());
            } else if edge.target == id && edge.source != id {
                neighbors.insert(edge.source.clone());
            }
        }
        neighbors
    }

    /// Distinct node color strings, in first-seen node order. Built once
    /// at load time; the swatch bar indexes into this.
    pub fn palette(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut palette = Vec::new();
        for node in &self.nodes {
            if seen.insert(node.color_key.clone()) {
                palette.push(node.color_key.clone());
            }
        }
        palette
    }
}
