use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// On-disk graph file: a JSON object with `nodes` and `edges` arrays.
/// Node colors are `rgb(...)` strings, the form graph exporters tend to
/// emit for viz attributes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub nodes: Vec<DatasetNode>,
    #[serde(default)]
    pub edges: Vec<DatasetEdge>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetNode {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default = "default_size")]
    pub size: f32,
    #[serde(default = "default_color")]
    pub color: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetEdge {
    pub source: String,
    pub target: String,
}

fn default_size() -> f32 {
    5.0
}

fn default_color() -> String {
    "rgb(128, 128, 128)".to_string()
}

pub fn load(path: &Path) -> Result<Dataset> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading graph file {}", path.display()))?;
    let dataset: Dataset = serde_json::from_str(&contents)
        .with_context(|| format!("parsing graph file {}", path.display()))?;
    tracing::info!(
        nodes = dataset.nodes.len(),
        edges = dataset.edges.len(),
        "loaded graph dataset"
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn loads_a_graph_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "nodes": [
                    {{"id": "a", "label": "Alpha", "x": 1.5, "y": -2.0, "size": 8.0, "color": "rgb(255, 0, 16)"}},
                    {{"id": "b", "label": "Beta"}}
                ],
                "edges": [{{"source": "a", "target": "b"}}]
            }}"#
        )
        .unwrap();

        let dataset = load(file.path()).unwrap();
        assert_eq!(dataset.nodes.len(), 2);
        assert_eq!(dataset.edges.len(), 1);
        assert_eq!(dataset.nodes[0].color, "rgb(255, 0, 16)");

        // Optional fields fall back to defaults.
        let beta = &dataset.nodes[1];
        assert_eq!((beta.x, beta.y, beta.size), (0.0, 0.0, 5.0));
        assert_eq!(beta.color, "rgb(128, 128, 128)");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load(Path::new("/nonexistent/graph.json")).is_err());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(load(file.path()).is_err());
    }
}
