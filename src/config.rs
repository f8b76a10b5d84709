use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Last graph file that loaded successfully; used when the app is
    /// started without an argument.
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,
    /// Minimum rendered node size (world size * zoom) at which labels
    /// are drawn.
    #[serde(default = "default_label_threshold")]
    pub label_threshold: f32,
}

fn default_label_threshold() -> f32 {
    6.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: None,
            label_threshold: default_label_threshold(),
        }
    }
}

impl Config {
    pub fn load() -> Option<Self> {
        let path = Self::config_path()?;
        let contents = fs::read_to_string(&path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    pub fn save(&self) -> Option<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok()?;
        }
        let contents = serde_json::to_string_pretty(self).ok()?;
        fs::write(&path, &contents).ok()
    }

    pub fn remember_dataset(&mut self, path: &Path) {
        self.dataset_path = Some(path.to_path_buf());
        let _ = self.save();
    }

    pub fn set_label_threshold(&mut self, threshold: f32) {
        self.label_threshold = threshold;
        let _ = self.save();
    }

    fn config_path() -> Option<PathBuf> {
        let dirs = ProjectDirs::from("", "", "skein")?;
        Some(dirs.config_dir().join("settings.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let config = Config {
            dataset_path: Some(PathBuf::from("/tmp/graph.json")),
            label_threshold: 12.0,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.dataset_path, config.dataset_path);
        assert_eq!(back.label_threshold, 12.0);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert!(config.dataset_path.is_none());
        assert_eq!(config.label_threshold, default_label_threshold());
    }
}
