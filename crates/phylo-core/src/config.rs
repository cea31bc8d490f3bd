// ABOUTME: Application configuration handling.
// ABOUTME: Loads and saves layout, editor, and label settings from TOML config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::LayoutSettings;

/// Defaults used by structural edits that create nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Display name given to freshly created leaves
    pub new_leaf_name: String,
    /// Branch length of leaves added with append
    pub default_branch_length: f64,
    /// Id prefix for generated internal nodes (`internal_1`, ...)
    pub internal_prefix: String,
    /// Id prefix for generated leaves (`leaf_1`, ...)
    pub leaf_prefix: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            new_leaf_name: "new node".to_string(),
            default_branch_length: 1.0,
            internal_prefix: "internal".to_string(),
            leaf_prefix: "leaf".to_string(),
        }
    }
}

/// Pixel offsets keeping labels clear of nodes and branch lines
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSettings {
    pub node_label_offset: f64,
    pub branch_label_offset: f64,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            node_label_offset: 8.0,
            branch_label_offset: 4.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Canvas size, margins and growth direction
    pub layout: LayoutSettings,

    /// Naming and length defaults for new nodes
    pub editor: EditorSettings,

    pub labels: LabelSettings,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,
}

impl Config {
    /// Get the default config file path (~/.config/phylo-builder/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("phylo-builder").join("config.toml"))
    }

    /// Load config from a path
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from default path, or return default config if not found
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Ignoring config at {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Save config to a path
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = self.to_toml()?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save config to default path
    pub fn save_to_default(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::default_path().ok_or(ConfigError::NoConfigDir)?;
        self.save(&path)?;
        Ok(path)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
