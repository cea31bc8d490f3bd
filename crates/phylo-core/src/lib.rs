// ABOUTME: Shared types and configuration for phylo-builder.
// ABOUTME: Defines the tree model, layout settings, and config file handling.

pub mod config;
pub mod error;
pub mod model;
pub mod settings;

pub use config::{Config, ConfigError, EditorSettings, LabelSettings};
pub use error::TreeError;
pub use model::{NodeId, PhylogeneticTree, Position, TreeNode, VisualNode};
pub use settings::{LayoutSettings, Margins, ParseDirectionError, SettingsStore, TreeDirection};
