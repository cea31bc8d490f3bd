// ABOUTME: Layout settings for the tree canvas: size, margins, growth direction.
// ABOUTME: SettingsStore versions every change so derived layouts know when to refresh.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Screen axis and sense along which cumulative branch distance grows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TreeDirection {
    /// Root on the left, leaves on the right
    #[default]
    LeftToRight,
    /// Root on the right, leaves on the left
    RightToLeft,
    /// Root at the top, leaves at the bottom
    TopToBottom,
    /// Root at the bottom, leaves at the top
    BottomToTop,
}

impl TreeDirection {
    pub fn all() -> &'static [TreeDirection] {
        &[
            TreeDirection::LeftToRight,
            TreeDirection::RightToLeft,
            TreeDirection::TopToBottom,
            TreeDirection::BottomToTop,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TreeDirection::LeftToRight => "left-to-right",
            TreeDirection::RightToLeft => "right-to-left",
            TreeDirection::TopToBottom => "top-to-bottom",
            TreeDirection::BottomToTop => "bottom-to-top",
        }
    }

    /// Distance runs along x
    pub fn is_horizontal(&self) -> bool {
        matches!(self, TreeDirection::LeftToRight | TreeDirection::RightToLeft)
    }

    /// Unit vector pointing from the root towards the leaves, in screen axes
    pub fn growth(&self) -> (f64, f64) {
        match self {
            TreeDirection::LeftToRight => (1.0, 0.0),
            TreeDirection::RightToLeft => (-1.0, 0.0),
            TreeDirection::TopToBottom => (0.0, 1.0),
            TreeDirection::BottomToTop => (0.0, -1.0),
        }
    }
}

impl fmt::Display for TreeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tree direction: {0} (expected ltr, rtl, ttb, btt or the long form)")]
pub struct ParseDirectionError(pub String);

impl FromStr for TreeDirection {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ltr" | "left-to-right" => Ok(TreeDirection::LeftToRight),
            "rtl" | "right-to-left" => Ok(TreeDirection::RightToLeft),
            "ttb" | "top-to-bottom" => Ok(TreeDirection::TopToBottom),
            "btt" | "bottom-to-top" => Ok(TreeDirection::BottomToTop),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// Margins by logical role. Which physical side each lands on depends on
/// the growth direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    /// Space before the root along the distance axis
    pub root: f64,
    /// Space after the deepest leaf along the distance axis
    pub leaf: f64,
    /// Space before the first leaf across the distance axis
    pub perpendicular_start: f64,
    /// Space after the last leaf across the distance axis
    pub perpendicular_end: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            root: 40.0,
            leaf: 40.0,
            perpendicular_start: 40.0,
            perpendicular_end: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Canvas width in pixels
    pub width: f64,

    /// Canvas height in pixels
    pub height: f64,

    /// Fixed pixel length of the stub drawn before the root
    pub root_branch_length: f64,

    /// Default stroke width for branches without their own width
    pub branch_width: f64,

    pub direction: TreeDirection,

    pub margins: Margins,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            root_branch_length: 20.0,
            branch_width: 2.0,
            direction: TreeDirection::LeftToRight,
            margins: Margins::default(),
        }
    }
}

/// Owner of the live layout settings.
///
/// `version` goes up by one for every setter call that actually changes a
/// value, so caches can compare versions instead of settings.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    settings: LayoutSettings,
    version: u64,
}

impl SettingsStore {
    pub fn new(settings: LayoutSettings) -> Self {
        Self {
            settings,
            version: 0,
        }
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn set_width(&mut self, width: f64) -> bool {
        self.update(|s| s.width = width.max(0.0))
    }

    pub fn set_height(&mut self, height: f64) -> bool {
        self.update(|s| s.height = height.max(0.0))
    }

    pub fn set_root_margin(&mut self, margin: f64) -> bool {
        self.update(|s| s.margins.root = margin.max(0.0))
    }

    pub fn set_leaf_margin(&mut self, margin: f64) -> bool {
        self.update(|s| s.margins.leaf = margin.max(0.0))
    }

    pub fn set_perpendicular_start_margin(&mut self, margin: f64) -> bool {
        self.update(|s| s.margins.perpendicular_start = margin.max(0.0))
    }

    pub fn set_perpendicular_end_margin(&mut self, margin: f64) -> bool {
        self.update(|s| s.margins.perpendicular_end = margin.max(0.0))
    }

    pub fn set_root_branch_length(&mut self, length: f64) -> bool {
        self.update(|s| s.root_branch_length = length.max(0.0))
    }

    pub fn set_branch_width(&mut self, width: f64) -> bool {
        self.update(|s| s.branch_width = width.max(0.0))
    }

    pub fn set_direction(&mut self, direction: TreeDirection) -> bool {
        self.update(|s| s.direction = direction)
    }

    /// Replace every setting at once (e.g. after loading a config file)
    pub fn replace(&mut self, settings: LayoutSettings) -> bool {
        self.update(|s| *s = settings)
    }

    /// Restore the documented defaults
    pub fn reset(&mut self) -> bool {
        self.replace(LayoutSettings::default())
    }

    fn update(&mut self, f: impl FnOnce(&mut LayoutSettings)) -> bool {
        let before = self.settings.clone();
        f(&mut self.settings);
        if self.settings == before {
            return false;
        }
        self.version += 1;
        tracing::debug!(version = self.version, "layout settings changed");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let s = LayoutSettings::default();
        assert_eq!(s.width, 800.0);
        assert_eq!(s.height, 600.0);
        assert_eq!(s.root_branch_length, 20.0);
        assert_eq!(s.direction, TreeDirection::LeftToRight);
        assert_eq!(s.margins, Margins::default());
    }

    #[test]
    fn direction_parses_short_and_long_forms() {
        assert_eq!("ltr".parse::<TreeDirection>(), Ok(TreeDirection::LeftToRight));
        assert_eq!("Right-To-Left".parse::<TreeDirection>(), Ok(TreeDirection::RightToLeft));
        assert_eq!("ttb".parse::<TreeDirection>(), Ok(TreeDirection::TopToBottom));
        assert_eq!("bottom-to-top".parse::<TreeDirection>(), Ok(TreeDirection::BottomToTop));
        assert!("sideways".parse::<TreeDirection>().is_err());
    }

    #[test]
    fn growth_points_from_root_to_leaves() {
        assert_eq!(TreeDirection::LeftToRight.growth(), (1.0, 0.0));
        assert_eq!(TreeDirection::RightToLeft.growth(), (-1.0, 0.0));
        assert_eq!(TreeDirection::TopToBottom.growth(), (0.0, 1.0));
        assert_eq!(TreeDirection::BottomToTop.growth(), (0.0, -1.0));
    }

    #[test]
    fn direction_round_trips_through_display() {
        for direction in TreeDirection::all() {
            assert_eq!(direction.to_string().parse::<TreeDirection>(), Ok(*direction));
        }
    }

    #[test]
    fn setters_bump_version_only_on_change() {
        let mut store = SettingsStore::default();
        assert_eq!(store.version(), 0);

        assert!(store.set_width(1024.0));
        assert_eq!(store.version(), 1);

        assert!(!store.set_width(1024.0));
        assert_eq!(store.version(), 1);

        assert!(store.set_direction(TreeDirection::TopToBottom));
        assert_eq!(store.version(), 2);
    }

    #[test]
    fn negative_sizes_clamp_to_zero() {
        let mut store = SettingsStore::default();
        store.set_height(-10.0);
        store.set_leaf_margin(-5.0);
        assert_eq!(store.settings().height, 0.0);
        assert_eq!(store.settings().margins.leaf, 0.0);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut store = SettingsStore::default();
        store.set_width(100.0);
        store.set_root_branch_length(3.0);
        store.set_direction(TreeDirection::BottomToTop);

        assert!(store.reset());
        assert_eq!(store.settings(), &LayoutSettings::default());
        assert!(!store.reset());
    }
}
