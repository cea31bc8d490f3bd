// ABOUTME: Maps direction-agnostic (distance, perpendicular) coordinates to screen x/y.
// ABOUTME: Also resolves logical margin roles onto physical canvas sides.

use phylo_core::{LayoutSettings, Margins, Position, TreeDirection};
use serde::Serialize;

/// Margins by physical side of the canvas
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PhysicalMargins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl PhysicalMargins {
    pub fn from_logical(margins: &Margins, direction: TreeDirection) -> Self {
        let Margins {
            root,
            leaf,
            perpendicular_start: start,
            perpendicular_end: end,
        } = *margins;
        match direction {
            TreeDirection::LeftToRight => Self {
                top: start,
                right: leaf,
                bottom: end,
                left: root,
            },
            TreeDirection::RightToLeft => Self {
                top: start,
                right: root,
                bottom: end,
                left: leaf,
            },
            TreeDirection::TopToBottom => Self {
                top: root,
                right: end,
                bottom: leaf,
                left: start,
            },
            TreeDirection::BottomToTop => Self {
                top: leaf,
                right: end,
                bottom: root,
                left: start,
            },
        }
    }
}

/// Usable drawing area: canvas minus margins
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LayoutSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionMapper {
    direction: TreeDirection,
    margins: PhysicalMargins,
    size: LayoutSize,
}

impl DirectionMapper {
    pub fn new(settings: &LayoutSettings) -> Self {
        let margins = PhysicalMargins::from_logical(&settings.margins, settings.direction);
        let size = LayoutSize {
            width: (settings.width - margins.left - margins.right).max(0.0),
            height: (settings.height - margins.top - margins.bottom).max(0.0),
        };
        Self {
            direction: settings.direction,
            margins,
            size,
        }
    }

    pub fn direction(&self) -> TreeDirection {
        self.direction
    }

    pub fn margins(&self) -> PhysicalMargins {
        self.margins
    }

    pub fn layout_size(&self) -> LayoutSize {
        self.size
    }

    /// Pixels available along the growth axis
    pub fn distance_extent(&self) -> f64 {
        if self.direction.is_horizontal() {
            self.size.width
        } else {
            self.size.height
        }
    }

    /// Pixels available across the growth axis
    pub fn perpendicular_extent(&self) -> f64 {
        if self.direction.is_horizontal() {
            self.size.height
        } else {
            self.size.width
        }
    }

    /// Place a node inside the layout area (origin at the area's top-left).
    ///
    /// `normalized` is the node's distance from the root as a fraction of the
    /// deepest distance; `perpendicular` is already in pixels.
    pub fn map_in_layout(
        direction: TreeDirection,
        normalized: f64,
        perpendicular: f64,
        size: LayoutSize,
    ) -> Position {
        match direction {
            TreeDirection::LeftToRight => Position::new(normalized * size.width, perpendicular),
            TreeDirection::RightToLeft => {
                Position::new(size.width - normalized * size.width, perpendicular)
            }
            TreeDirection::TopToBottom => Position::new(perpendicular, normalized * size.height),
            TreeDirection::BottomToTop => {
                Position::new(perpendicular, size.height - normalized * size.height)
            }
        }
    }

    /// Place a node on the canvas
    pub fn to_screen(&self, normalized: f64, perpendicular: f64) -> Position {
        let inner = Self::map_in_layout(self.direction, normalized, perpendicular, self.size);
        Position::new(inner.x + self.margins.left, inner.y + self.margins.top)
    }
}
