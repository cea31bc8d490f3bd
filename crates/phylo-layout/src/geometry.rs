// ABOUTME: Screen geometry derived from a laid-out tree: elbow branch paths, the root stub,
// ABOUTME: and anchor/baseline placement for node and branch labels.

use std::collections::HashMap;

use phylo_core::{Position, TreeDirection, VisualNode};
use serde::Serialize;

/// Horizontal alignment of a label relative to its anchor point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// Vertical alignment of a label relative to its anchor point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Baseline {
    /// Text sits above the point
    Auto,
    Middle,
    /// Text hangs below the point
    Hanging,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelPlacement {
    pub position: Position,
    pub anchor: TextAnchor,
    pub baseline: Baseline,
}

/// Two-segment orthogonal connector from a parent to a child.
///
/// The first segment runs across the growth axis to the child's
/// perpendicular coordinate, the second runs along it to the child.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElbowPath {
    pub start: Position,
    pub corner: Position,
    pub end: Position,
    #[serde(skip)]
    horizontal: bool,
}

impl ElbowPath {
    pub fn between(parent: Position, child: Position, direction: TreeDirection) -> Self {
        let horizontal = direction.is_horizontal();
        let corner = if horizontal {
            Position::new(parent.x, child.y)
        } else {
            Position::new(child.x, parent.y)
        };
        Self {
            start: parent,
            corner,
            end: child,
            horizontal,
        }
    }

    /// SVG path data, e.g. `M40,300V40H400`
    pub fn to_svg(&self) -> String {
        let Self { start, end, .. } = self;
        if self.horizontal {
            format!("M{},{}V{}H{}", start.x, start.y, end.y, end.x)
        } else {
            format!("M{},{}H{}V{}", start.x, start.y, end.x, end.y)
        }
    }

    /// The segment proportional to the child's branch length
    pub fn distance_segment(&self) -> (Position, Position) {
        (self.corner, self.end)
    }

    pub fn perpendicular_segment(&self) -> (Position, Position) {
        (self.start, self.corner)
    }
}

/// The fixed-length stub drawn behind the root, pointing away from the
/// growth direction. Returns (outer end, root).
pub fn root_branch(root: Position, direction: TreeDirection, length: f64) -> (Position, Position) {
    let (dx, dy) = direction.growth();
    (Position::new(root.x - dx * length, root.y - dy * length), root)
}

/// Label for a branch, centered on the distance segment and pushed off the
/// line towards the side the child branches off to.
pub fn branch_label(path: &ElbowPath, direction: TreeDirection, offset: f64) -> LabelPlacement {
    let (from, to) = path.distance_segment();
    let mid = Position::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0);

    if direction.is_horizontal() {
        if path.end.y <= path.start.y {
            LabelPlacement {
                position: Position::new(mid.x, mid.y - offset),
                anchor: TextAnchor::Middle,
                baseline: Baseline::Auto,
            }
        } else {
            LabelPlacement {
                position: Position::new(mid.x, mid.y + offset),
                anchor: TextAnchor::Middle,
                baseline: Baseline::Hanging,
            }
        }
    } else if path.end.x <= path.start.x {
        LabelPlacement {
            position: Position::new(mid.x - offset, mid.y),
            anchor: TextAnchor::End,
            baseline: Baseline::Middle,
        }
    } else {
        LabelPlacement {
            position: Position::new(mid.x + offset, mid.y),
            anchor: TextAnchor::Start,
            baseline: Baseline::Middle,
        }
    }
}

/// Label for a node, placed past the node in the growth direction.
pub fn node_label(position: Position, direction: TreeDirection, offset: f64) -> LabelPlacement {
    match direction {
        TreeDirection::LeftToRight => LabelPlacement {
            position: Position::new(position.x + offset, position.y),
            anchor: TextAnchor::Start,
            baseline: Baseline::Middle,
        },
        TreeDirection::RightToLeft => LabelPlacement {
            position: Position::new(position.x - offset, position.y),
            anchor: TextAnchor::End,
            baseline: Baseline::Middle,
        },
        TreeDirection::TopToBottom => LabelPlacement {
            position: Position::new(position.x, position.y + offset),
            anchor: TextAnchor::Middle,
            baseline: Baseline::Hanging,
        },
        TreeDirection::BottomToTop => LabelPlacement {
            position: Position::new(position.x, position.y - offset),
            anchor: TextAnchor::Middle,
            baseline: Baseline::Auto,
        },
    }
}

/// Every (parent, child) pair in `nodes`, in the order children appear.
/// Children missing from `nodes` are skipped.
pub fn branches(nodes: &[VisualNode]) -> Vec<(&VisualNode, &VisualNode)> {
    let by_id: HashMap<&str, &VisualNode> = nodes.iter().map(|n| (n.id(), n)).collect();
    nodes
        .iter()
        .flat_map(|parent| {
            parent
                .node
                .child_ids
                .iter()
                .filter_map(|c| by_id.get(c.as_str()).map(|child| (parent, *child)))
                .collect::<Vec<_>>()
        })
        .collect()
}
