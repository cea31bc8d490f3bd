// ABOUTME: Render-ready description of a laid-out tree: node markers, branch paths, labels.
// ABOUTME: Serializable so any front end (SVG, canvas, JSON dump) can draw it.

use phylo_core::{LabelSettings, LayoutSettings, NodeId, Position, TreeDirection, VisualNode};
use serde::Serialize;

use crate::geometry::{self, ElbowPath, LabelPlacement};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeShape {
    pub id: NodeId,
    pub position: Position,
    pub depth: usize,
    pub leaf: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Present only for named nodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelPlacement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchShape {
    /// `None` for the stub in front of the root
    pub parent_id: Option<NodeId>,
    pub child_id: NodeId,
    pub path: String,
    pub width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    /// Present only when the child has a branch length to show
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelPlacement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub direction: TreeDirection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_branch: Option<BranchShape>,
    pub branches: Vec<BranchShape>,
    pub nodes: Vec<NodeShape>,
}

impl Scene {
    /// Build a scene from pre-order `nodes`; the first node is taken as the
    /// root.
    pub fn build(nodes: &[VisualNode], settings: &LayoutSettings, labels: &LabelSettings) -> Self {
        let direction = settings.direction;
        let width_of = |node: &VisualNode| node.node.branch_width.unwrap_or(settings.branch_width);

        let root_branch = nodes.first().map(|root| {
            let (outer, inner) = geometry::root_branch(root.position, direction, settings.root_branch_length);
            let path = if direction.is_horizontal() {
                format!("M{},{}H{}", outer.x, outer.y, inner.x)
            } else {
                format!("M{},{}V{}", outer.x, outer.y, inner.y)
            };
            BranchShape {
                parent_id: None,
                child_id: root.node.id.clone(),
                path,
                width: width_of(root),
                color: root.node.color.clone(),
                length: root.node.branch_length,
                label: None,
            }
        });

        let branches = geometry::branches(nodes)
            .into_iter()
            .map(|(parent, child)| {
                let elbow = ElbowPath::between(parent.position, child.position, direction);
                BranchShape {
                    parent_id: Some(parent.node.id.clone()),
                    child_id: child.node.id.clone(),
                    path: elbow.to_svg(),
                    width: width_of(child),
                    color: child.node.color.clone(),
                    length: child.node.branch_length,
                    label: child
                        .node
                        .branch_length
                        .map(|_| geometry::branch_label(&elbow, direction, labels.branch_label_offset)),
                }
            })
            .collect();

        let nodes = nodes
            .iter()
            .map(|n| NodeShape {
                id: n.node.id.clone(),
                position: n.position,
                depth: n.depth,
                leaf: n.is_leaf(),
                name: n.node.name.clone(),
                label: n
                    .node
                    .name
                    .as_ref()
                    .map(|_| geometry::node_label(n.position, direction, labels.node_label_offset)),
            })
            .collect();

        Self {
            width: settings.width,
            height: settings.height,
            direction,
            root_branch,
            branches,
            nodes,
        }
    }

    pub fn node(&self, id: &str) -> Option<&NodeShape> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn branch(&self, parent: &str, child: &str) -> Option<&BranchShape> {
        self.branches
            .iter()
            .find(|b| b.parent_id.as_deref() == Some(parent) && b.child_id == child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute_layout;
    use crate::geometry::{Baseline, TextAnchor};
    use phylo_tree::TreeStore;

    fn sample_scene(settings: &LayoutSettings) -> Scene {
        let store = TreeStore::with_sample();
        let nodes = compute_layout(store.tree(), settings).unwrap();
        Scene::build(&nodes, settings, &LabelSettings::default())
    }

    #[test]
    fn sample_scene_has_elbows_and_stub() {
        let scene = sample_scene(&LayoutSettings::default());
        assert_eq!(scene.nodes.len(), 3);
        assert_eq!(scene.branches.len(), 2);

        let to_a = scene.branch("root", "A").unwrap();
        assert_eq!(to_a.path, "M40,300V40H400");
        assert_eq!(to_a.width, 2.0);
        assert_eq!(to_a.length, Some(0.1));

        let stub = scene.root_branch.as_ref().unwrap();
        assert_eq!(stub.path, "M20,300H40");
        assert_eq!(stub.parent_id, None);
    }

    #[test]
    fn labels_follow_names_and_lengths() {
        let scene = sample_scene(&LayoutSettings::default());
        let a = scene.node("A").unwrap();
        let label = a.label.unwrap();
        assert_eq!(label.position, Position::new(408.0, 40.0));
        assert_eq!(label.anchor, TextAnchor::Start);

        let to_b = scene.branch("root", "B").unwrap();
        assert_eq!(to_b.label.unwrap().baseline, Baseline::Hanging);
    }

    #[test]
    fn unnamed_nodes_and_lengthless_branches_have_no_labels() {
        let mut store = TreeStore::with_sample();
        store.update_name("A", None);
        store.update_branch_length("A", None);
        let settings = LayoutSettings::default();
        let nodes = compute_layout(store.tree(), &settings).unwrap();
        let scene = Scene::build(&nodes, &settings, &LabelSettings::default());

        assert_eq!(scene.node("A").unwrap().label, None);
        assert_eq!(scene.branch("root", "A").unwrap().label, None);
    }

    #[test]
    fn per_branch_width_and_color_override_defaults() {
        let mut store = TreeStore::with_sample();
        store.update_branch_width("B", Some(5.0));
        store.update_color("B", Some("#ff0000".to_string()));
        let settings = LayoutSettings::default();
        let nodes = compute_layout(store.tree(), &settings).unwrap();
        let scene = Scene::build(&nodes, &settings, &LabelSettings::default());

        let to_b = scene.branch("root", "B").unwrap();
        assert_eq!(to_b.width, 5.0);
        assert_eq!(to_b.color.as_deref(), Some("#ff0000"));
        assert_eq!(scene.branch("root", "A").unwrap().color, None);
    }

    #[test]
    fn vertical_scene_uses_vertical_stub() {
        let settings = LayoutSettings {
            direction: TreeDirection::TopToBottom,
            ..LayoutSettings::default()
        };
        let scene = sample_scene(&settings);
        assert_eq!(scene.root_branch.as_ref().unwrap().path, "M400,20V40");
        assert!(scene.branch("root", "A").unwrap().path.starts_with("M400,40H"));
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(sample_scene(&LayoutSettings::default())).unwrap();
        assert_eq!(json["direction"], "left-to-right");
        assert_eq!(json["rootBranch"]["childId"], "root");
        assert!(json["branches"][0]["parentId"].is_string());
    }
}
