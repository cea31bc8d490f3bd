// ABOUTME: Rooted phylogenetic tree model shared by the store and layout engine.
// ABOUTME: Nodes live in an id-keyed map; parent links are lookup keys, not owners.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Stable string identifier of a node within one tree.
pub type NodeId = String;

/// One taxon or ancestral split.
///
/// `child_ids` order is significant: it decides sibling order in the layout.
/// A node with no children is a leaf; there is no separate leaf flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Distance to the parent. Absent (or zero) for the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    #[serde(default)]
    pub child_ids: Vec<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_width: Option<f64>,
}

impl TreeNode {
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            branch_length: None,
            parent_id: None,
            child_ids: Vec::new(),
            color: None,
            branch_width: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_branch_length(mut self, length: f64) -> Self {
        self.branch_length = Some(length);
        self
    }

    pub fn with_parent(mut self, parent: impl Into<NodeId>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }

    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<NodeId>,
    {
        self.child_ids = children.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.child_ids.is_empty()
    }

    /// Branch length with absent treated as zero
    pub fn length(&self) -> f64 {
        self.branch_length.unwrap_or(0.0)
    }
}

/// The tree aggregate: an arena of nodes keyed by id plus the root id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhylogeneticTree {
    pub id: String,
    pub nodes: HashMap<NodeId, TreeNode>,
    pub root_id: NodeId,
}

impl PhylogeneticTree {
    /// Build a tree from a list of nodes. No validation happens here; see
    /// `phylo_tree::validate` for the structural checks.
    pub fn from_nodes(
        id: impl Into<String>,
        root_id: impl Into<NodeId>,
        nodes: impl IntoIterator<Item = TreeNode>,
    ) -> Self {
        Self {
            id: id.into(),
            root_id: root_id.into(),
            nodes: nodes.into_iter().map(|n| (n.id.clone(), n)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut TreeNode> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.nodes.get(&self.root_id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids of every node below `id` (not including `id`), in pre-order.
    /// Ids that are already on the output are skipped so malformed cyclic
    /// input cannot loop forever.
    pub fn descendants(&self, id: &str) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = Vec::new();
        let Some(start) = self.nodes.get(id) else {
            return out;
        };
        let mut seen: HashSet<&str> = HashSet::from([id]);
        let mut stack: Vec<&str> = start.child_ids.iter().rev().map(String::as_str).collect();
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            out.push(current.to_string());
            if let Some(node) = self.nodes.get(current) {
                stack.extend(node.child_ids.iter().rev().map(String::as_str));
            }
        }
        out
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.values().filter(|n| n.is_leaf()).count()
    }
}

/// Screen-space point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A tree node annotated with its computed position and topological depth.
///
/// Produced wholesale by the layout engine; never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualNode {
    #[serde(flatten)]
    pub node: TreeNode,
    pub position: Position,
    pub depth: usize,
}

impl VisualNode {
    pub fn id(&self) -> &str {
        &self.node.id
    }

    pub fn is_leaf(&self) -> bool {
        self.node.is_leaf()
    }
}
