// ABOUTME: Single-entity selection (node or branch) targeted by edit panels.
// ABOUTME: Branches are not stored; they are rebuilt from parent/child ids on demand.

use phylo_core::{NodeId, PhylogeneticTree, VisualNode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Selection {
    #[default]
    None,
    Node {
        id: NodeId,
    },
    #[serde(rename_all = "camelCase")]
    Branch {
        parent_id: NodeId,
        child_id: NodeId,
    },
}

impl Selection {
    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }
}

/// Tracks at most one selected node or branch.
///
/// The model never repairs itself: after a removal that might have taken the
/// selected entity with it, the caller is expected to `clear()`.
#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    current: Selection,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &Selection {
        &self.current
    }

    pub fn select_node(&mut self, id: impl Into<NodeId>) {
        self.current = Selection::Node { id: id.into() };
    }

    pub fn select_branch(&mut self, parent_id: impl Into<NodeId>, child_id: impl Into<NodeId>) {
        self.current = Selection::Branch {
            parent_id: parent_id.into(),
            child_id: child_id.into(),
        };
    }

    /// Click behaviour: selecting the already selected node deselects it.
    pub fn toggle_node(&mut self, id: &str) {
        if self.is_node_selected(id) {
            self.clear();
        } else {
            self.select_node(id);
        }
    }

    pub fn clear(&mut self) {
        self.current = Selection::None;
    }

    pub fn is_node_selected(&self, id: &str) -> bool {
        matches!(&self.current, Selection::Node { id: selected } if selected == id)
    }

    pub fn is_branch_selected(&self, parent: &str, child: &str) -> bool {
        matches!(
            &self.current,
            Selection::Branch { parent_id, child_id } if parent_id == parent && child_id == child
        )
    }

    /// Rebuild the branch ending at `child_id` from the current layout by
    /// finding the node whose children include it.
    pub fn resolve_branch(child_id: &str, nodes: &[VisualNode]) -> Option<Selection> {
        nodes
            .iter()
            .find(|n| n.node.child_ids.iter().any(|c| c == child_id))
            .map(|parent| Selection::Branch {
                parent_id: parent.node.id.clone(),
                child_id: child_id.to_string(),
            })
    }

    /// Select the branch above `child_id`. No-op when the child has no parent
    /// in `nodes` (unknown id or the root).
    pub fn select_branch_to(&mut self, child_id: &str, nodes: &[VisualNode]) -> bool {
        match Self::resolve_branch(child_id, nodes) {
            Some(selection) => {
                self.current = selection;
                true
            }
            None => false,
        }
    }

    pub fn selected_node<'a>(&self, nodes: &'a [VisualNode]) -> Option<&'a VisualNode> {
        let Selection::Node { id } = &self.current else {
            return None;
        };
        nodes.iter().find(|n| n.node.id == *id)
    }

    /// The (parent, child) pair of the selected branch, if both are still laid
    /// out and still connected.
    pub fn selected_branch<'a>(
        &self,
        nodes: &'a [VisualNode],
    ) -> Option<(&'a VisualNode, &'a VisualNode)> {
        let Selection::Branch {
            parent_id,
            child_id,
        } = &self.current
        else {
            return None;
        };
        let parent = nodes.iter().find(|n| n.node.id == *parent_id)?;
        if !parent.node.child_ids.contains(child_id) {
            return None;
        }
        let child = nodes.iter().find(|n| n.node.id == *child_id)?;
        Some((parent, child))
    }

    /// Whether the selection refers to something `tree` no longer has.
    /// Reports only; clearing is up to the caller.
    pub fn is_dangling(&self, tree: &PhylogeneticTree) -> bool {
        match &self.current {
            Selection::None => false,
            Selection::Node { id } => !tree.contains(id),
            Selection::Branch {
                parent_id,
                child_id,
            } => !tree
                .get(parent_id)
                .is_some_and(|p| p.child_ids.contains(child_id)),
        }
    }
}
