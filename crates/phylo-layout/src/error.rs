// ABOUTME: Fatal layout failures caused by a structurally corrupt tree.
// ABOUTME: Layout aborts instead of drawing a tree with missing pieces.

use phylo_core::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("root node {0:?} not found")]
    MissingRoot(NodeId),

    #[error("node {parent:?} lists child {child:?} which is not in the tree")]
    MissingChild { parent: NodeId, child: NodeId },
}
