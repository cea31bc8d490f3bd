// ABOUTME: Structural corruption errors for trees supplied from outside the store.
// ABOUTME: Raised only at construction/load time; edits on bad ids are silent no-ops.

use crate::NodeId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeError {
    #[error("root node {0:?} not found")]
    MissingRoot(NodeId),

    #[error("root node {root:?} has parent {parent:?}")]
    RootHasParent { root: NodeId, parent: NodeId },

    #[error("node map key {key:?} holds node with id {id:?}")]
    KeyMismatch { key: NodeId, id: NodeId },

    #[error("node {node:?} has no parent but is not the root")]
    Orphan { node: NodeId },

    #[error("node {node:?} refers to missing parent {parent:?}")]
    MissingParent { node: NodeId, parent: NodeId },

    #[error("node {node:?} lists missing child {child:?}")]
    MissingChild { node: NodeId, child: NodeId },

    #[error("node {child:?} appears {count} times in the children of {parent:?}")]
    ChildListedTwice {
        parent: NodeId,
        child: NodeId,
        count: usize,
    },

    #[error("node {node:?} names {parent:?} as parent but is not among its children")]
    NotListed { node: NodeId, parent: NodeId },

    #[error("node {child:?} is listed under {listed_under:?} but its parent is {parent:?}")]
    ParentMismatch {
        child: NodeId,
        parent: Option<NodeId>,
        listed_under: NodeId,
    },

    #[error("node {0:?} is not reachable from the root")]
    Unreachable(NodeId),

    #[error("node {node:?} has invalid branch length {length}")]
    InvalidBranchLength { node: NodeId, length: f64 },
}
