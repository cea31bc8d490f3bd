// ABOUTME: Pointer and panel events a front end forwards to the editing session.
// ABOUTME: Translation into store and selection calls lives on Session::handle.

use phylo_core::NodeId;

/// What the pointer was over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Node(NodeId),
    Branch { parent: NodeId, child: NodeId },
    Background,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// `modified` is set when the platform's edit modifier (shift) is held
    Click { target: Target, modified: bool },
    DoubleClick(NodeId),
    /// Panel "remove" button: deletes the selected node, or the child end of
    /// the selected branch
    RemoveSelected,
    /// Panel "split" button on a selected branch
    InsertAboveSelected,
}

impl InputEvent {
    pub fn click(target: Target) -> Self {
        InputEvent::Click {
            target,
            modified: false,
        }
    }

    pub fn modified_click(target: Target) -> Self {
        InputEvent::Click {
            target,
            modified: true,
        }
    }
}
