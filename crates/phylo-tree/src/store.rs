// ABOUTME: Canonical tree owner and the only place tree structure is mutated.
// ABOUTME: Supports branch splits, leaf appends, internal inserts, cascading removal.

use std::rc::{Rc, Weak};

use phylo_core::{EditorSettings, NodeId, PhylogeneticTree, TreeError, TreeNode};

use crate::{sample_tree, validate};

/// Which display attribute an attribute edit touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Name,
    BranchLength,
    Color,
    BranchWidth,
}

/// What an applied edit did to the tree
#[derive(Debug, Clone, PartialEq)]
pub enum TreeChange {
    Loaded,
    BranchSplit {
        target: NodeId,
        internal: NodeId,
        leaf: NodeId,
    },
    LeafAppended {
        parent: NodeId,
        leaf: NodeId,
    },
    InternalInserted {
        parent: NodeId,
        child: NodeId,
        internal: NodeId,
    },
    Removed {
        node: NodeId,
        /// Every id deleted, `node` first
        removed: Vec<NodeId>,
    },
    AttributeChanged {
        node: NodeId,
        attribute: Attribute,
    },
}

/// Notification delivered to subscribers after each applied edit
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEvent {
    /// Store version after the edit
    pub version: u64,
    pub change: TreeChange,
}

type Callback = Rc<dyn Fn(&TreeEvent)>;

/// Keeps a subscriber alive. Dropping it unsubscribes.
pub struct Subscription {
    _guard: Callback,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

/// Single owner of the tree.
///
/// Every public edit is total: an unknown id makes it a no-op that returns
/// `false`, never an error. Edits check their preconditions before touching
/// anything, so an edit either fully applies or leaves the tree untouched.
/// Each applied edit bumps `version` and notifies subscribers.
pub struct TreeStore {
    tree: PhylogeneticTree,
    editor: EditorSettings,
    version: u64,
    subscribers: Vec<Weak<dyn Fn(&TreeEvent)>>,
}

impl std::fmt::Debug for TreeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeStore")
            .field("tree", &self.tree)
            .field("editor", &self.editor)
            .field("version", &self.version)
            .field("subscriber_count", &self.subscribers.len())
            .finish()
    }
}

impl Default for TreeStore {
    fn default() -> Self {
        Self::with_sample()
    }
}

impl TreeStore {
    /// Take ownership of `tree` after checking its structure.
    pub fn new(tree: PhylogeneticTree) -> Result<Self, TreeError> {
        validate(&tree)?;
        Ok(Self::from_valid(tree))
    }

    /// Store seeded with the built-in sample tree
    pub fn with_sample() -> Self {
        Self::from_valid(sample_tree())
    }

    pub fn with_editor_settings(mut self, editor: EditorSettings) -> Self {
        self.editor = editor;
        self
    }

    fn from_valid(tree: PhylogeneticTree) -> Self {
        Self {
            tree,
            editor: EditorSettings::default(),
            version: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn tree(&self) -> &PhylogeneticTree {
        &self.tree
    }

    pub fn node(&self, id: &str) -> Option<&TreeNode> {
        self.tree.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tree.contains(id)
    }

    /// Leaf-ness is inferred from an empty child list. Unknown ids are not leaves.
    pub fn is_leaf(&self, id: &str) -> bool {
        self.tree.get(id).is_some_and(TreeNode::is_leaf)
    }

    pub fn root_id(&self) -> &str {
        &self.tree.root_id
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Every id below `id`, in pre-order
    pub fn descendants(&self, id: &str) -> Vec<NodeId> {
        self.tree.descendants(id)
    }

    pub fn leaf_count(&self) -> usize {
        self.tree.leaf_count()
    }

    pub fn editor(&self) -> &EditorSettings {
        &self.editor
    }

    /// Bumped once per applied edit; unchanged by no-ops
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Register a callback invoked after every applied edit.
    pub fn subscribe(&mut self, callback: impl Fn(&TreeEvent) + 'static) -> Subscription {
        let strong: Callback = Rc::new(callback);
        self.subscribers.push(Rc::downgrade(&strong));
        Subscription { _guard: strong }
    }

    /// Replace the whole tree. A structurally broken tree is refused and the
    /// current tree stays in place.
    pub fn load(&mut self, tree: PhylogeneticTree) -> Result<(), TreeError> {
        validate(&tree)?;
        tracing::debug!(tree = %tree.id, nodes = tree.len(), "loading tree");
        self.tree = tree;
        self.commit(TreeChange::Loaded);
        Ok(())
    }

    /// First of `prefix_1`, `prefix_2`, ... not used by any current node.
    pub fn generate_unique_id(&self, prefix: &str) -> NodeId {
        let mut n: u64 = 1;
        loop {
            let candidate = format!("{prefix}_{n}");
            if !self.tree.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Split the branch above `target_id`: a new internal node takes the
    /// target's place, holding the target and a new leaf. Both halves of the
    /// old branch get half its length, as does the new leaf. Splitting above
    /// the root makes the new internal node the root.
    pub fn split_branch(&mut self, target_id: &str) -> bool {
        let Some(target) = self.tree.get(target_id) else {
            tracing::debug!(target_id, "split ignored: unknown node");
            return false;
        };
        let half = target.length() / 2.0;
        let parent_id = target.parent_id.clone();

        let internal_id = self.generate_unique_id(&self.editor.internal_prefix);
        let mut internal = TreeNode::new(internal_id.clone())
            .with_branch_length(half)
            .with_children([target_id]);
        internal.parent_id = parent_id.clone();
        self.tree.nodes.insert(internal_id.clone(), internal);

        // Generated after the internal node is in the map so the two ids can't collide.
        let leaf_id = self.generate_unique_id(&self.editor.leaf_prefix);
        let leaf = TreeNode::new(leaf_id.clone())
            .with_name(self.editor.new_leaf_name.clone())
            .with_branch_length(half)
            .with_parent(internal_id.clone());
        self.tree.nodes.insert(leaf_id.clone(), leaf);

        if let Some(internal) = self.tree.get_mut(&internal_id) {
            internal.child_ids.push(leaf_id.clone());
        }
        if let Some(target) = self.tree.get_mut(target_id) {
            target.parent_id = Some(internal_id.clone());
            target.branch_length = Some(half);
        }
        match parent_id {
            Some(parent_id) => self.replace_child(&parent_id, target_id, &internal_id),
            None => self.tree.root_id = internal_id.clone(),
        }

        tracing::debug!(target_id, %internal_id, %leaf_id, "split branch");
        self.commit(TreeChange::BranchSplit {
            target: target_id.to_string(),
            internal: internal_id,
            leaf: leaf_id,
        });
        true
    }

    /// Add a new leaf under an internal node. Leaves and unknown ids are
    /// left alone; use `split_branch` to grow from a leaf.
    pub fn append_leaf(&mut self, parent_id: &str) -> bool {
        match self.tree.get(parent_id) {
            None => {
                tracing::debug!(parent_id, "append ignored: unknown node");
                return false;
            }
            Some(parent) if parent.is_leaf() => {
                tracing::debug!(parent_id, "append ignored: node is a leaf");
                return false;
            }
            Some(_) => {}
        }

        let leaf_id = self.generate_unique_id(&self.editor.leaf_prefix);
        let leaf = TreeNode::new(leaf_id.clone())
            .with_name(self.editor.new_leaf_name.clone())
            .with_branch_length(self.editor.default_branch_length)
            .with_parent(parent_id);
        self.tree.nodes.insert(leaf_id.clone(), leaf);
        if let Some(parent) = self.tree.get_mut(parent_id) {
            parent.child_ids.push(leaf_id.clone());
        }

        tracing::debug!(parent_id, %leaf_id, "appended leaf");
        self.commit(TreeChange::LeafAppended {
            parent: parent_id.to_string(),
            leaf: leaf_id,
        });
        true
    }

    /// Put a new internal node on the branch between `parent_id` and
    /// `child_id`, halving the branch. Does nothing unless `child_id` is
    /// currently a child of `parent_id`.
    pub fn insert_internal_above(&mut self, parent_id: &str, child_id: &str) -> bool {
        let (Some(parent), Some(child)) = (self.tree.get(parent_id), self.tree.get(child_id)) else {
            tracing::debug!(parent_id, child_id, "insert ignored: unknown node");
            return false;
        };
        if child.parent_id.as_deref() != Some(parent_id) || !parent.child_ids.iter().any(|c| c == child_id) {
            tracing::debug!(parent_id, child_id, "insert ignored: not parent and child");
            return false;
        }
        let half = child.length() / 2.0;

        let internal_id = self.generate_unique_id(&self.editor.internal_prefix);
        let internal = TreeNode::new(internal_id.clone())
            .with_branch_length(half)
            .with_parent(parent_id)
            .with_children([child_id]);
        self.tree.nodes.insert(internal_id.clone(), internal);

        if let Some(child) = self.tree.get_mut(child_id) {
            child.parent_id = Some(internal_id.clone());
            child.branch_length = Some(half);
        }
        self.replace_child(parent_id, child_id, &internal_id);

        tracing::debug!(parent_id, child_id, %internal_id, "inserted internal node");
        self.commit(TreeChange::InternalInserted {
            parent: parent_id.to_string(),
            child: child_id.to_string(),
            internal: internal_id,
        });
        true
    }

    /// Delete `node_id` and its whole subtree. The root cannot be removed.
    ///
    /// Selection state is not touched; callers holding a selection that may
    /// point into the removed subtree must clear it themselves.
    pub fn remove_node(&mut self, node_id: &str) -> bool {
        if node_id == self.tree.root_id {
            tracing::debug!(node_id, "remove ignored: node is the root");
            return false;
        }
        let Some(node) = self.tree.get(node_id) else {
            tracing::debug!(node_id, "remove ignored: unknown node");
            return false;
        };
        let parent_id = node.parent_id.clone();

        let mut removed = vec![node_id.to_string()];
        removed.extend(self.tree.descendants(node_id));

        if let Some(parent) = parent_id.as_deref().and_then(|p| self.tree.get_mut(p)) {
            parent.child_ids.retain(|c| c != node_id);
        }
        for id in &removed {
            self.tree.nodes.remove(id);
        }

        tracing::debug!(node_id, count = removed.len(), "removed subtree");
        self.commit(TreeChange::Removed {
            node: node_id.to_string(),
            removed,
        });
        true
    }

    /// Set or clear the display name. An empty name clears it.
    pub fn update_name(&mut self, node_id: &str, name: Option<String>) -> bool {
        let name = name.filter(|n| !n.is_empty());
        self.update_attribute(node_id, Attribute::Name, |node| node.name = name)
    }

    /// Set or clear the branch length. Negative and non-finite lengths are refused.
    pub fn update_branch_length(&mut self, node_id: &str, length: Option<f64>) -> bool {
        if let Some(value) = length {
            if !value.is_finite() || value < 0.0 {
                tracing::warn!(node_id, value, "refusing invalid branch length");
                return false;
            }
        }
        self.update_attribute(node_id, Attribute::BranchLength, |node| {
            node.branch_length = length
        })
    }

    pub fn update_color(&mut self, node_id: &str, color: Option<String>) -> bool {
        self.update_attribute(node_id, Attribute::Color, |node| node.color = color)
    }

    pub fn update_branch_width(&mut self, node_id: &str, width: Option<f64>) -> bool {
        if let Some(value) = width {
            if !value.is_finite() || value < 0.0 {
                tracing::warn!(node_id, value, "refusing invalid branch width");
                return false;
            }
        }
        self.update_attribute(node_id, Attribute::BranchWidth, |node| {
            node.branch_width = width
        })
    }

    fn update_attribute(
        &mut self,
        node_id: &str,
        attribute: Attribute,
        apply: impl FnOnce(&mut TreeNode),
    ) -> bool {
        let Some(node) = self.tree.get_mut(node_id) else {
            tracing::debug!(node_id, ?attribute, "update ignored: unknown node");
            return false;
        };
        let before = node.clone();
        apply(node);
        if *node == before {
            return false;
        }

        tracing::debug!(node_id, ?attribute, "updated attribute");
        self.commit(TreeChange::AttributeChanged {
            node: node_id.to_string(),
            attribute,
        });
        true
    }

    fn replace_child(&mut self, parent_id: &str, old: &str, new: &str) {
        if let Some(parent) = self.tree.get_mut(parent_id) {
            if let Some(slot) = parent.child_ids.iter_mut().find(|c| *c == old) {
                *slot = new.to_string();
            }
        }
    }

    fn commit(&mut self, change: TreeChange) {
        self.version += 1;

        // Collect live callbacks first, pruning dropped subscriptions.
        self.subscribers.retain(|w| w.strong_count() > 0);
        let callbacks: Vec<Callback> = self.subscribers.iter().filter_map(Weak::upgrade).collect();
        if callbacks.is_empty() {
            return;
        }

        let event = TreeEvent {
            version: self.version,
            change,
        };
        for callback in &callbacks {
            callback(&event);
        }
    }
}
