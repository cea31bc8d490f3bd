// ABOUTME: Structural checks for trees handed to the store from outside.
// ABOUTME: Verifies root, parent/child agreement, reachability, and branch lengths.

use std::collections::HashSet;

use phylo_core::{PhylogeneticTree, TreeError};

/// Check every structural invariant of `tree`, returning the first violation.
///
/// Nodes are visited in id order so the reported error is stable.
pub fn validate(tree: &PhylogeneticTree) -> Result<(), TreeError> {
    let root = tree
        .root()
        .ok_or_else(|| TreeError::MissingRoot(tree.root_id.clone()))?;
    if let Some(parent) = &root.parent_id {
        return Err(TreeError::RootHasParent {
            root: root.id.clone(),
            parent: parent.clone(),
        });
    }

    let mut keys: Vec<&String> = tree.nodes.keys().collect();
    keys.sort();

    for key in keys {
        let node = &tree.nodes[key];
        if &node.id != key {
            return Err(TreeError::KeyMismatch {
                key: key.clone(),
                id: node.id.clone(),
            });
        }

        if let Some(length) = node.branch_length {
            if !length.is_finite() || length < 0.0 {
                return Err(TreeError::InvalidBranchLength {
                    node: node.id.clone(),
                    length,
                });
            }
        }

        match &node.parent_id {
            None if node.id != tree.root_id => {
                return Err(TreeError::Orphan {
                    node: node.id.clone(),
                });
            }
            None => {}
            Some(parent_id) => {
                let parent = tree.get(parent_id).ok_or_else(|| TreeError::MissingParent {
                    node: node.id.clone(),
                    parent: parent_id.clone(),
                })?;
                let count = parent.child_ids.iter().filter(|c| **c == node.id).count();
                if count == 0 {
                    return Err(TreeError::NotListed {
                        node: node.id.clone(),
                        parent: parent_id.clone(),
                    });
                }
                if count > 1 {
                    return Err(TreeError::ChildListedTwice {
                        parent: parent_id.clone(),
                        child: node.id.clone(),
                        count,
                    });
                }
            }
        }

        for child_id in &node.child_ids {
            let child = tree.get(child_id).ok_or_else(|| TreeError::MissingChild {
                node: node.id.clone(),
                child: child_id.clone(),
            })?;
            if child.parent_id.as_deref() != Some(node.id.as_str()) {
                return Err(TreeError::ParentMismatch {
                    child: child_id.clone(),
                    parent: child.parent_id.clone(),
                    listed_under: node.id.clone(),
                });
            }
        }
    }

    // Parent links agree with child lists at this point, so anything the
    // walk from the root misses sits on a detached cycle.
    let mut reached: HashSet<&str> = HashSet::new();
    let mut stack = vec![tree.root_id.as_str()];
    while let Some(id) = stack.pop() {
        if !reached.insert(id) {
            continue;
        }
        if let Some(node) = tree.get(id) {
            stack.extend(node.child_ids.iter().map(String::as_str));
        }
    }
    if reached.len() != tree.len() {
        let mut missing: Vec<&String> = tree
            .nodes
            .keys()
            .filter(|k| !reached.contains(k.as_str()))
            .collect();
        missing.sort();
        if let Some(first) = missing.first() {
            return Err(TreeError::Unreachable((*first).clone()));
        }
    }

    Ok(())
}
