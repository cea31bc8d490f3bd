// ABOUTME: Built-in sample tree the editor starts from.
// ABOUTME: A root with two named leaves of unequal branch length.

use phylo_core::{PhylogeneticTree, TreeNode};

pub fn sample_tree() -> PhylogeneticTree {
    PhylogeneticTree::from_nodes(
        "sample-tree",
        "root",
        [
            TreeNode::new("root").with_name("root").with_children(["A", "B"]),
            TreeNode::new("A")
                .with_name("A")
                .with_parent("root")
                .with_branch_length(0.1),
            TreeNode::new("B")
                .with_name("B")
                .with_parent("root")
                .with_branch_length(0.2),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_has_expected_shape() {
        let tree = sample_tree();
        assert_eq!(tree.id, "sample-tree");
        assert_eq!(tree.root_id, "root");
        assert_eq!(tree.len(), 3);

        let root = tree.root().unwrap();
        assert!(!root.is_leaf());
        assert_eq!(root.child_ids, vec!["A", "B"]);

        let a = tree.get("A").unwrap();
        assert!(a.is_leaf());
        assert_eq!(a.parent_id.as_deref(), Some("root"));
        assert_eq!(a.branch_length, Some(0.1));

        let b = tree.get("B").unwrap();
        assert_eq!(b.branch_length, Some(0.2));
    }
}
