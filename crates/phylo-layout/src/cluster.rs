// ABOUTME: Cluster (dendrogram) layout with branch-length-proportional distances.
// ABOUTME: Leaves get evenly spaced slots; internal nodes sit at their children's mean.

use std::collections::HashMap;

use phylo_core::{LayoutSettings, NodeId, PhylogeneticTree, TreeNode, VisualNode};

use crate::{DirectionMapper, LayoutError};

/// Direction-agnostic placement of one node
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterNode {
    pub id: NodeId,
    /// Edges from the root
    pub depth: usize,
    /// Sum of branch lengths from the root
    pub distance: f64,
    /// `distance` divided by the deepest distance in the tree, in [0, 1]
    pub normalized: f64,
    /// Pixel offset across the growth axis, in [0, extent]
    pub perpendicular: f64,
    /// Indices (into the output) of the children placed under this node
    pub children: Vec<usize>,
}

/// Lay out `tree` in pre-order, spreading leaves over `perpendicular_extent`
/// pixels.
///
/// A node reached a second time (only possible with cyclic input) is skipped
/// so the walk always terminates.
pub fn cluster(
    tree: &PhylogeneticTree,
    perpendicular_extent: f64,
) -> Result<Vec<ClusterNode>, LayoutError> {
    place(tree, perpendicular_extent).map(|(placed, _)| placed)
}

// Placements plus the tree node each one was built from, index for index.
fn place(
    tree: &PhylogeneticTree,
    perpendicular_extent: f64,
) -> Result<(Vec<ClusterNode>, Vec<&TreeNode>), LayoutError> {
    if !tree.contains(&tree.root_id) {
        return Err(LayoutError::MissingRoot(tree.root_id.clone()));
    }

    // Depth and cumulative distance, root to leaves.
    let mut placed: Vec<ClusterNode> = Vec::with_capacity(tree.len());
    let mut sources: Vec<&TreeNode> = Vec::with_capacity(tree.len());
    let mut index_of: HashMap<&str, usize> = HashMap::with_capacity(tree.len());
    let mut stack: Vec<(&str, Option<usize>)> = vec![(tree.root_id.as_str(), None)];

    while let Some((id, parent)) = stack.pop() {
        if index_of.contains_key(id) {
            tracing::warn!(node = id, "node reached twice during layout; ignoring repeat");
            continue;
        }
        let node = tree.get(id).ok_or_else(|| match parent {
            Some(p) => LayoutError::MissingChild {
                parent: placed[p].id.clone(),
                child: id.to_string(),
            },
            None => LayoutError::MissingRoot(id.to_string()),
        })?;

        let (depth, distance) = match parent {
            Some(p) => (placed[p].depth + 1, placed[p].distance + node.length()),
            None => (0, 0.0),
        };
        let index = placed.len();
        placed.push(ClusterNode {
            id: node.id.clone(),
            depth,
            distance,
            normalized: 0.0,
            perpendicular: 0.0,
            children: Vec::new(),
        });
        sources.push(node);
        index_of.insert(id, index);
        if let Some(p) = parent {
            placed[p].children.push(index);
        }
        // Reversed so the first child pops first and sibling order holds.
        stack.extend(node.child_ids.iter().rev().map(|c| (c.as_str(), Some(index))));
    }

    let max_distance = placed.iter().map(|n| n.distance).fold(0.0, f64::max);
    for node in &mut placed {
        node.normalized = if max_distance > 0.0 {
            node.distance / max_distance
        } else {
            0.0
        };
    }

    // Perpendicular slots: leaves in visiting order, then parents bottom-up.
    let leaf_count = placed.iter().filter(|n| n.children.is_empty()).count();
    let mut slot = 0usize;
    for node in &mut placed {
        if node.children.is_empty() {
            node.perpendicular = leaf_slot(slot, leaf_count, perpendicular_extent);
            slot += 1;
        }
    }
    // Children always come after their parent in pre-order.
    for index in (0..placed.len()).rev() {
        if placed[index].children.is_empty() {
            continue;
        }
        let sum: f64 = placed[index]
            .children
            .iter()
            .map(|&c| placed[c].perpendicular)
            .sum();
        placed[index].perpendicular = sum / placed[index].children.len() as f64;
    }

    tracing::trace!(
        nodes = placed.len(),
        leaves = leaf_count,
        max_distance,
        "cluster layout computed"
    );
    Ok((placed, sources))
}

fn leaf_slot(slot: usize, leaf_count: usize, extent: f64) -> f64 {
    if leaf_count <= 1 {
        extent / 2.0
    } else {
        slot as f64 * extent / (leaf_count - 1) as f64
    }
}

/// Full layout: cluster placement mapped to screen space for the configured
/// direction, canvas and margins. Nodes come back in pre-order.
pub fn compute_layout(
    tree: &PhylogeneticTree,
    settings: &LayoutSettings,
) -> Result<Vec<VisualNode>, LayoutError> {
    let mapper = DirectionMapper::new(settings);
    let (placed, sources) = place(tree, mapper.perpendicular_extent())?;

    Ok(placed
        .into_iter()
        .zip(sources)
        .map(|(p, node)| VisualNode {
            node: node.clone(),
            position: mapper.to_screen(p.normalized, p.perpendicular),
            depth: p.depth,
        })
        .collect())
}
