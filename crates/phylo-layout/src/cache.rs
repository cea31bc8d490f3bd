// ABOUTME: Memoizes the last computed layout keyed on tree and settings versions.
// ABOUTME: Recomputes only when either store reports a newer version.

use phylo_core::{LayoutSettings, PhylogeneticTree, VisualNode};

use crate::{compute_layout, LayoutError};

#[derive(Debug, Default)]
pub struct LayoutCache {
    key: Option<(u64, u64)>,
    nodes: Vec<VisualNode>,
    recomputations: u64,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the layout for the given versions, recomputing when they differ
    /// from the cached pair. A failed computation leaves the cache empty.
    pub fn get_or_compute(
        &mut self,
        tree: &PhylogeneticTree,
        tree_version: u64,
        settings: &LayoutSettings,
        settings_version: u64,
    ) -> Result<&[VisualNode], LayoutError> {
        let key = (tree_version, settings_version);
        if self.key == Some(key) {
            tracing::trace!(tree_version, settings_version, "layout cache hit");
        } else {
            self.key = None;
            self.nodes.clear();
            self.nodes = compute_layout(tree, settings)?;
            self.key = Some(key);
            self.recomputations += 1;
            tracing::trace!(
                tree_version,
                settings_version,
                nodes = self.nodes.len(),
                "layout recomputed"
            );
        }
        Ok(&self.nodes)
    }

    /// Last computed nodes, whether or not they are current
    pub fn nodes(&self) -> &[VisualNode] {
        &self.nodes
    }

    pub fn is_fresh(&self, tree_version: u64, settings_version: u64) -> bool {
        self.key == Some((tree_version, settings_version))
    }

    pub fn invalidate(&mut self) {
        self.key = None;
    }

    /// How many times a layout has actually been computed
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}
