// ABOUTME: Turns a phylogenetic tree into screen positions for rendering.
// ABOUTME: Cluster layout, growth-direction mapping, elbow paths, labels, memoization.

mod cache;
mod cluster;
mod direction;
mod error;
pub mod geometry;
mod scene;

pub use cache::LayoutCache;
pub use cluster::{cluster, compute_layout, ClusterNode};
pub use direction::{DirectionMapper, LayoutSize, PhysicalMargins};
pub use error::LayoutError;
pub use scene::{BranchShape, NodeShape, Scene};
