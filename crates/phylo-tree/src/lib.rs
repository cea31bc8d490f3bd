// ABOUTME: Tree store for interactive phylogenetic tree editing.
// ABOUTME: Structural edits, invariant validation, sample data, and selection state.

mod sample;
mod selection;
mod store;
mod validate;

pub use sample::sample_tree;
pub use selection::{Selection, SelectionModel};
pub use store::{Attribute, Subscription, TreeChange, TreeEvent, TreeStore};
pub use validate::validate;
