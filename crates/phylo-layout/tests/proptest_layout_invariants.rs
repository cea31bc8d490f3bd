//! Property-based invariant tests for the layout engine.
//!
//! Trees are grown from the sample tree by random store edits, then laid
//! out in every direction. The following must hold:
//!
//! 1. Layout is deterministic.
//! 2. Every node lands inside the canvas margins.
//! 3. Normalized distances stay in [0, 1] and the deepest node reaches 1
//!    whenever any branch length is positive.
//! 4. A child's depth is its parent's depth plus one.
//! 5. Every node of the tree appears exactly once.

use std::collections::{HashMap, HashSet};

use phylo_core::{LayoutSettings, Margins, TreeDirection};
use phylo_layout::{cluster, compute_layout, DirectionMapper};
use phylo_tree::TreeStore;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Grow {
    Split(usize),
    Append(usize),
    Length(usize, f64),
    Remove(usize),
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn grow_strategy() -> impl Strategy<Value = Grow> {
    prop_oneof![
        3 => any::<usize>().prop_map(Grow::Split),
        3 => any::<usize>().prop_map(Grow::Append),
        2 => (any::<usize>(), 0.0f64..50.0).prop_map(|(i, l)| Grow::Length(i, l)),
        1 => any::<usize>().prop_map(Grow::Remove),
    ]
}

fn direction_strategy() -> impl Strategy<Value = TreeDirection> {
    prop_oneof![
        Just(TreeDirection::LeftToRight),
        Just(TreeDirection::RightToLeft),
        Just(TreeDirection::TopToBottom),
        Just(TreeDirection::BottomToTop),
    ]
}

fn settings_strategy() -> impl Strategy<Value = LayoutSettings> {
    (
        200.0f64..2000.0,
        200.0f64..2000.0,
        direction_strategy(),
        prop::array::uniform4(0.0f64..80.0),
    )
        .prop_map(|(width, height, direction, [root, leaf, start, end])| LayoutSettings {
            width,
            height,
            direction,
            margins: Margins {
                root,
                leaf,
                perpendicular_start: start,
                perpendicular_end: end,
            },
            ..LayoutSettings::default()
        })
}

fn grown(edits: &[Grow]) -> TreeStore {
    let mut store = TreeStore::with_sample();
    for edit in edits {
        let mut ids: Vec<String> = store.tree().nodes.keys().cloned().collect();
        ids.sort();
        let pick = |i: &usize| ids[i % ids.len()].clone();
        match edit {
            Grow::Split(i) => {
                store.split_branch(&pick(i));
            }
            Grow::Append(i) => {
                store.append_leaf(&pick(i));
            }
            Grow::Length(i, l) => {
                store.update_branch_length(&pick(i), Some(*l));
            }
            Grow::Remove(i) => {
                store.remove_node(&pick(i));
            }
        }
    }
    store
}

const EPS: f64 = 1e-6;

// ═════════════════════════════════════════════════════════════════════════
// 1. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn layout_is_deterministic(
        edits in prop::collection::vec(grow_strategy(), 0..30),
        settings in settings_strategy(),
    ) {
        let store = grown(&edits);
        let first = compute_layout(store.tree(), &settings).unwrap();
        let second = compute_layout(store.tree(), &settings).unwrap();
        prop_assert_eq!(first, second);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Positions stay inside the margins
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn nodes_stay_inside_margins(
        edits in prop::collection::vec(grow_strategy(), 0..30),
        settings in settings_strategy(),
    ) {
        let store = grown(&edits);
        let mapper = DirectionMapper::new(&settings);
        let m = mapper.margins();
        for node in compute_layout(store.tree(), &settings).unwrap() {
            let p = node.position;
            prop_assert!(p.x >= m.left - EPS && p.x <= settings.width - m.right + EPS, "{:?}", p);
            prop_assert!(p.y >= m.top - EPS && p.y <= settings.height - m.bottom + EPS, "{:?}", p);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Normalized distance range
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn normalized_distance_in_unit_range(
        edits in prop::collection::vec(grow_strategy(), 0..30),
    ) {
        let store = grown(&edits);
        let placed = cluster(store.tree(), 500.0).unwrap();
        for node in &placed {
            prop_assert!((0.0..=1.0).contains(&node.normalized), "{:?}", node);
            prop_assert!(node.perpendicular >= -EPS && node.perpendicular <= 500.0 + EPS, "{:?}", node);
        }
        let max = placed.iter().map(|n| n.normalized).fold(0.0, f64::max);
        if placed.iter().any(|n| n.distance > 0.0) {
            prop_assert_eq!(max, 1.0);
        } else {
            prop_assert_eq!(max, 0.0);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4 + 5. Depth and coverage
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn depth_follows_parent_and_every_node_appears_once(
        edits in prop::collection::vec(grow_strategy(), 0..30),
        direction in direction_strategy(),
    ) {
        let store = grown(&edits);
        let settings = LayoutSettings { direction, ..LayoutSettings::default() };
        let nodes = compute_layout(store.tree(), &settings).unwrap();

        let ids: HashSet<&str> = nodes.iter().map(|n| n.id()).collect();
        prop_assert_eq!(ids.len(), nodes.len());
        prop_assert_eq!(nodes.len(), store.len());
        prop_assert_eq!(nodes[0].id(), store.root_id());

        let depth: HashMap<&str, usize> = nodes.iter().map(|n| (n.id(), n.depth)).collect();
        for node in &nodes {
            match node.node.parent_id.as_deref() {
                Some(parent) => {
                    prop_assert_eq!(node.depth, depth[parent] + 1);
                }
                None => {
                    prop_assert_eq!(node.depth, 0);
                }
            }
        }
    }
}
