// ABOUTME: One editing session: tree store, layout settings, selection and layout cache.
// ABOUTME: Turns input events and edit operations into store/selection calls.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use phylo_core::{Config, LabelSettings, SettingsStore, VisualNode};
use phylo_layout::{LayoutCache, LayoutError, Scene};
use phylo_tree::{Selection, SelectionModel, Subscription, TreeChange, TreeStore};
use serde::Serialize;

use crate::edit::EditOp;
use crate::input::{InputEvent, Target};

/// Everything a front end needs to draw one frame
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub tree_id: String,
    pub version: u64,
    pub selection: Selection,
    #[serde(flatten)]
    pub scene: Scene,
}

pub struct Session {
    store: TreeStore,
    settings: SettingsStore,
    labels: LabelSettings,
    selection: SelectionModel,
    cache: LayoutCache,
    stale: Rc<Cell<bool>>,
    last_change: Rc<RefCell<Option<TreeChange>>>,
    _subscription: Subscription,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        let mut store = TreeStore::with_sample().with_editor_settings(config.editor.clone());
        let stale = Rc::new(Cell::new(true));
        let last_change = Rc::new(RefCell::new(None));

        let subscription = {
            let stale = Rc::clone(&stale);
            let last_change = Rc::clone(&last_change);
            store.subscribe(move |event| {
                stale.set(true);
                *last_change.borrow_mut() = Some(event.change.clone());
            })
        };

        Self {
            store,
            settings: SettingsStore::new(config.layout.clone()),
            labels: config.labels.clone(),
            selection: SelectionModel::new(),
            cache: LayoutCache::new(),
            stale,
            last_change,
            _subscription: subscription,
        }
    }

    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsStore {
        &mut self.settings
    }

    pub fn selection(&self) -> &Selection {
        self.selection.current()
    }

    /// Set by every applied tree edit, cleared by the next layout
    pub fn is_stale(&self) -> bool {
        self.stale.get()
    }

    pub fn last_change(&self) -> Option<TreeChange> {
        self.last_change.borrow().clone()
    }

    /// Current layout, recomputed only if the tree or settings moved on.
    pub fn layout(&mut self) -> Result<&[VisualNode], LayoutError> {
        self.stale.set(false);
        self.cache.get_or_compute(
            self.store.tree(),
            self.store.version(),
            self.settings.settings(),
            self.settings.version(),
        )
    }

    pub fn snapshot(&mut self) -> Result<Snapshot, LayoutError> {
        let settings = self.settings.settings().clone();
        let labels = self.labels.clone();
        let scene = Scene::build(self.layout()?, &settings, &labels);
        Ok(Snapshot {
            tree_id: self.store.tree().id.clone(),
            version: self.store.version(),
            selection: self.selection.current().clone(),
            scene,
        })
    }

    /// Apply a textual edit. Returns whether anything changed.
    pub fn apply(&mut self, op: &EditOp) -> bool {
        let applied = match op {
            EditOp::Split(id) => self.store.split_branch(id),
            EditOp::Append(id) => self.store.append_leaf(id),
            EditOp::Insert { parent, child } => self.store.insert_internal_above(parent, child),
            EditOp::Remove(id) => {
                let removed = self.store.remove_node(id);
                if removed && self.selection.is_dangling(self.store.tree()) {
                    self.selection.clear();
                }
                removed
            }
            EditOp::Name(id, name) => self.store.update_name(id, name.clone()),
            EditOp::Length(id, length) => self.store.update_branch_length(id, *length),
            EditOp::Color(id, color) => self.store.update_color(id, color.clone()),
            EditOp::Width(id, width) => self.store.update_branch_width(id, *width),
            EditOp::Select(id) => {
                if !self.knows_node(id) {
                    return false;
                }
                self.selection.select_node(id.as_str());
                true
            }
            EditOp::SelectBranch { parent, child } => {
                if !self.knows_branch(parent, child) {
                    return false;
                }
                self.selection.select_branch(parent.as_str(), child.as_str());
                true
            }
            EditOp::Clear => {
                self.selection.clear();
                true
            }
            EditOp::Input(event) => self.handle(event.clone()),
        };
        tracing::debug!(?op, applied, "edit operation");
        applied
    }

    /// Translate a pointer or panel event. Returns whether the tree or the
    /// selection changed.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::Click {
                target: Target::Node(id),
                modified: false,
            } => {
                if !self.knows_node(&id) {
                    return false;
                }
                self.selection.toggle_node(&id);
                true
            }
            InputEvent::Click {
                target: Target::Node(id),
                modified: true,
            } => self.store.append_leaf(&id),
            InputEvent::Click {
                target: Target::Branch { parent, child },
                modified: false,
            } => {
                if !self.knows_branch(&parent, &child) {
                    return false;
                }
                self.selection.select_branch(parent, child);
                true
            }
            InputEvent::Click {
                target: Target::Branch { child, .. },
                modified: true,
            } => self.store.split_branch(&child),
            InputEvent::Click {
                target: Target::Background,
                ..
            } => {
                let had_selection = !self.selection.current().is_none();
                self.selection.clear();
                had_selection
            }
            InputEvent::DoubleClick(id) => {
                let removed = self.store.remove_node(&id);
                if removed {
                    self.selection.clear();
                }
                removed
            }
            InputEvent::RemoveSelected => {
                let target = match self.selection.current() {
                    Selection::None => return false,
                    Selection::Node { id } => id.clone(),
                    Selection::Branch { child_id, .. } => child_id.clone(),
                };
                let removed = self.store.remove_node(&target);
                if removed {
                    self.selection.clear();
                }
                removed
            }
            InputEvent::InsertAboveSelected => match self.selection.current().clone() {
                Selection::Branch {
                    parent_id,
                    child_id,
                } => self.store.insert_internal_above(&parent_id, &child_id),
                _ => false,
            },
        }
    }

    // Selection targets must exist; unknown ids are ignored.
    fn knows_node(&self, id: &str) -> bool {
        let known = self.store.contains(id);
        if !known {
            tracing::debug!(node = %id, "select ignored: unknown node");
        }
        known
    }

    fn knows_branch(&self, parent: &str, child: &str) -> bool {
        let connected =
            self.store.node(child).and_then(|c| c.parent_id.as_deref()) == Some(parent);
        if !connected {
            tracing::debug!(%parent, %child, "branch select ignored: not parent and child");
        }
        connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phylo_core::TreeDirection;

    fn session() -> Session {
        Session::new(&Config::default())
    }

    fn node_click(id: &str) -> InputEvent {
        InputEvent::click(Target::Node(id.to_string()))
    }

    fn branch(parent: &str, child: &str) -> Target {
        Target::Branch {
            parent: parent.to_string(),
            child: child.to_string(),
        }
    }

    #[test]
    fn node_click_toggles_selection() {
        let mut s = session();
        s.handle(node_click("A"));
        assert_eq!(s.selection(), &Selection::Node { id: "A".to_string() });
        s.handle(node_click("A"));
        assert!(s.selection().is_none());
    }

    #[test]
    fn branch_click_selects_and_background_clears() {
        let mut s = session();
        assert!(s.handle(InputEvent::click(branch("root", "B"))));
        assert_eq!(
            s.selection(),
            &Selection::Branch {
                parent_id: "root".to_string(),
                child_id: "B".to_string()
            }
        );
        assert!(s.handle(InputEvent::click(Target::Background)));
        assert!(s.selection().is_none());
        assert!(!s.handle(InputEvent::click(Target::Background)));
    }

    #[test]
    fn modified_clicks_edit_the_tree() {
        let mut s = session();
        assert!(s.handle(InputEvent::modified_click(branch("root", "A"))));
        assert!(matches!(s.last_change(), Some(TreeChange::BranchSplit { .. })));
        assert_eq!(s.store().len(), 5);

        assert!(s.handle(InputEvent::modified_click(Target::Node("root".to_string()))));
        assert!(matches!(s.last_change(), Some(TreeChange::LeafAppended { .. })));
        assert_eq!(s.store().len(), 6);

        // Appending under a leaf is refused.
        assert!(!s.handle(InputEvent::modified_click(Target::Node("B".to_string()))));
    }

    #[test]
    fn double_click_removes_and_clears() {
        let mut s = session();
        s.handle(node_click("B"));
        assert!(s.handle(InputEvent::DoubleClick("A".to_string())));
        assert!(!s.store().contains("A"));
        assert!(s.selection().is_none());
    }

    #[test]
    fn clicks_on_unknown_targets_are_ignored() {
        let mut s = session();
        assert!(!s.handle(node_click("ghost")));
        assert!(s.selection().is_none());

        s.handle(node_click("A"));
        assert!(!s.handle(InputEvent::click(branch("A", "B"))));
        assert!(!s.handle(InputEvent::click(branch("root", "ghost"))));
        assert_eq!(s.selection(), &Selection::Node { id: "A".to_string() });
    }

    #[test]
    fn refused_removal_keeps_selection() {
        let mut s = session();
        s.handle(node_click("A"));
        assert!(!s.handle(InputEvent::DoubleClick("root".to_string())));
        assert!(!s.handle(InputEvent::DoubleClick("ghost".to_string())));
        assert_eq!(s.selection(), &Selection::Node { id: "A".to_string() });

        s.handle(node_click("A"));
        s.handle(node_click("root"));
        assert!(!s.handle(InputEvent::RemoveSelected));
        assert_eq!(s.selection(), &Selection::Node { id: "root".to_string() });
    }

    #[test]
    fn remove_selected_branch_removes_child() {
        let mut s = session();
        s.handle(InputEvent::click(branch("root", "B")));
        assert!(s.handle(InputEvent::RemoveSelected));
        assert!(!s.store().contains("B"));
        assert!(s.store().contains("root"));
        assert!(s.selection().is_none());
        assert!(!s.handle(InputEvent::RemoveSelected));
    }

    #[test]
    fn insert_above_selected_branch() {
        let mut s = session();
        assert!(!s.handle(InputEvent::InsertAboveSelected));
        s.handle(InputEvent::click(branch("root", "A")));
        assert!(s.handle(InputEvent::InsertAboveSelected));
        assert_eq!(s.store().node("A").unwrap().parent_id.as_deref(), Some("internal_1"));
    }

    #[test]
    fn edits_mark_layout_stale_until_recomputed() {
        let mut s = session();
        s.layout().unwrap();
        assert!(!s.is_stale());

        s.apply(&EditOp::Append("root".to_string()));
        assert!(s.is_stale());
        assert_eq!(s.layout().unwrap().len(), 4);
        assert!(!s.is_stale());

        // Selection changes don't touch the tree.
        s.apply(&EditOp::Select("A".to_string()));
        assert!(!s.is_stale());
    }

    #[test]
    fn apply_validates_selection_targets() {
        let mut s = session();
        assert!(!s.apply(&EditOp::Select("ghost".to_string())));
        assert!(!s.apply(&EditOp::SelectBranch {
            parent: "A".to_string(),
            child: "B".to_string()
        }));
        assert!(s.apply(&EditOp::SelectBranch {
            parent: "root".to_string(),
            child: "B".to_string()
        }));
        assert!(s.apply(&EditOp::Remove("B".to_string())));
        assert!(s.selection().is_none());
    }

    #[test]
    fn snapshot_reflects_settings_and_selection() {
        let mut s = session();
        s.settings_mut().set_direction(TreeDirection::BottomToTop);
        s.apply(&EditOp::Select("A".to_string()));
        let snap = s.snapshot().unwrap();
        assert_eq!(snap.scene.direction, TreeDirection::BottomToTop);
        assert_eq!(snap.tree_id, "sample-tree");

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["selection"]["kind"], "node");
        assert_eq!(json["treeId"], "sample-tree");
        assert_eq!(json["nodes"].as_array().unwrap().len(), 3);
    }
}
