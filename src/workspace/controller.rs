use tracing::{debug, info, warn};

use super::panel::{HOME_PANEL_ID, Orientation, PanelNode};
use super::storage::{self, TabStorage};
use super::store::{Store, SubscriptionId};
use super::tabs::{Tab, TabRegistry};

/// Everything the shell renders: the pane tree, focus, and open tabs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceState {
    pub root: PanelNode,
    pub active_panel_id: String,
    pub maximized_panel_id: Option<String>,
    pub tabs: TabRegistry,
}

impl Default for WorkspaceState {
    fn default() -> Self {
        Self {
            root: PanelNode::seed(),
            active_panel_id: HOME_PANEL_ID.to_string(),
            maximized_panel_id: None,
            tabs: TabRegistry::default(),
        }
    }
}

impl WorkspaceState {
    /// Leaves to draw: the maximized one alone, or the whole tree.
    pub fn visible_leaves(&self) -> Vec<&PanelNode> {
        if let Some(id) = &self.maximized_panel_id
            && let Some(leaf) = self.root.find_leaf(id)
        {
            return vec![leaf];
        }
        self.root.leaves()
    }

    pub fn active_leaf(&self) -> Option<&PanelNode> {
        self.root.find_leaf(&self.active_panel_id)
    }
}

/// Owns the workspace state and applies every user-facing operation to it.
///
/// Each operation works on a copy and commits the result as a whole; an
/// operation that changes nothing neither notifies subscribers nor writes
/// to storage.
pub struct WorkspaceController {
    store: Store<WorkspaceState>,
    storage: Option<Box<dyn TabStorage>>,
}

impl Default for WorkspaceController {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkspaceController {
    pub fn new() -> Self {
        Self {
            store: Store::new(WorkspaceState::default()),
            storage: None,
        }
    }

    /// A controller that writes the tab record after every tab change.
    pub fn with_storage(storage: Box<dyn TabStorage>) -> Self {
        Self {
            store: Store::new(WorkspaceState::default()),
            storage: Some(storage),
        }
    }

    pub fn state(&self) -> &WorkspaceState {
        self.store.get_state()
    }

    pub fn subscribe(&mut self, listener: impl Fn(&WorkspaceState) + 'static) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    /// Replace the open tabs with whatever storage holds. Never fails.
    pub fn restore_tabs(&mut self) {
        let Some(storage) = &self.storage else {
            return;
        };
        let record = storage::load_or_default(storage.as_ref());
        info!(count = record.len(), "restored open tabs");
        let mut next = self.state().clone();
        next.tabs = record;
        let active = next.tabs.active_tab_id().map(str::to_string);
        next.root = next.root.set_leaf_tab(&next.active_panel_id, active.as_deref());
        // Loaded from storage; no need to write it straight back
        self.store.set_state(next);
    }

    fn edit(&mut self, f: impl FnOnce(&mut WorkspaceState)) {
        let current = self.state();
        let mut next = current.clone();
        f(&mut next);

        // The focused pane follows the active tab
        if next.tabs.active_tab_id() != current.tabs.active_tab_id() {
            let active = next.tabs.active_tab_id().map(str::to_string);
            next.root = next.root.set_leaf_tab(&next.active_panel_id, active.as_deref());
        }

        if next == *current {
            return;
        }
        let tabs_changed = next.tabs != current.tabs;
        self.store.set_state(next);
        if tabs_changed {
            self.persist_tabs();
        }
    }

    fn persist_tabs(&self) {
        if let Some(storage) = &self.storage
            && let Err(e) = storage.save_tabs(&self.state().tabs)
        {
            warn!(error = %e, "failed to save open tabs");
        }
    }

    // ── Panes ────────────────────────────────────────────────────────

    /// Split a leaf. Returns the new leaf's id, or `None` if the leaf does
    /// not exist.
    pub fn split(&mut self, leaf_id: &str, orientation: Orientation) -> Option<String> {
        let current = &self.state().root;
        let root = current.split(leaf_id, orientation);
        let new_leaf = root
            .leaf_ids()
            .into_iter()
            .find(|id| !current.contains_leaf(id))?
            .to_string();
        info!(leaf_id, new_leaf = %new_leaf, %orientation, "split pane");
        self.edit(|s| s.root = root);
        Some(new_leaf)
    }

    pub fn split_active(&mut self, orientation: Orientation) -> Option<String> {
        let active = self.state().active_panel_id.clone();
        self.split(&active, orientation)
    }

    /// Close a leaf. Focus moves to the first remaining leaf if the closed
    /// one had it; a maximized leaf that disappears clears the flag.
    pub fn close_panel(&mut self, leaf_id: &str) {
        if !self.state().root.contains_leaf(leaf_id) {
            return;
        }
        info!(leaf_id, "close pane");
        self.edit(|s| {
            s.root = s.root.close(leaf_id);
            if !s.root.contains_leaf(&s.active_panel_id) {
                s.active_panel_id = s.root.first_leaf_id().to_string();
            }
            if let Some(max) = &s.maximized_panel_id
                && !s.root.contains_leaf(max)
            {
                s.maximized_panel_id = None;
            }
        });
    }

    pub fn close_active_panel(&mut self) {
        let active = self.state().active_panel_id.clone();
        self.close_panel(&active);
    }

    /// Display-only flag; the tree underneath is untouched. Unknown leaves
    /// are ignored.
    pub fn toggle_maximize(&mut self, leaf_id: &str) {
        if !self.state().root.contains_leaf(leaf_id) {
            return;
        }
        self.edit(|s| {
            s.maximized_panel_id = if s.maximized_panel_id.as_deref() == Some(leaf_id) {
                None
            } else {
                Some(leaf_id.to_string())
            };
        });
    }

    pub fn toggle_maximize_active(&mut self) {
        let active = self.state().active_panel_id.clone();
        self.toggle_maximize(&active);
    }

    /// Focus a pane. If it shows an open tab, that tab becomes active.
    pub fn set_active_panel(&mut self, leaf_id: &str) {
        self.edit(|s| {
            s.active_panel_id = leaf_id.to_string();
            let shown = s.root.find_leaf(leaf_id).and_then(PanelNode::tab_id);
            if let Some(tab) = shown
                && s.tabs.get(tab).is_some()
            {
                let tab = tab.to_string();
                s.tabs.set_active_tab(Some(&tab));
            }
        });
    }

    /// Cycle focus in reading order. Does nothing while a pane is maximized.
    pub fn focus_next_panel(&mut self) {
        self.cycle_panel(true);
    }

    pub fn focus_prev_panel(&mut self) {
        self.cycle_panel(false);
    }

    fn cycle_panel(&mut self, forward: bool) {
        let state = self.state();
        if state.maximized_panel_id.is_some() {
            return;
        }
        let ids = state.root.leaf_ids();
        let len = ids.len();
        let current = ids
            .iter()
            .position(|id| *id == state.active_panel_id)
            .unwrap_or(0);
        let target = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        let target = ids[target].to_string();
        self.set_active_panel(&target);
    }

    // ── Tabs ─────────────────────────────────────────────────────────

    pub fn open_tab(&mut self, tab: Tab) {
        debug!(id = %tab.id, "open tab");
        self.edit(|s| s.tabs.open_tab(tab));
    }

    /// Close a tab; panes showing it go blank and the successor, if any,
    /// moves into the focused pane.
    pub fn close_tab(&mut self, id: &str) {
        debug!(id, "close tab");
        self.edit(|s| {
            if s.tabs.close_tab(id) {
                s.root = s.root.clear_tab_references(id);
            }
        });
    }

    pub fn set_active_tab(&mut self, id: Option<&str>) {
        self.edit(|s| s.tabs.set_active_tab(id));
    }

    pub fn next_tab(&mut self) {
        self.edit(|s| s.tabs.next_tab());
    }

    pub fn prev_tab(&mut self) {
        self.edit(|s| s.tabs.prev_tab());
    }

    pub fn set_tabs(&mut self, tabs: Vec<Tab>) {
        self.edit(|s| s.tabs.set_tabs(tabs));
    }

    /// Swap the active tab with its neighbour. Does nothing at either end.
    pub fn move_active_tab(&mut self, forward: bool) {
        let tabs = &self.state().tabs;
        let Some(from) = tabs.active_tab_id().and_then(|id| tabs.position(id)) else {
            return;
        };
        let to = if forward {
            from + 1
        } else {
            match from.checked_sub(1) {
                Some(to) => to,
                None => return,
            }
        };
        if to >= tabs.len() {
            return;
        }
        let mut order = tabs.tabs().to_vec();
        order.swap(from, to);
        debug!(from, to, "move tab");
        self.set_tabs(order);
    }

    /// Close every tab and blank every pane.
    pub fn reset_tabs(&mut self) {
        self.edit(|s| {
            for tab in s.tabs.tabs() {
                s.root = s.root.clear_tab_references(&tab.id);
            }
            s.tabs.reset();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::storage::MockTabStorage;
    use std::cell::Cell;
    use std::rc::Rc;

    fn tab(path: &str) -> Tab {
        Tab::for_location(path, path.trim_start_matches('/'))
    }

    fn controller_with_tabs(paths: &[&str]) -> WorkspaceController {
        let mut ws = WorkspaceController::new();
        for p in paths {
            ws.open_tab(tab(p));
        }
        ws
    }

    #[test]
    fn test_initial_state_is_seed() {
        let ws = WorkspaceController::new();
        let state = ws.state();
        assert_eq!(state.root, PanelNode::leaf("main"));
        assert_eq!(state.active_panel_id, "main");
        assert_eq!(state.maximized_panel_id, None);
        assert!(state.tabs.is_empty());
        assert_eq!(state.tabs.active_tab_id(), None);
    }

    #[test]
    fn test_split_and_close_active_scenario() {
        let mut ws = WorkspaceController::new();
        let new_leaf = ws.split_active(Orientation::Horizontal).unwrap();
        assert_eq!(ws.state().root.leaf_ids(), vec!["main", new_leaf.as_str()]);
        // Splitting does not move focus
        assert_eq!(ws.state().active_panel_id, "main");

        ws.close_panel(&new_leaf);
        assert_eq!(ws.state().root, PanelNode::leaf("main"));
        assert_eq!(ws.state().active_panel_id, "main");
    }

    #[test]
    fn test_split_missing_leaf_is_noop() {
        let mut ws = WorkspaceController::new();
        let before = ws.state().clone();
        assert!(ws.split("nonexistent", Orientation::Vertical).is_none());
        ws.close_panel("nonexistent");
        assert_eq!(*ws.state(), before);
    }

    #[test]
    fn test_split_deeply_nested_leaf() {
        let mut ws = WorkspaceController::new();
        let mut target = "main".to_string();
        for _ in 0..12 {
            target = ws.split(&target, Orientation::Vertical).unwrap();
        }
        let deepest = ws.split(&target, Orientation::Horizontal);
        assert!(deepest.is_some());
        assert_eq!(ws.state().root.leaf_count(), 14);
        assert!(ws.state().root.contains_leaf(&deepest.unwrap()));
    }

    #[test]
    fn test_toggle_maximize_unknown_leaf_is_noop() {
        let mut ws = WorkspaceController::new();
        ws.set_active_panel("ghost");
        ws.toggle_maximize_active();
        assert_eq!(ws.state().maximized_panel_id, None);

        ws.toggle_maximize("nonexistent");
        assert_eq!(ws.state().maximized_panel_id, None);
    }

    #[test]
    fn test_move_active_tab_reorders_without_activating() {
        let mut ws = controller_with_tabs(&["/a", "/b", "/c"]);
        ws.set_active_tab(Some("/b"));

        ws.move_active_tab(true);
        let ids: Vec<&str> = ws.state().tabs.tabs().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["/a", "/c", "/b"]);
        assert_eq!(ws.state().tabs.active_tab_id(), Some("/b"));

        // Already last
        let before = ws.state().clone();
        ws.move_active_tab(true);
        assert_eq!(*ws.state(), before);

        ws.move_active_tab(false);
        ws.move_active_tab(false);
        ws.move_active_tab(false);
        let ids: Vec<&str> = ws.state().tabs.tabs().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["/b", "/a", "/c"]);
    }

    #[test]
    fn test_closing_active_pane_moves_focus_to_first_leaf() {
        let mut ws = WorkspaceController::new();
        let right = ws.split_active(Orientation::Horizontal).unwrap();
        ws.set_active_panel(&right);
        ws.close_active_panel();
        assert_eq!(ws.state().active_panel_id, "main");

        // Closing the last pane resets to the seed
        ws.close_active_panel();
        assert_eq!(ws.state().root, PanelNode::seed());
        assert_eq!(ws.state().active_panel_id, "main");
    }

    #[test]
    fn test_closing_maximized_pane_clears_flag() {
        let mut ws = WorkspaceController::new();
        let right = ws.split_active(Orientation::Horizontal).unwrap();
        ws.toggle_maximize(&right);
        assert_eq!(ws.state().maximized_panel_id.as_deref(), Some(right.as_str()));

        ws.close_panel(&right);
        assert_eq!(ws.state().maximized_panel_id, None);
    }

    #[test]
    fn test_toggle_maximize_twice_is_non_destructive() {
        let mut ws = controller_with_tabs(&["/a"]);
        ws.split_active(Orientation::Vertical);
        let before = ws.state().clone();

        ws.toggle_maximize_active();
        assert_eq!(ws.state().maximized_panel_id.as_deref(), Some("main"));
        assert_eq!(ws.state().visible_leaves().len(), 1);
        assert_eq!(ws.state().root, before.root);

        ws.toggle_maximize_active();
        assert_eq!(*ws.state(), before);
        assert_eq!(ws.state().visible_leaves().len(), 2);
    }

    #[test]
    fn test_toggle_maximize_other_pane_moves_flag() {
        let mut ws = WorkspaceController::new();
        let right = ws.split_active(Orientation::Horizontal).unwrap();
        ws.toggle_maximize("main");
        ws.toggle_maximize(&right);
        assert_eq!(ws.state().maximized_panel_id.as_deref(), Some(right.as_str()));
    }

    #[test]
    fn test_active_tab_binds_to_focused_pane() {
        let mut ws = WorkspaceController::new();
        let right = ws.split_active(Orientation::Horizontal).unwrap();
        ws.open_tab(tab("/a"));
        assert_eq!(ws.state().root.find_leaf("main").unwrap().tab_id(), Some("/a"));

        ws.set_active_panel(&right);
        ws.open_tab(tab("/b"));
        assert_eq!(ws.state().root.find_leaf(&right).unwrap().tab_id(), Some("/b"));
        assert_eq!(ws.state().root.find_leaf("main").unwrap().tab_id(), Some("/a"));

        // Focusing a pane activates the tab it shows
        ws.set_active_panel("main");
        assert_eq!(ws.state().tabs.active_tab_id(), Some("/a"));
        assert_eq!(ws.state().root.find_leaf(&right).unwrap().tab_id(), Some("/b"));
    }

    #[test]
    fn test_focus_empty_pane_keeps_active_tab() {
        let mut ws = controller_with_tabs(&["/a"]);
        let right = ws.split_active(Orientation::Horizontal).unwrap();
        ws.set_active_panel(&right);
        assert_eq!(ws.state().tabs.active_tab_id(), Some("/a"));
        assert_eq!(ws.state().root.find_leaf(&right).unwrap().tab_id(), None);
    }

    #[test]
    fn test_close_tab_clears_panes_and_binds_successor() {
        let mut ws = controller_with_tabs(&["/a", "/b", "/c"]);
        ws.set_active_tab(Some("/b"));
        assert_eq!(ws.state().root.find_leaf("main").unwrap().tab_id(), Some("/b"));

        ws.close_tab("/b");
        assert_eq!(ws.state().tabs.active_tab_id(), Some("/c"));
        assert_eq!(ws.state().root.find_leaf("main").unwrap().tab_id(), Some("/c"));

        ws.close_tab("/a");
        ws.close_tab("/c");
        assert_eq!(ws.state().tabs.active_tab_id(), None);
        assert_eq!(ws.state().root.find_leaf("main").unwrap().tab_id(), None);
    }

    #[test]
    fn test_close_inactive_tab_blanks_other_pane() {
        let mut ws = WorkspaceController::new();
        let right = ws.split_active(Orientation::Horizontal).unwrap();
        ws.open_tab(tab("/a"));
        ws.set_active_panel(&right);
        ws.open_tab(tab("/b"));

        ws.close_tab("/a");
        assert_eq!(ws.state().root.find_leaf("main").unwrap().tab_id(), None);
        assert_eq!(ws.state().tabs.active_tab_id(), Some("/b"));
    }

    #[test]
    fn test_focus_cycles_in_reading_order() {
        let mut ws = WorkspaceController::new();
        let right = ws.split_active(Orientation::Horizontal).unwrap();
        let below = ws.split(&right, Orientation::Vertical).unwrap();

        ws.focus_next_panel();
        assert_eq!(ws.state().active_panel_id, right);
        ws.focus_next_panel();
        assert_eq!(ws.state().active_panel_id, below);
        ws.focus_next_panel();
        assert_eq!(ws.state().active_panel_id, "main");
        ws.focus_prev_panel();
        assert_eq!(ws.state().active_panel_id, below);

        ws.toggle_maximize_active();
        ws.focus_next_panel();
        assert_eq!(ws.state().active_panel_id, below);
    }

    #[test]
    fn test_subscribers_notified_only_on_change() {
        let mut ws = WorkspaceController::new();
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        ws.subscribe(move |_| c.set(c.get() + 1));

        ws.open_tab(tab("/a"));
        assert_eq!(count.get(), 1);
        // Re-opening the active tab changes nothing
        ws.open_tab(tab("/a"));
        assert_eq!(count.get(), 1);
        ws.split("nonexistent", Orientation::Horizontal);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_tab_changes_are_persisted() {
        let mut mock = MockTabStorage::new();
        // open a, open b, close a
        mock.expect_save_tabs().times(3).returning(|_| Ok(()));
        let mut ws = WorkspaceController::with_storage(Box::new(mock));

        ws.open_tab(tab("/a"));
        ws.open_tab(tab("/b"));
        // Pane edits never touch storage
        ws.split_active(Orientation::Horizontal);
        ws.toggle_maximize_active();
        ws.close_tab("/a");
    }

    #[test]
    fn test_save_failure_does_not_abort_operation() {
        let mut mock = MockTabStorage::new();
        mock.expect_save_tabs()
            .returning(|_| Err(storage::StorageError::Invalid("disk full".into())));
        let mut ws = WorkspaceController::with_storage(Box::new(mock));

        ws.open_tab(tab("/a"));
        assert_eq!(ws.state().tabs.len(), 1);
    }

    #[test]
    fn test_restore_tabs_from_storage() {
        let mut mock = MockTabStorage::new();
        mock.expect_load_tabs().returning(|| {
            let mut reg = TabRegistry::new();
            reg.open_tab(Tab::for_location("/a", "A"));
            Ok(Some(reg))
        });
        mock.expect_save_tabs().never();
        let mut ws = WorkspaceController::with_storage(Box::new(mock));

        ws.restore_tabs();
        assert_eq!(ws.state().tabs.len(), 1);
        assert_eq!(ws.state().tabs.active_tab_id(), Some("/a"));
        assert_eq!(ws.state().active_leaf().and_then(|l| l.tab_id()), Some("/a"));
    }

    #[test]
    fn test_reset_tabs_blanks_everything() {
        let mut ws = controller_with_tabs(&["/a", "/b"]);
        ws.reset_tabs();
        assert!(ws.state().tabs.is_empty());
        assert!(ws.state().root.leaves().iter().all(|l| l.tab_id().is_none()));
    }
}
