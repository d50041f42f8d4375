//! Split-pane panel tree.
//!
//! The layout is a binary tree: leaves are visible panes that optionally show
//! a tab, internal nodes divide their area in two along an orientation.
//!
//! ```text
//! Split(horizontal)
//! ├── Leaf(main)          ← left pane
//! └── Split(vertical)
//!     ├── Leaf(pane-2)    ← top-right pane
//!     └── Leaf(pane-3)    ← bottom-right pane
//! ```
//!
//! Every edit returns a freshly built tree and leaves the receiver untouched.
//! Edits that name a leaf which does not exist return an equal tree.

use std::sync::atomic::{AtomicU64, Ordering};

/// Id of the seed leaf. Never produced by [`next_panel_id`].
pub const HOME_PANEL_ID: &str = "main";

static NEXT_PANEL_ID: AtomicU64 = AtomicU64::new(1);

/// Allocate a process-unique node id (`pane-<n>`).
pub fn next_panel_id() -> String {
    format!("pane-{}", NEXT_PANEL_ID.fetch_add(1, Ordering::Relaxed))
}

/// Direction in which a split divides its area.
///
/// `Horizontal` places the children side by side (first on the left),
/// `Vertical` stacks them (first on top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Horizontal => write!(f, "horizontal"),
            Orientation::Vertical => write!(f, "vertical"),
        }
    }
}

/// A node in the panel tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelNode {
    /// A visible pane. `tab_id` is `None` when it shows no registered tab.
    Leaf { id: String, tab_id: Option<String> },
    /// Exactly two children, in reading order.
    Split {
        id: String,
        orientation: Orientation,
        children: Box<[PanelNode; 2]>,
    },
}

impl Default for PanelNode {
    fn default() -> Self {
        Self::seed()
    }
}

impl PanelNode {
    /// The initial tree: a single home leaf showing no tab.
    pub fn seed() -> Self {
        Self::leaf(HOME_PANEL_ID)
    }

    pub fn leaf(id: impl Into<String>) -> Self {
        Self::Leaf {
            id: id.into(),
            tab_id: None,
        }
    }

    pub fn split_node(orientation: Orientation, first: Self, second: Self) -> Self {
        Self::Split {
            id: next_panel_id(),
            orientation,
            children: Box::new([first, second]),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Leaf { id, .. } | Self::Split { id, .. } => id,
        }
    }

    /// Tab shown by this node, if it is a leaf bound to one.
    pub fn tab_id(&self) -> Option<&str> {
        match self {
            Self::Leaf { tab_id, .. } => tab_id.as_deref(),
            Self::Split { .. } => None,
        }
    }

    // -- Queries ---------------------------------------------------------------

    /// Leaves in reading order (depth-first, first child before second).
    pub fn leaves(&self) -> Vec<&PanelNode> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a PanelNode>) {
        match self {
            Self::Leaf { .. } => out.push(self),
            Self::Split { children, .. } => {
                children[0].collect_leaves(out);
                children[1].collect_leaves(out);
            }
        }
    }

    /// Leaf ids in reading order.
    pub fn leaf_ids(&self) -> Vec<&str> {
        self.leaves().into_iter().map(PanelNode::id).collect()
    }

    pub fn first_leaf_id(&self) -> &str {
        match self {
            Self::Leaf { id, .. } => id,
            Self::Split { children, .. } => children[0].first_leaf_id(),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Split { children, .. } => children[0].leaf_count() + children[1].leaf_count(),
        }
    }

    pub fn find_leaf(&self, leaf_id: &str) -> Option<&PanelNode> {
        match self {
            Self::Leaf { id, .. } => (id == leaf_id).then_some(self),
            Self::Split { children, .. } => children[0]
                .find_leaf(leaf_id)
                .or_else(|| children[1].find_leaf(leaf_id)),
        }
    }

    pub fn contains_leaf(&self, leaf_id: &str) -> bool {
        self.find_leaf(leaf_id).is_some()
    }

    // -- Edits -----------------------------------------------------------------

    /// Split the target leaf, placing a new empty leaf second.
    pub fn split(&self, target: &str, orientation: Orientation) -> PanelNode {
        match self.try_split(target, orientation) {
            Some((tree, _)) => tree,
            None => self.clone(),
        }
    }

    /// Like [`split`](Self::split) but also reports the new leaf's id.
    /// Returns `None` when the target leaf does not exist.
    pub fn try_split(&self, target: &str, orientation: Orientation) -> Option<(PanelNode, String)> {
        if !self.contains_leaf(target) {
            return None;
        }
        let new_leaf_id = next_panel_id();
        let tree = self.split_at(target, orientation, &new_leaf_id);
        Some((tree, new_leaf_id))
    }

    fn split_at(&self, target: &str, orientation: Orientation, new_leaf_id: &str) -> PanelNode {
        match self {
            Self::Leaf { id, .. } if id == target => {
                Self::split_node(orientation, self.clone(), Self::leaf(new_leaf_id))
            }
            Self::Leaf { .. } => self.clone(),
            Self::Split {
                id,
                orientation: own,
                children,
            } => Self::Split {
                id: id.clone(),
                orientation: *own,
                children: Box::new([
                    children[0].split_at(target, orientation, new_leaf_id),
                    children[1].split_at(target, orientation, new_leaf_id),
                ]),
            },
        }
    }

    /// Remove the target leaf. Its sibling takes the parent split's place.
    /// Removing the last leaf yields the seed tree.
    pub fn close(&self, target: &str) -> PanelNode {
        if !self.contains_leaf(target) {
            return self.clone();
        }
        self.prune(target).unwrap_or_else(Self::seed)
    }

    /// `None` means the node vanished.
    fn prune(&self, target: &str) -> Option<PanelNode> {
        match self {
            Self::Leaf { id, .. } => (id != target).then(|| self.clone()),
            Self::Split {
                id,
                orientation,
                children,
            } => match (children[0].prune(target), children[1].prune(target)) {
                (Some(first), Some(second)) => Some(Self::Split {
                    id: id.clone(),
                    orientation: *orientation,
                    children: Box::new([first, second]),
                }),
                (Some(survivor), None) | (None, Some(survivor)) => Some(survivor),
                (None, None) => None,
            },
        }
    }

    /// Rebind the tab shown by one leaf. Unknown leaf ids leave the tree as is.
    pub fn set_leaf_tab(&self, leaf_id: &str, tab: Option<&str>) -> PanelNode {
        self.map_leaves(&|id, current| {
            if id == leaf_id {
                tab.map(str::to_string)
            } else {
                current.map(str::to_string)
            }
        })
    }

    /// Unbind the given tab from every leaf showing it.
    pub fn clear_tab_references(&self, tab: &str) -> PanelNode {
        self.map_leaves(&|_, current| current.filter(|t| *t != tab).map(str::to_string))
    }

    fn map_leaves(&self, f: &dyn Fn(&str, Option<&str>) -> Option<String>) -> PanelNode {
        match self {
            Self::Leaf { id, tab_id } => Self::Leaf {
                id: id.clone(),
                tab_id: f(id, tab_id.as_deref()),
            },
            Self::Split {
                id,
                orientation,
                children,
            } => Self::Split {
                id: id.clone(),
                orientation: *orientation,
                children: Box::new([children[0].map_leaves(f), children[1].map_leaves(f)]),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn all_ids(node: &PanelNode, out: &mut Vec<String>) {
        out.push(node.id().to_string());
        if let PanelNode::Split { children, .. } = node {
            all_ids(&children[0], out);
            all_ids(&children[1], out);
        }
    }

    fn split_count(node: &PanelNode) -> usize {
        match node {
            PanelNode::Leaf { .. } => 0,
            PanelNode::Split { children, .. } => {
                1 + split_count(&children[0]) + split_count(&children[1])
            }
        }
    }

    fn assert_well_formed(tree: &PanelNode) {
        assert!(tree.leaf_count() >= 1);
        assert_eq!(tree.leaf_count(), split_count(tree) + 1);
        let mut ids = Vec::new();
        all_ids(tree, &mut ids);
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len(), "duplicate ids in {:?}", ids);
    }

    #[test]
    fn test_seed_is_single_home_leaf() {
        let tree = PanelNode::seed();
        assert_eq!(tree, PanelNode::leaf(HOME_PANEL_ID));
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(split_count(&tree), 0);
        assert_eq!(tree.tab_id(), None);
    }

    #[test]
    fn test_split_main_horizontal() {
        let tree = PanelNode::seed();
        let (split, new_id) = tree.try_split("main", Orientation::Horizontal).unwrap();

        match &split {
            PanelNode::Split {
                orientation,
                children,
                ..
            } => {
                assert_eq!(*orientation, Orientation::Horizontal);
                assert_eq!(children[0], PanelNode::leaf("main"));
                assert_eq!(children[1], PanelNode::leaf(new_id.clone()));
            }
            other => panic!("expected split, got {:?}", other),
        }
        assert_eq!(split.leaf_ids(), vec!["main", new_id.as_str()]);

        let closed = split.close(&new_id);
        assert_eq!(closed, PanelNode::leaf("main"));
    }

    #[test]
    fn test_split_preserves_bound_tab() {
        let tree = PanelNode::seed().set_leaf_tab("main", Some("/payroll"));
        let (split, new_id) = tree.try_split("main", Orientation::Vertical).unwrap();
        assert_eq!(split.find_leaf("main").unwrap().tab_id(), Some("/payroll"));
        assert_eq!(split.find_leaf(&new_id).unwrap().tab_id(), None);
    }

    #[test]
    fn test_split_close_round_trip_nested() {
        let base = PanelNode::seed()
            .split("main", Orientation::Horizontal)
            .split("main", Orientation::Vertical);
        let target = base.leaf_ids()[2].to_string();

        let (split, new_id) = base.try_split(&target, Orientation::Horizontal).unwrap();
        assert_well_formed(&split);
        assert_eq!(split.close(&new_id), base);
    }

    #[test]
    fn test_missing_target_is_noop() {
        let tree = PanelNode::seed().split("main", Orientation::Horizontal);
        assert_eq!(tree.split("nonexistent", Orientation::Horizontal), tree);
        assert_eq!(tree.close("nonexistent"), tree);
        assert!(tree.try_split("nonexistent", Orientation::Vertical).is_none());
    }

    #[test]
    fn test_split_nodes_are_not_split_targets() {
        let tree = PanelNode::seed().split("main", Orientation::Horizontal);
        let split_id = tree.id().to_string();
        assert_eq!(tree.split(&split_id, Orientation::Vertical), tree);
        assert_eq!(tree.close(&split_id), tree);
    }

    #[test]
    fn test_close_last_leaf_resets_to_seed() {
        assert_eq!(PanelNode::seed().close("main"), PanelNode::seed());

        let lone = PanelNode::leaf("pane-x");
        assert_eq!(lone.close("pane-x"), PanelNode::seed());
    }

    #[test]
    fn test_close_collapses_parent_split() {
        // main | (a / b)  --close a-->  main | b
        let (tree, right) = PanelNode::seed()
            .try_split("main", Orientation::Horizontal)
            .unwrap();
        let (tree, bottom) = tree.try_split(&right, Orientation::Vertical).unwrap();
        let outer_id = tree.id().to_string();

        let closed = tree.close(&right);
        match &closed {
            PanelNode::Split { id, children, .. } => {
                assert_eq!(id, &outer_id);
                assert_eq!(children[0], PanelNode::leaf("main"));
                assert_eq!(children[1], PanelNode::leaf(bottom.clone()));
            }
            other => panic!("expected split, got {:?}", other),
        }
        assert_well_formed(&closed);
    }

    #[test]
    fn test_close_home_leaf_keeps_sibling() {
        let (tree, other) = PanelNode::seed()
            .try_split("main", Orientation::Horizontal)
            .unwrap();
        assert_eq!(tree.close("main"), PanelNode::leaf(other));
    }

    #[test]
    fn test_leaf_split_count_invariant_over_edits() {
        let mut tree = PanelNode::seed();
        let orientations = [Orientation::Horizontal, Orientation::Vertical];
        for step in 0..12 {
            let leaves: Vec<String> = tree.leaf_ids().iter().map(|s| s.to_string()).collect();
            let target = &leaves[step % leaves.len()];
            tree = tree.split(target, orientations[step % 2]);
            assert_well_formed(&tree);
        }
        assert_eq!(tree.leaf_count(), 13);

        while tree.leaf_count() > 1 {
            let leaves: Vec<String> = tree.leaf_ids().iter().map(|s| s.to_string()).collect();
            tree = tree.close(&leaves[leaves.len() / 2]);
            assert_well_formed(&tree);
        }
    }

    #[test]
    fn test_generated_ids_never_collide_with_home() {
        for _ in 0..50 {
            let id = next_panel_id();
            assert_ne!(id, HOME_PANEL_ID);
            assert!(id.starts_with("pane-"));
        }
    }

    #[test]
    fn test_set_and_clear_tab_references() {
        let (tree, other) = PanelNode::seed()
            .try_split("main", Orientation::Horizontal)
            .unwrap();
        let tree = tree
            .set_leaf_tab("main", Some("/finance"))
            .set_leaf_tab(&other, Some("/finance"));
        assert_eq!(tree.find_leaf(&other).unwrap().tab_id(), Some("/finance"));

        let cleared = tree.clear_tab_references("/finance");
        assert!(cleared.leaves().iter().all(|leaf| leaf.tab_id().is_none()));
        // Structure is untouched
        assert_eq!(cleared.leaf_ids(), tree.leaf_ids());
    }

    #[test]
    fn test_deep_nesting_still_splits() {
        let mut tree = PanelNode::seed();
        let mut target = HOME_PANEL_ID.to_string();
        for _ in 0..32 {
            let (next, new_leaf) = tree.try_split(&target, Orientation::Vertical).unwrap();
            tree = next;
            target = new_leaf;
        }
        assert_eq!(tree.leaf_count(), 33);
        assert_eq!(tree.first_leaf_id(), "main");
        assert_well_formed(&tree);
    }
}
