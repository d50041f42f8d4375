use serde::{Deserialize, Serialize};

/// A navigation target pinned open in the tab bar.
///
/// The id is the location itself, so a location maps to at most one tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub id: String,
    pub title: String,
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Tab {
    pub fn new(id: impl Into<String>, title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            href: href.into(),
            icon: None,
        }
    }

    /// A tab identified by its location.
    pub fn for_location(href: impl Into<String>, title: impl Into<String>) -> Self {
        let href = href.into();
        Self::new(href.clone(), title, href)
    }
}

/// Ordered set of open tabs plus the active one.
///
/// This is also the persisted record, serialized as
/// `{ "tabs": [...], "activeTabId": ... }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabRegistry {
    tabs: Vec<Tab>,
    active_tab_id: Option<String>,
}

impl TabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn active_tab_id(&self) -> Option<&str> {
        self.active_tab_id.as_deref()
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        let id = self.active_tab_id.as_deref()?;
        self.get(id)
    }

    pub fn get(&self, id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn find_by_href(&self, href: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.href == href)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    /// Open a tab, or activate it if one with the same id is already open.
    /// Existing tabs are never duplicated or reordered.
    pub fn open_tab(&mut self, tab: Tab) {
        if self.get(&tab.id).is_none() {
            self.active_tab_id = Some(tab.id.clone());
            self.tabs.push(tab);
        } else {
            self.active_tab_id = Some(tab.id);
        }
    }

    /// Remove a tab. If it was active, its right neighbour (or the new last
    /// tab) becomes active. Returns whether a tab was removed.
    pub fn close_tab(&mut self, id: &str) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.tabs.remove(index);

        if self.active_tab_id.as_deref() == Some(id) {
            self.active_tab_id = if self.tabs.is_empty() {
                None
            } else {
                let successor = index.min(self.tabs.len() - 1);
                Some(self.tabs[successor].id.clone())
            };
        }
        true
    }

    /// Set the active id without checking that it is open.
    pub fn set_active_tab(&mut self, id: Option<&str>) {
        self.active_tab_id = id.map(str::to_string);
    }

    pub fn next_tab(&mut self) {
        self.step(true);
    }

    pub fn prev_tab(&mut self) {
        self.step(false);
    }

    fn step(&mut self, forward: bool) {
        if self.tabs.is_empty() {
            return;
        }
        let len = self.tabs.len();
        // A stale or missing active id counts as the first tab
        let current = self
            .active_tab_id
            .as_deref()
            .and_then(|id| self.position(id))
            .unwrap_or(0);
        let target = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.active_tab_id = Some(self.tabs[target].id.clone());
    }

    /// Replace the list wholesale (drag-to-reorder). Not validated.
    pub fn set_tabs(&mut self, tabs: Vec<Tab>) {
        self.tabs = tabs;
    }

    /// Drop everything, returning to the empty initial state.
    pub fn reset(&mut self) {
        self.tabs.clear();
        self.active_tab_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab(id: &str) -> Tab {
        Tab::new(id, id.to_uppercase(), format!("/{}", id))
    }

    fn registry(ids: &[&str], active: Option<&str>) -> TabRegistry {
        let mut reg = TabRegistry::new();
        reg.set_tabs(ids.iter().map(|id| tab(id)).collect());
        reg.set_active_tab(active);
        reg
    }

    fn ids(reg: &TabRegistry) -> Vec<&str> {
        reg.tabs().iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_open_appends_and_activates() {
        let mut reg = TabRegistry::new();
        reg.open_tab(tab("a"));
        reg.open_tab(tab("b"));
        assert_eq!(ids(&reg), vec!["a", "b"]);
        assert_eq!(reg.active_tab_id(), Some("b"));
    }

    #[test]
    fn test_open_existing_is_idempotent() {
        let mut reg = registry(&["a", "b", "c"], Some("c"));
        reg.open_tab(tab("a"));
        reg.open_tab(tab("a"));
        assert_eq!(ids(&reg), vec!["a", "b", "c"]);
        assert_eq!(reg.active_tab_id(), Some("a"));
    }

    #[test]
    fn test_open_existing_keeps_original_title() {
        let mut reg = registry(&["a"], None);
        reg.open_tab(Tab::new("a", "Renamed", "/a"));
        assert_eq!(reg.get("a").unwrap().title, "A");
    }

    #[test]
    fn test_close_active_middle_activates_right_neighbour() {
        let mut reg = registry(&["a", "b", "c"], Some("b"));
        assert!(reg.close_tab("b"));
        assert_eq!(ids(&reg), vec!["a", "c"]);
        assert_eq!(reg.active_tab_id(), Some("c"));
    }

    #[test]
    fn test_close_active_last_activates_new_last() {
        let mut reg = registry(&["a", "b", "c"], Some("c"));
        reg.close_tab("c");
        assert_eq!(reg.active_tab_id(), Some("b"));
    }

    #[test]
    fn test_close_inactive_keeps_active() {
        let mut reg = registry(&["a", "b", "c"], Some("c"));
        reg.close_tab("a");
        assert_eq!(ids(&reg), vec!["b", "c"]);
        assert_eq!(reg.active_tab_id(), Some("c"));
    }

    #[test]
    fn test_close_only_tab_clears_active() {
        let mut reg = registry(&["a"], Some("a"));
        reg.close_tab("a");
        assert!(reg.is_empty());
        assert_eq!(reg.active_tab_id(), None);
    }

    #[test]
    fn test_close_unknown_is_noop() {
        let mut reg = registry(&["a", "b"], Some("a"));
        assert!(!reg.close_tab("zzz"));
        assert_eq!(reg, registry(&["a", "b"], Some("a")));
    }

    #[test]
    fn test_next_tab_cycles() {
        let mut reg = registry(&["a", "b", "c"], Some("a"));
        reg.next_tab();
        assert_eq!(reg.active_tab_id(), Some("b"));
        reg.next_tab();
        assert_eq!(reg.active_tab_id(), Some("c"));
        reg.next_tab();
        assert_eq!(reg.active_tab_id(), Some("a"));
    }

    #[test]
    fn test_prev_tab_cycles() {
        let mut reg = registry(&["a", "b", "c"], Some("a"));
        reg.prev_tab();
        assert_eq!(reg.active_tab_id(), Some("c"));
        reg.prev_tab();
        assert_eq!(reg.active_tab_id(), Some("b"));
        reg.prev_tab();
        assert_eq!(reg.active_tab_id(), Some("a"));
    }

    #[test]
    fn test_cycle_from_stale_active_starts_at_first() {
        let mut reg = registry(&["a", "b", "c"], Some("gone"));
        reg.next_tab();
        assert_eq!(reg.active_tab_id(), Some("b"));

        let mut reg = registry(&["a", "b", "c"], None);
        reg.prev_tab();
        assert_eq!(reg.active_tab_id(), Some("c"));
    }

    #[test]
    fn test_cycle_on_empty_is_noop() {
        let mut reg = TabRegistry::new();
        reg.next_tab();
        reg.prev_tab();
        assert_eq!(reg, TabRegistry::new());
    }

    #[test]
    fn test_set_tabs_reorders() {
        let mut reg = registry(&["a", "b", "c"], Some("b"));
        reg.set_tabs(vec![tab("c"), tab("a"), tab("b")]);
        assert_eq!(ids(&reg), vec!["c", "a", "b"]);
        assert_eq!(reg.active_tab_id(), Some("b"));
    }

    #[test]
    fn test_serialized_shape() {
        let mut reg = TabRegistry::new();
        reg.open_tab(Tab {
            icon: Some("wallet".into()),
            ..Tab::for_location("/payroll/runs", "Runs")
        });
        let json = serde_json::to_value(&reg).unwrap();
        assert_eq!(json["activeTabId"], "/payroll/runs");
        assert_eq!(json["tabs"][0]["href"], "/payroll/runs");
        assert_eq!(json["tabs"][0]["icon"], "wallet");

        let mut plain = TabRegistry::new();
        plain.open_tab(tab("a"));
        let json = serde_json::to_string(&plain).unwrap();
        assert!(!json.contains("icon"));
    }
}
