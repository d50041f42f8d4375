//! Keeps the current location and the tab registry in agreement.
//!
//! Two strictly separate directions:
//!
//! - **Reactive**: [`NavigationSync::on_location_change`] maps a location
//!   onto tab state. It opens or activates tabs and never navigates.
//! - **Imperative**: the tab actions ([`NavigationSync::click_tab`],
//!   [`NavigationSync::close_tab`], ...) change tab state and, if the active
//!   tab moved, issue exactly one navigation request.
//!
//! A request made by the imperative side comes back later as a location
//! change; by then the tab is already active so the reactive side stops.

use std::collections::VecDeque;
use tracing::{debug, info};

use super::controller::WorkspaceController;
use super::tabs::Tab;

/// The navigation primitive the shell exposes to the workspace.
pub trait Navigator {
    fn navigate_to(&mut self, href: &str);
}

/// In-process location history.
///
/// Navigation requests and back/forward moves queue a location-change event;
/// the shell drains them with [`History::take_pending`] once the current
/// handler has returned.
#[derive(Debug, Clone)]
pub struct History {
    current: String,
    back: Vec<String>,
    forward: Vec<String>,
    pending: VecDeque<String>,
}

impl History {
    /// Starts at `initial`, with that location queued as the first event.
    pub fn new(initial: impl Into<String>) -> Self {
        let current = initial.into();
        Self {
            pending: VecDeque::from([current.clone()]),
            current,
            back: Vec::new(),
            forward: Vec::new(),
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn take_pending(&mut self) -> Option<String> {
        self.pending.pop_front()
    }

    pub fn can_go_back(&self) -> bool {
        !self.back.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.forward.is_empty()
    }

    pub fn back(&mut self) -> bool {
        let Some(previous) = self.back.pop() else {
            return false;
        };
        let left = std::mem::replace(&mut self.current, previous);
        self.forward.push(left);
        self.pending.push_back(self.current.clone());
        true
    }

    pub fn forward(&mut self) -> bool {
        let Some(next) = self.forward.pop() else {
            return false;
        };
        let left = std::mem::replace(&mut self.current, next);
        self.back.push(left);
        self.pending.push_back(self.current.clone());
        true
    }
}

impl Navigator for History {
    fn navigate_to(&mut self, href: &str) {
        if href == self.current {
            return;
        }
        let left = std::mem::replace(&mut self.current, href.to_string());
        self.back.push(left);
        self.forward.clear();
        self.pending.push_back(href.to_string());
    }
}

/// Title for a location: its last non-empty path segment, decoded, with
/// `-`/`_` read as spaces and the first letter capitalized.
pub fn title_from_location(location: &str) -> String {
    let path = location.split(['?', '#']).next().unwrap_or(location);
    let Some(segment) = path.split('/').rfind(|s| !s.is_empty()) else {
        return location.to_string();
    };
    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());
    let words = decoded.replace(['-', '_'], " ");

    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => location.to_string(),
    }
}

/// Reconciles locations with open tabs. See the module docs.
#[derive(Debug, Clone)]
pub struct NavigationSync {
    home: String,
}

impl NavigationSync {
    pub fn new(home: impl Into<String>) -> Self {
        Self { home: home.into() }
    }

    pub fn home(&self) -> &str {
        &self.home
    }

    /// React to the location having changed. Never navigates.
    pub fn on_location_change(&self, workspace: &mut WorkspaceController, location: &str) {
        if location == self.home {
            debug!("home location, clearing active tab");
            workspace.set_active_tab(None);
            return;
        }

        let existing = workspace
            .state()
            .tabs
            .find_by_href(location)
            .map(|t| t.id.clone());
        match existing {
            Some(id) => {
                if workspace.state().tabs.active_tab_id() != Some(id.as_str()) {
                    debug!(id = %id, "location matches open tab");
                    workspace.set_active_tab(Some(&id));
                }
            }
            None => {
                let tab = Tab::for_location(location, title_from_location(location));
                info!(href = location, title = %tab.title, "opening tab for location");
                workspace.open_tab(tab);
            }
        }
    }

    /// User picked a tab.
    pub fn click_tab(&self, workspace: &mut WorkspaceController, nav: &mut dyn Navigator, id: &str) {
        self.drive(workspace, nav, |ws| ws.set_active_tab(Some(id)));
    }

    /// User closed a tab.
    pub fn close_tab(&self, workspace: &mut WorkspaceController, nav: &mut dyn Navigator, id: &str) {
        self.drive(workspace, nav, |ws| ws.close_tab(id));
    }

    pub fn close_active_tab(&self, workspace: &mut WorkspaceController, nav: &mut dyn Navigator) {
        if let Some(id) = workspace.state().tabs.active_tab_id().map(str::to_string) {
            self.close_tab(workspace, nav, &id);
        }
    }

    pub fn next_tab(&self, workspace: &mut WorkspaceController, nav: &mut dyn Navigator) {
        self.drive(workspace, nav, WorkspaceController::next_tab);
    }

    pub fn prev_tab(&self, workspace: &mut WorkspaceController, nav: &mut dyn Navigator) {
        self.drive(workspace, nav, WorkspaceController::prev_tab);
    }

    /// User closed every tab; the shell returns home.
    pub fn close_all_tabs(&self, workspace: &mut WorkspaceController, nav: &mut dyn Navigator) {
        self.drive(workspace, nav, WorkspaceController::reset_tabs);
    }

    /// Focus moving to a pane may bring its tab forward.
    pub fn focus_next_panel(&self, workspace: &mut WorkspaceController, nav: &mut dyn Navigator) {
        self.drive(workspace, nav, WorkspaceController::focus_next_panel);
    }

    pub fn focus_prev_panel(&self, workspace: &mut WorkspaceController, nav: &mut dyn Navigator) {
        self.drive(workspace, nav, WorkspaceController::focus_prev_panel);
    }

    /// Run a user action and navigate once if it moved the active tab.
    fn drive(
        &self,
        workspace: &mut WorkspaceController,
        nav: &mut dyn Navigator,
        action: impl FnOnce(&mut WorkspaceController),
    ) {
        let before = workspace.state().tabs.active_tab_id().map(str::to_string);
        action(workspace);

        let tabs = &workspace.state().tabs;
        if tabs.active_tab_id() == before.as_deref() {
            return;
        }
        let target = tabs.active_tab().map_or(self.home.as_str(), |t| t.href.as_str());
        info!(target, "active tab changed, navigating");
        nav.navigate_to(target);
    }
}
