//! Workspace layout engine: the pane tree, the tab registry, and the
//! navigation sync that ties the tabs to the current location.

pub mod controller;
pub mod nav;
pub mod panel;
pub mod storage;
pub mod store;
pub mod tabs;

pub use controller::{WorkspaceController, WorkspaceState};
pub use nav::{History, NavigationSync, Navigator};
pub use panel::{HOME_PANEL_ID, Orientation, PanelNode};
pub use storage::{FileStorage, TabStorage};
pub use tabs::{Tab, TabRegistry};
