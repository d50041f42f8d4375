pub mod assistant;
pub mod menu;
pub mod overlay;
pub mod panes;
pub mod sidebar;
pub mod tab_bar;

pub use assistant::AssistantPanel;
pub use menu::MenuBar;
pub use panes::{PaneView, PlaceholderContent};
pub use sidebar::Sidebar;
pub use tab_bar::TabBar;

/// Width of the navigation sidebar, in columns.
pub const SIDEBAR_WIDTH: u16 = 26;
/// Width of the assistant side panel, in columns.
pub const ASSISTANT_WIDTH: u16 = 32;
