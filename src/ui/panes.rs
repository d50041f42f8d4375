use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::workspace::{HOME_PANEL_ID, Orientation, PanelNode, Tab, WorkspaceState};

/// Supplies the body text of a pane showing a tab.
pub trait ContentResolver {
    fn resolve(&self, tab: &Tab) -> String;
}

/// Describes the view behind a tab until a real module renders it.
pub struct PlaceholderContent;

impl ContentResolver for PlaceholderContent {
    fn resolve(&self, tab: &Tab) -> String {
        let module = tab
            .href
            .split('/')
            .find(|s| !s.is_empty())
            .unwrap_or("home");
        format!("{}\n\nLocation: {}\nModule:   {}", tab.title, tab.href, module)
    }
}

/// Body of the home pane.
pub fn home_content() -> String {
    format!(
        "\
Tessera {}

Pick a destination in the sidebar, or press / to go to a location.
Ctrl+\\ splits the focused pane, Ctrl+Shift+M maximizes it.
Press F1 for all key bindings.",
        env!("CARGO_PKG_VERSION")
    )
}

const EMPTY_PANE_HINT: &str = "Empty pane. Focus it and open a location to fill it.";

/// Screen rectangles for every leaf, in reading order.
///
/// Horizontal splits divide the width, vertical splits the height, each
/// child getting half.
pub fn layout_leaves(node: &PanelNode, area: Rect) -> Vec<(String, Rect)> {
    let mut out = Vec::new();
    layout_into(node, area, &mut out);
    out
}

fn layout_into(node: &PanelNode, area: Rect, out: &mut Vec<(String, Rect)>) {
    match node {
        PanelNode::Leaf { id, .. } => out.push((id.clone(), area)),
        PanelNode::Split {
            orientation,
            children,
            ..
        } => {
            let halves = [Constraint::Percentage(50), Constraint::Percentage(50)];
            let rects = match orientation {
                Orientation::Horizontal => Layout::horizontal(halves).split(area),
                Orientation::Vertical => Layout::vertical(halves).split(area),
            };
            layout_into(&children[0], rects[0], out);
            layout_into(&children[1], rects[1], out);
        }
    }
}

/// Draws the visible panes of a workspace.
pub struct PaneView<'a> {
    state: &'a WorkspaceState,
    resolver: &'a dyn ContentResolver,
}

impl<'a> PaneView<'a> {
    pub fn new(state: &'a WorkspaceState, resolver: &'a dyn ContentResolver) -> Self {
        Self { state, resolver }
    }

    /// Where each visible leaf lands within `area`.
    pub fn placements(&self, area: Rect) -> Vec<(String, Rect)> {
        match self.state.visible_leaves().as_slice() {
            [only] => vec![(only.id().to_string(), area)],
            _ => layout_leaves(&self.state.root, area),
        }
    }

    fn title(&self, leaf: &PanelNode) -> String {
        let name = match leaf.tab_id() {
            Some(tab_id) => self
                .state
                .tabs
                .get(tab_id)
                .map(|t| t.title.clone())
                .unwrap_or_else(|| tab_id.to_string()),
            None if leaf.id() == HOME_PANEL_ID => "Home".to_string(),
            None => "Empty".to_string(),
        };
        if self.state.maximized_panel_id.as_deref() == Some(leaf.id()) {
            format!(" {} [max] ", name)
        } else {
            format!(" {} ", name)
        }
    }

    fn body(&self, leaf: &PanelNode) -> String {
        match leaf.tab_id() {
            Some(tab_id) => match self.state.tabs.get(tab_id) {
                Some(tab) => self.resolver.resolve(tab),
                None => EMPTY_PANE_HINT.to_string(),
            },
            None if leaf.id() == HOME_PANEL_ID => home_content(),
            None => EMPTY_PANE_HINT.to_string(),
        }
    }
}

impl Widget for &PaneView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let active = self.state.active_leaf().map(PanelNode::id);
        for (id, rect) in self.placements(area) {
            let Some(leaf) = self.state.root.find_leaf(&id) else {
                continue;
            };
            let border = if active == Some(id.as_str()) {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(self.title(leaf));

            Paragraph::new(self.body(leaf))
                .wrap(Wrap { trim: false })
                .block(block)
                .render(rect, buf);
        }
    }
}
