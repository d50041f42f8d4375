use ratatui::prelude::*;
use ratatui::widgets::Tabs;

use crate::workspace::TabRegistry;

/// Renders the open tabs as a single line, highlighting the active one.
pub struct TabBar<'a> {
    registry: &'a TabRegistry,
}

impl<'a> TabBar<'a> {
    pub fn new(registry: &'a TabRegistry) -> Self {
        Self { registry }
    }

    /// Index of the highlighted title, if the active tab is open.
    fn selected(&self) -> Option<usize> {
        self.registry
            .active_tab_id()
            .and_then(|id| self.registry.position(id))
    }
}

impl Widget for &TabBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        if self.registry.is_empty() {
            let hint = Line::from(Span::styled(
                "Home (no open tabs)",
                Style::default().fg(Color::DarkGray),
            ));
            buf.set_line(area.x, area.y, &hint, area.width);
            return;
        }

        let titles: Vec<Line<'_>> = self
            .registry
            .tabs()
            .iter()
            .map(|tab| match &tab.icon {
                Some(icon) => Line::from(format!("{} {}", icon, tab.title)),
                None => Line::from(tab.title.as_str()),
            })
            .collect();

        let tabs = Tabs::new(titles)
            .select(self.selected())
            .style(Style::default().fg(Color::DarkGray))
            .highlight_style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .divider("|");

        Widget::render(tabs, area, buf);
    }
}
