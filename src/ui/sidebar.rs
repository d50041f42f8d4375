use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget};

use crate::config::Destination;

/// Navigation sidebar listing the configured destinations.
pub struct Sidebar {
    selected: usize,
    entries: Vec<Destination>,
    current: Option<String>,
}

impl Sidebar {
    pub fn new(entries: Vec<Destination>) -> Self {
        Self {
            selected: 0,
            entries,
            current: None,
        }
    }

    pub fn select_next(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.entries.len();
    }

    pub fn select_previous(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        if self.selected == 0 {
            self.selected = self.entries.len() - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn selected(&self) -> Option<&Destination> {
        self.entries.get(self.selected)
    }

    /// Mark the entry matching the current location, if any.
    pub fn set_current(&mut self, location: &str) {
        self.current = Some(location.to_string());
    }

    fn list_state(&self) -> ListState {
        let mut state = ListState::default();
        if !self.entries.is_empty() {
            state.select(Some(self.selected));
        }
        state
    }

    fn item(&self, entry: &Destination) -> ListItem<'static> {
        let is_current = self.current.as_deref() == Some(entry.href.as_str());
        let (marker, style) = if is_current {
            ("\u{25cf}", Style::default().fg(Color::Green))
        } else {
            ("\u{25cb}", Style::default().add_modifier(Modifier::DIM))
        };
        ListItem::new(Line::from(vec![
            Span::styled(marker.to_string(), style),
            Span::raw(" "),
            Span::raw(entry.label.clone()),
        ]))
    }
}

impl StatefulWidget for &Sidebar {
    type State = ListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let items: Vec<ListItem<'static>> = self.entries.iter().map(|e| self.item(e)).collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Navigate"))
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("\u{25b8} ");

        StatefulWidget::render(list, area, buf, state);
    }
}

impl Widget for &Sidebar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut state = self.list_state();
        StatefulWidget::render(self, area, buf, &mut state);
    }
}
