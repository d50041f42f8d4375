use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::*;

/// Read-only scrollable text in a bordered popup (help screen).
pub struct TextOverlay {
    title: String,
    content: String,
    scroll: u16,
    dismissed: bool,
}

impl TextOverlay {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            scroll: 0,
            dismissed: false,
        }
    }

    /// Handle a key press. Returns true if the overlay consumed the key.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter | KeyCode::F(1) => {
                self.dismissed = true;
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let max = self.content.lines().count().saturating_sub(1) as u16;
                self.scroll = (self.scroll + 1).min(max);
                true
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
                true
            }
            _ => false,
        }
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// Render into `area`; centering is up to the caller.
    pub fn render_content(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", self.title));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

        Paragraph::new(self.content.as_str())
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(layout[0], buf);

        let footer = Line::from(vec![
            Span::styled("\u{2191}/\u{2193}", Style::default().fg(Color::Yellow).bold()),
            Span::styled(" scroll  ", Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::Yellow).bold()),
            Span::styled(" close", Style::default().fg(Color::DarkGray)),
        ]);
        Paragraph::new(footer)
            .alignment(Alignment::Center)
            .render(layout[1], buf);
    }
}
