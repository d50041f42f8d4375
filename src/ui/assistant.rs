use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Side panel reserved for the assistant integration.
///
/// The assistant itself lives outside the shell; until one is attached the
/// panel only shows where it would appear.
pub struct AssistantPanel {
    status: String,
}

impl AssistantPanel {
    pub fn new() -> Self {
        Self {
            status: "No assistant connected.".to_string(),
        }
    }
}

impl Widget for &AssistantPanel {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Assistant ")
            .border_style(Style::default().fg(Color::Magenta));
        Paragraph::new(Span::styled(self.status.as_str(), Style::default().add_modifier(Modifier::DIM)))
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}
