use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

const MAX_INPUT_LEN: usize = 128;

/// Single-line prompt for a location to navigate to.
///
/// Tab completes the input to the first known location it prefixes.
pub struct LocationPrompt {
    title: String,
    input: String,
    cursor: usize,
    known: Vec<String>,
    submitted: bool,
    cancelled: bool,
}

impl LocationPrompt {
    pub fn new(title: impl Into<String>, known: Vec<String>) -> Self {
        Self {
            title: title.into(),
            input: String::new(),
            cursor: 0,
            known,
            submitted: false,
            cancelled: false,
        }
    }

    /// Handle a key event. Returns true if the prompt consumed the key.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter => {
                self.submitted = true;
                true
            }
            KeyCode::Esc => {
                self.cancelled = true;
                true
            }
            KeyCode::Tab => {
                if let Some(found) = self.completion() {
                    self.input = found.to_string();
                    self.cursor = self.input.chars().count();
                }
                true
            }
            KeyCode::Char(c) => {
                if self.input.chars().count() < MAX_INPUT_LEN {
                    let at = self.byte_index(self.cursor);
                    self.input.insert(at, c);
                    self.cursor += 1;
                }
                true
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.input.remove(at);
                }
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                if self.cursor < self.input.chars().count() {
                    self.cursor += 1;
                }
                true
            }
            _ => false,
        }
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_pos)
            .map_or(self.input.len(), |(i, _)| i)
    }

    fn completion(&self) -> Option<&str> {
        if self.input.is_empty() {
            return None;
        }
        self.known
            .iter()
            .map(String::as_str)
            .find(|loc| loc.starts_with(self.input.as_str()) && *loc != self.input)
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// The submitted input as an absolute location, or `None` if blank.
    pub fn location(&self) -> Option<String> {
        let trimmed = self.input.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.starts_with('/') {
            Some(trimmed.to_string())
        } else {
            Some(format!("/{}", trimmed))
        }
    }

    /// Render into `area`; centering is up to the caller.
    pub fn render_content(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", self.title));
        let inner = block.inner(area);
        block.render(area, buf);

        let at = self.byte_index(self.cursor);
        let (before, rest) = self.input.split_at(at);
        let mut rest_chars = rest.chars();
        let under_cursor = rest_chars.next().map_or(" ".to_string(), String::from);
        let after: String = rest_chars.collect();

        let input_line = Line::from(vec![
            Span::raw(before),
            Span::styled(under_cursor, Style::default().bg(Color::White).fg(Color::Black)),
            Span::raw(after),
        ]);

        let hint = match self.completion() {
            Some(found) => Line::from(Span::styled(
                format!("Tab \u{2192} {}", found),
                Style::default().fg(Color::DarkGray),
            )),
            None => Line::default(),
        };

        Paragraph::new(vec![
            input_line,
            hint,
            Line::from(vec![
                Span::styled("[Enter]", Style::default().fg(Color::Green).bold()),
                Span::raw(" Go  "),
                Span::styled("[Esc]", Style::default().fg(Color::Red).bold()),
                Span::raw(" Cancel"),
            ]),
        ])
        .render(inner, buf);
    }
}
