use std::time::{Duration, Instant};

use ratatui::prelude::*;

use crate::keys::KeyAction;

const FLASH: Duration = Duration::from_millis(500);

/// Shows the main key bindings at the bottom of the screen.
pub struct MenuBar {
    flashed: Option<(KeyAction, Instant)>,
    /// Ctrl+Shift chords cannot reach the app, so show their Alt fallbacks.
    legacy_keys: bool,
}

/// Actions listed in the menu bar, in display order.
const MENU_ACTIONS: &[KeyAction] = &[
    KeyAction::SplitHorizontal,
    KeyAction::SplitVertical,
    KeyAction::ToggleMaximize,
    KeyAction::ClosePanel,
    KeyAction::CloseTab,
    KeyAction::NextTab,
    KeyAction::FocusSearch,
    KeyAction::ToggleSidebar,
    KeyAction::Help,
    KeyAction::Quit,
];

impl MenuBar {
    pub fn new() -> Self {
        Self {
            flashed: None,
            legacy_keys: false,
        }
    }

    pub fn set_legacy_keys(&mut self, legacy: bool) {
        self.legacy_keys = legacy;
    }

    /// Briefly highlight the binding of an action that just fired.
    pub fn flash(&mut self, action: KeyAction) {
        self.flashed = Some((action, Instant::now()));
    }

    fn flashing(&self) -> Option<KeyAction> {
        self.flashed
            .and_then(|(action, at)| (at.elapsed() < FLASH).then_some(action))
    }
}

fn short_name(action: KeyAction) -> &'static str {
    match action {
        KeyAction::SplitHorizontal => "Split",
        KeyAction::SplitVertical => "VSplit",
        KeyAction::ToggleMaximize => "Max",
        KeyAction::ClosePanel => "ClosePane",
        KeyAction::CloseTab => "CloseTab",
        KeyAction::NextTab => "NextTab",
        KeyAction::FocusSearch => "Go",
        KeyAction::ToggleSidebar => "Sidebar",
        KeyAction::Help => "Help",
        KeyAction::Quit => "Quit",
        other => other.help_text(),
    }
}

impl Widget for &MenuBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let flashing = self.flashing();
        let mut spans: Vec<Span<'_>> = Vec::new();

        for (i, action) in MENU_ACTIONS.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            let key_style = if flashing == Some(*action) {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            spans.push(Span::styled(
                action.display_label(!self.legacy_keys),
                key_style,
            ));
            spans.push(Span::raw(":"));
            spans.push(Span::styled(
                short_name(*action),
                Style::default().add_modifier(Modifier::DIM),
            ));
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
