use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Logical key actions in the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    ToggleSidebar,
    SplitHorizontal,
    SplitVertical,
    ToggleMaximize,
    CommandPalette,
    ToggleAssistant,
    FocusSearch,
    Escape,
    CloseTab,
    CloseAllTabs,
    ClosePanel,
    NextTab,
    PrevTab,
    MoveTabLeft,
    MoveTabRight,
    /// Zero-based position in the tab bar.
    SelectTab(usize),
    FocusNextPanel,
    FocusPrevPanel,
    HistoryBack,
    HistoryForward,
    GoHome,
    Up,
    Down,
    Enter,
    Help,
    Quit,
}

impl KeyAction {
    /// Human-readable help text for this key action.
    pub fn help_text(&self) -> &'static str {
        match self {
            KeyAction::ToggleSidebar => "Toggle sidebar",
            KeyAction::SplitHorizontal => "Split pane side by side",
            KeyAction::SplitVertical => "Split pane top/bottom",
            KeyAction::ToggleMaximize => "Maximize / restore pane",
            KeyAction::CommandPalette => "Command palette",
            KeyAction::ToggleAssistant => "Toggle assistant panel",
            KeyAction::FocusSearch => "Go to location",
            KeyAction::Escape => "Close overlay",
            KeyAction::CloseTab => "Close tab",
            KeyAction::CloseAllTabs => "Close all tabs",
            KeyAction::ClosePanel => "Close pane",
            KeyAction::NextTab => "Next tab",
            KeyAction::PrevTab => "Previous tab",
            KeyAction::MoveTabLeft => "Move tab left",
            KeyAction::MoveTabRight => "Move tab right",
            KeyAction::SelectTab(_) => "Go to tab 1-9",
            KeyAction::FocusNextPanel => "Focus next pane",
            KeyAction::FocusPrevPanel => "Focus previous pane",
            KeyAction::HistoryBack => "Back",
            KeyAction::HistoryForward => "Forward",
            KeyAction::GoHome => "Go home",
            KeyAction::Up => "Sidebar up",
            KeyAction::Down => "Sidebar down",
            KeyAction::Enter => "Open sidebar entry",
            KeyAction::Help => "Toggle help",
            KeyAction::Quit => "Quit",
        }
    }

    /// Short key label for display in menus.
    pub fn key_label(&self) -> &'static str {
        match self {
            KeyAction::ToggleSidebar => "C-b",
            KeyAction::SplitHorizontal => "C-\\",
            KeyAction::SplitVertical => "C-S-\\",
            KeyAction::ToggleMaximize => "C-S-m",
            KeyAction::CommandPalette => "C-S-p",
            KeyAction::ToggleAssistant => "C-S-i",
            KeyAction::FocusSearch => "/",
            KeyAction::Escape => "Esc",
            KeyAction::CloseTab => "C-w",
            KeyAction::CloseAllTabs => "C-A-w",
            KeyAction::ClosePanel => "C-S-w",
            KeyAction::NextTab => "C-PgDn",
            KeyAction::PrevTab => "C-PgUp",
            KeyAction::MoveTabLeft => "C-S-PgUp",
            KeyAction::MoveTabRight => "C-S-PgDn",
            KeyAction::SelectTab(_) => "A-1..9",
            KeyAction::FocusNextPanel => "C-o",
            KeyAction::FocusPrevPanel => "C-S-o",
            KeyAction::HistoryBack => "A-\u{2190}",
            KeyAction::HistoryForward => "A-\u{2192}",
            KeyAction::GoHome => "A-Home",
            KeyAction::Up => "\u{2191}",
            KeyAction::Down => "\u{2193}",
            KeyAction::Enter => "Enter",
            KeyAction::Help => "F1",
            KeyAction::Quit => "C-q",
        }
    }

    /// Alternate chord for actions whose primary chord needs Shift next to
    /// Ctrl. Terminals without enhanced key reporting cannot send those.
    pub fn fallback_label(&self) -> Option<&'static str> {
        match self {
            KeyAction::SplitVertical => Some("A--"),
            KeyAction::ToggleMaximize => Some("A-m"),
            KeyAction::CommandPalette => Some("A-p"),
            KeyAction::ToggleAssistant => Some("A-i"),
            KeyAction::ClosePanel => Some("A-w"),
            KeyAction::FocusPrevPanel => Some("A-o"),
            _ => None,
        }
    }

    /// The label to show, given whether Ctrl+Shift chords reach the app.
    pub fn display_label(&self, shift_chords: bool) -> &'static str {
        match self.fallback_label() {
            Some(fallback) if !shift_chords => fallback,
            _ => self.key_label(),
        }
    }
}

const CTRL: KeyModifiers = KeyModifiers::CONTROL;
const CTRL_SHIFT: KeyModifiers = KeyModifiers::CONTROL.union(KeyModifiers::SHIFT);
const CTRL_ALT: KeyModifiers = KeyModifiers::CONTROL.union(KeyModifiers::ALT);
const ALT: KeyModifiers = KeyModifiers::ALT;

/// Reduce an event to (code, modifiers) so chords compare exactly.
///
/// Uppercase letters carry an implicit Shift, `|` is Shift+`\`, and legacy
/// terminals report Ctrl+`\` as Ctrl+`4`.
fn normalize(event: KeyEvent) -> (KeyCode, KeyModifiers) {
    let mut mods = event.modifiers
        & (KeyModifiers::CONTROL | KeyModifiers::SHIFT | KeyModifiers::ALT | KeyModifiers::SUPER);
    let code = match event.code {
        KeyCode::Char(c) if c.is_ascii_uppercase() => {
            mods |= KeyModifiers::SHIFT;
            KeyCode::Char(c.to_ascii_lowercase())
        }
        KeyCode::Char('|') => {
            mods |= KeyModifiers::SHIFT;
            KeyCode::Char('\\')
        }
        KeyCode::Char('4') if mods.contains(KeyModifiers::CONTROL) => KeyCode::Char('\\'),
        other => other,
    };
    (code, mods)
}

/// Map a key event to a logical action.
///
/// While a text input has focus only Escape is bound; every other key
/// belongs to the input.
pub fn map_key(event: KeyEvent, input_focused: bool) -> Option<KeyAction> {
    let (code, mods) = normalize(event);

    if input_focused {
        return (code == KeyCode::Esc && mods.is_empty()).then_some(KeyAction::Escape);
    }

    match (code, mods) {
        // Ctrl/Cmd+B
        (KeyCode::Char('b'), m) if m == CTRL || m == KeyModifiers::SUPER => {
            Some(KeyAction::ToggleSidebar)
        }

        // Panes
        (KeyCode::Char('\\'), m) if m == CTRL => Some(KeyAction::SplitHorizontal),
        (KeyCode::Char('\\'), m) if m == CTRL_SHIFT => Some(KeyAction::SplitVertical),
        (KeyCode::Char('m'), m) if m == CTRL_SHIFT => Some(KeyAction::ToggleMaximize),
        (KeyCode::Char('w'), m) if m == CTRL_SHIFT => Some(KeyAction::ClosePanel),
        (KeyCode::Char('o'), m) if m == CTRL => Some(KeyAction::FocusNextPanel),
        (KeyCode::Char('o'), m) if m == CTRL_SHIFT => Some(KeyAction::FocusPrevPanel),

        // Overlays and side panels
        (KeyCode::Char('p'), m) if m == CTRL_SHIFT => Some(KeyAction::CommandPalette),
        (KeyCode::Char('i'), m) if m == CTRL_SHIFT => Some(KeyAction::ToggleAssistant),
        (KeyCode::Char('/'), m) if m.is_empty() => Some(KeyAction::FocusSearch),
        (KeyCode::Esc, m) if m.is_empty() => Some(KeyAction::Escape),

        // Alt fallbacks for the Ctrl+Shift chords
        (KeyCode::Char('-'), m) if m == ALT => Some(KeyAction::SplitVertical),
        (KeyCode::Char('m'), m) if m == ALT => Some(KeyAction::ToggleMaximize),
        (KeyCode::Char('p'), m) if m == ALT => Some(KeyAction::CommandPalette),
        (KeyCode::Char('i'), m) if m == ALT => Some(KeyAction::ToggleAssistant),
        (KeyCode::Char('w'), m) if m == ALT => Some(KeyAction::ClosePanel),
        (KeyCode::Char('o'), m) if m == ALT => Some(KeyAction::FocusPrevPanel),

        // Tabs and history
        (KeyCode::Char('w'), m) if m == CTRL => Some(KeyAction::CloseTab),
        (KeyCode::Char('w'), m) if m == CTRL_ALT => Some(KeyAction::CloseAllTabs),
        (KeyCode::PageDown, m) if m == CTRL => Some(KeyAction::NextTab),
        (KeyCode::PageUp, m) if m == CTRL => Some(KeyAction::PrevTab),
        (KeyCode::PageDown, m) if m == CTRL_SHIFT => Some(KeyAction::MoveTabRight),
        (KeyCode::PageUp, m) if m == CTRL_SHIFT => Some(KeyAction::MoveTabLeft),
        (KeyCode::Char(c @ '1'..='9'), m) if m == ALT => {
            Some(KeyAction::SelectTab(c as usize - '1' as usize))
        }
        (KeyCode::Left, m) if m == ALT => Some(KeyAction::HistoryBack),
        (KeyCode::Right, m) if m == ALT => Some(KeyAction::HistoryForward),
        (KeyCode::Home, m) if m == ALT => Some(KeyAction::GoHome),

        // Sidebar
        (KeyCode::Up, m) if m.is_empty() => Some(KeyAction::Up),
        (KeyCode::Down, m) if m.is_empty() => Some(KeyAction::Down),
        (KeyCode::Enter, m) if m.is_empty() => Some(KeyAction::Enter),

        (KeyCode::F(1), m) if m.is_empty() => Some(KeyAction::Help),
        (KeyCode::Char('q'), m) if m == CTRL => Some(KeyAction::Quit),

        _ => None,
    }
}
