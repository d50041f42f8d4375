use crate::keys::KeyAction;

const SECTIONS: &[(&str, &[KeyAction])] = &[
    (
        "Panes",
        &[
            KeyAction::SplitHorizontal,
            KeyAction::SplitVertical,
            KeyAction::ToggleMaximize,
            KeyAction::ClosePanel,
            KeyAction::FocusNextPanel,
            KeyAction::FocusPrevPanel,
        ],
    ),
    (
        "Tabs",
        &[
            KeyAction::NextTab,
            KeyAction::PrevTab,
            KeyAction::MoveTabLeft,
            KeyAction::MoveTabRight,
            KeyAction::SelectTab(0),
            KeyAction::CloseTab,
            KeyAction::CloseAllTabs,
        ],
    ),
    (
        "Navigation",
        &[
            KeyAction::FocusSearch,
            KeyAction::HistoryBack,
            KeyAction::HistoryForward,
            KeyAction::GoHome,
            KeyAction::CommandPalette,
            KeyAction::Up,
            KeyAction::Down,
            KeyAction::Enter,
        ],
    ),
    (
        "General",
        &[
            KeyAction::ToggleSidebar,
            KeyAction::ToggleAssistant,
            KeyAction::Escape,
            KeyAction::Help,
            KeyAction::Quit,
        ],
    ),
];

/// Return the help text displayed in the help overlay.
pub fn help_text() -> String {
    let mut out = String::from("Tessera workspace shell\n");
    for (title, actions) in SECTIONS {
        out.push('\n');
        out.push_str(title);
        out.push_str(":\n");
        for action in *actions {
            let keys = match action.fallback_label() {
                Some(fallback) => format!("{} / {}", action.key_label(), fallback),
                None => action.key_label().to_string(),
            };
            out.push_str(&format!("  {:<14} {}\n", keys, action.help_text()));
        }
    }
    out.push_str(&format!("\nVersion: {}", env!("CARGO_PKG_VERSION")));
    out
}
