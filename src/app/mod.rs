pub mod help;

use crossterm::event::{
    self, Event, KeyEvent, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use ratatui::prelude::*;
use ratatui::widgets::Clear;
use std::io::{self, Write};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::keys::{map_key, KeyAction};
use crate::ui::overlay::{centered_rect, LocationPrompt, TextOverlay};
use crate::ui::{
    AssistantPanel, MenuBar, PaneView, PlaceholderContent, Sidebar, TabBar, ASSISTANT_WIDTH,
    SIDEBAR_WIDTH,
};
use crate::workspace::{
    FileStorage, History, NavigationSync, Navigator, Orientation, TabStorage, WorkspaceController,
    store::SubscriptionId,
};

/// Lets Ctrl+Shift chords reach the app as distinct key events.
const KEYBOARD_FLAGS: KeyboardEnhancementFlags = KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
    .union(KeyboardEnhancementFlags::REPORT_ALTERNATE_KEYS);

/// Application state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppState {
    Default,
    Prompt,
    Help,
}

pub struct App {
    // State
    state: AppState,
    running: bool,
    show_sidebar: bool,
    show_assistant: bool,

    // Config
    config: Config,

    // Workspace
    workspace: WorkspaceController,
    sync: NavigationSync,
    history: History,
    change_log: SubscriptionId,

    // UI components
    sidebar: Sidebar,
    menu: MenuBar,
    assistant: AssistantPanel,
    content: PlaceholderContent,

    // Overlays
    prompt: Option<LocationPrompt>,
    help_overlay: Option<TextOverlay>,
}

impl App {
    /// Build the shell. Without an explicit location it resumes at the
    /// restored active tab, or at home.
    pub fn new(
        config: Config,
        storage: Option<Box<dyn TabStorage>>,
        location: Option<String>,
    ) -> Self {
        let mut workspace = match storage {
            Some(storage) => WorkspaceController::with_storage(storage),
            None => WorkspaceController::new(),
        };
        if config.restore_tabs {
            workspace.restore_tabs();
        }
        let change_log = workspace.subscribe(|s| {
            debug!(
                panes = s.root.leaf_count(),
                tabs = s.tabs.len(),
                active_tab = ?s.tabs.active_tab_id(),
                active_pane = %s.active_panel_id,
                "workspace changed"
            );
        });

        let start = location
            .or_else(|| workspace.state().tabs.active_tab().map(|t| t.href.clone()))
            .unwrap_or_else(|| config.home_location.clone());
        info!(location = %start, "starting workspace");

        let mut app = Self {
            state: AppState::Default,
            running: true,
            show_sidebar: config.show_sidebar,
            show_assistant: false,
            sync: NavigationSync::new(config.home_location.clone()),
            history: History::new(start),
            change_log,
            sidebar: Sidebar::new(config.destinations.clone()),
            menu: MenuBar::new(),
            assistant: AssistantPanel::new(),
            content: PlaceholderContent,
            prompt: None,
            help_overlay: None,
            workspace,
            config,
        };
        app.pump_navigation();
        app
    }

    /// Record whether the terminal reports Ctrl+Shift chords. Without it the
    /// menu advertises the Alt fallbacks instead.
    pub fn set_keyboard_enhanced(&mut self, enhanced: bool) {
        self.menu.set_legacy_keys(!enhanced);
    }

    /// Run the main TUI event loop.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()>
    where
        B::Error: Send + Sync + 'static,
    {
        while self.running {
            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(Duration::from_millis(250))?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    /// Route a raw key event by the current state, then settle navigation.
    fn handle_key(&mut self, key: KeyEvent) {
        match self.state {
            AppState::Prompt => self.handle_prompt_key(key),
            AppState::Help => self.handle_help_key(key),
            AppState::Default => {
                if let Some(action) = map_key(key, false) {
                    self.handle_key_action(action);
                }
            }
        }
        self.pump_navigation();
    }

    /// Deliver queued location changes to the reactive side of the sync.
    fn pump_navigation(&mut self) {
        while let Some(location) = self.history.take_pending() {
            self.sync.on_location_change(&mut self.workspace, &location);
            self.sidebar.set_current(&location);
        }
    }

    /// Handle a mapped key action in Default state.
    fn handle_key_action(&mut self, action: KeyAction) {
        self.menu.flash(action);
        match action {
            KeyAction::ToggleSidebar => self.show_sidebar = !self.show_sidebar,
            KeyAction::ToggleAssistant => self.show_assistant = !self.show_assistant,
            KeyAction::SplitHorizontal => {
                self.workspace.split_active(Orientation::Horizontal);
            }
            KeyAction::SplitVertical => {
                self.workspace.split_active(Orientation::Vertical);
            }
            KeyAction::ToggleMaximize => self.workspace.toggle_maximize_active(),
            KeyAction::ClosePanel => self.workspace.close_active_panel(),
            KeyAction::FocusNextPanel => {
                self.sync
                    .focus_next_panel(&mut self.workspace, &mut self.history);
            }
            KeyAction::FocusPrevPanel => {
                self.sync
                    .focus_prev_panel(&mut self.workspace, &mut self.history);
            }
            KeyAction::CloseTab => {
                self.sync
                    .close_active_tab(&mut self.workspace, &mut self.history);
            }
            KeyAction::CloseAllTabs => {
                self.sync
                    .close_all_tabs(&mut self.workspace, &mut self.history);
            }
            KeyAction::NextTab => self.sync.next_tab(&mut self.workspace, &mut self.history),
            KeyAction::PrevTab => self.sync.prev_tab(&mut self.workspace, &mut self.history),
            KeyAction::MoveTabLeft => self.workspace.move_active_tab(false),
            KeyAction::MoveTabRight => self.workspace.move_active_tab(true),
            KeyAction::SelectTab(index) => {
                let id = self
                    .workspace
                    .state()
                    .tabs
                    .tabs()
                    .get(index)
                    .map(|t| t.id.clone());
                if let Some(id) = id {
                    self.sync
                        .click_tab(&mut self.workspace, &mut self.history, &id);
                }
            }
            KeyAction::HistoryBack => {
                self.history.back();
            }
            KeyAction::HistoryForward => {
                self.history.forward();
            }
            KeyAction::GoHome => {
                let home = self.sync.home().to_string();
                self.history.navigate_to(&home);
            }
            KeyAction::FocusSearch | KeyAction::CommandPalette => self.open_prompt(),
            KeyAction::Up => self.sidebar.select_previous(),
            KeyAction::Down => self.sidebar.select_next(),
            KeyAction::Enter => {
                if let Some(dest) = self.sidebar.selected() {
                    let href = dest.href.clone();
                    self.history.navigate_to(&href);
                }
            }
            KeyAction::Help => {
                self.state = AppState::Help;
                self.help_overlay = Some(TextOverlay::new("Help", help::help_text()));
            }
            KeyAction::Quit => self.running = false,
            // Nothing is open in Default state
            KeyAction::Escape => {}
        }
    }

    fn open_prompt(&mut self) {
        let known = self
            .config
            .destinations
            .iter()
            .map(|d| d.href.clone())
            .chain(self.workspace.state().tabs.tabs().iter().map(|t| t.href.clone()))
            .collect();
        self.prompt = Some(LocationPrompt::new("Go to location", known));
        self.state = AppState::Prompt;
    }

    fn close_overlays(&mut self) {
        self.prompt = None;
        self.help_overlay = None;
        self.state = AppState::Default;
    }

    /// Handle key events while the location prompt has focus.
    fn handle_prompt_key(&mut self, key: KeyEvent) {
        if map_key(key, true) == Some(KeyAction::Escape) {
            self.close_overlays();
            return;
        }
        let Some(prompt) = self.prompt.as_mut() else {
            self.state = AppState::Default;
            return;
        };
        prompt.handle_key(key);

        if prompt.is_submitted() {
            let location = prompt.location();
            self.close_overlays();
            if let Some(location) = location {
                self.history.navigate_to(&location);
            }
        } else if prompt.is_cancelled() {
            self.close_overlays();
        }
    }

    /// Handle key events while the help overlay is active.
    fn handle_help_key(&mut self, key: KeyEvent) {
        if map_key(key, true) == Some(KeyAction::Escape) {
            self.close_overlays();
            return;
        }
        if let Some(ref mut overlay) = self.help_overlay {
            overlay.handle_key(key.code);
            if overlay.is_dismissed() {
                self.close_overlays();
            }
        }
    }

    /// Draw all UI components.
    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();

        // [tab bar | body | menu]
        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

        // Tab bar with history arrows and the current location on the right
        let location = self.history.current();
        let arrow = |enabled: bool, glyph: &'static str| {
            let style = if enabled {
                Style::default()
            } else {
                Style::default().add_modifier(Modifier::DIM)
            };
            Span::styled(glyph, style)
        };
        let status = Line::from(vec![
            arrow(self.history.can_go_back(), "\u{2190}"),
            arrow(self.history.can_go_forward(), "\u{2192}"),
            Span::raw(" "),
            Span::styled(location, Style::default().fg(Color::Cyan)),
        ]);
        let status_width = u16::try_from(status.width())
            .unwrap_or(u16::MAX)
            .saturating_add(2);
        let top = Layout::horizontal([Constraint::Min(1), Constraint::Length(status_width)])
            .split(rows[0]);
        frame.render_widget(&TabBar::new(&self.workspace.state().tabs), top[0]);
        frame.render_widget(status.alignment(Alignment::Right), top[1]);

        // Body: [sidebar? | panes | assistant?]
        let mut constraints = Vec::new();
        if self.show_sidebar {
            constraints.push(Constraint::Length(SIDEBAR_WIDTH));
        }
        constraints.push(Constraint::Min(1));
        if self.show_assistant {
            constraints.push(Constraint::Length(ASSISTANT_WIDTH));
        }
        let body = Layout::horizontal(constraints).split(rows[1]);

        let mut column = 0;
        if self.show_sidebar {
            frame.render_widget(&self.sidebar, body[column]);
            column += 1;
        }
        let panes = PaneView::new(self.workspace.state(), &self.content);
        frame.render_widget(&panes, body[column]);
        if self.show_assistant {
            frame.render_widget(&self.assistant, body[column + 1]);
        }

        frame.render_widget(&self.menu, rows[2]);

        // Overlays on top
        match self.state {
            AppState::Prompt => {
                if let Some(ref prompt) = self.prompt {
                    let popup = centered_rect(60, 20, area);
                    frame.render_widget(Clear, popup);
                    prompt.render_content(popup, frame.buffer_mut());
                }
            }
            AppState::Help => {
                if let Some(ref overlay) = self.help_overlay {
                    let popup = centered_rect(60, 80, area);
                    frame.render_widget(Clear, popup);
                    overlay.render_content(popup, frame.buffer_mut());
                }
            }
            AppState::Default => {}
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.workspace.unsubscribe(self.change_log);
    }
}

fn push_keyboard_flags(out: &mut impl Write) -> io::Result<()> {
    crossterm::execute!(out, PushKeyboardEnhancementFlags(KEYBOARD_FLAGS))
}

/// Set up terminal, run the TUI app, and restore terminal on exit.
pub fn run(
    config: Config,
    config_dir: std::path::PathBuf,
    location: Option<String>,
) -> anyhow::Result<()> {
    let storage: Box<dyn TabStorage> = Box::new(FileStorage::new(&config_dir));
    let mut app = App::new(config, Some(storage), location);

    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let keyboard_enhanced = match crossterm::terminal::supports_keyboard_enhancement() {
        Ok(true) => push_keyboard_flags(&mut stdout).is_ok(),
        _ => false,
    };
    if keyboard_enhanced {
        info!("keyboard enhancement enabled");
    } else {
        warn!("terminal cannot report Ctrl+Shift chords, using Alt fallbacks");
    }
    app.set_keyboard_enhanced(keyboard_enhanced);
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    if keyboard_enhanced {
        crossterm::execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen
    )?;

    result
}

// ── Test support ────────────────────────────────────────────────────

#[cfg(test)]
impl App {
    /// Create an App suitable for unit testing (no storage).
    fn new_for_test() -> Self {
        Self::new(Config::default(), None, None)
    }
}
