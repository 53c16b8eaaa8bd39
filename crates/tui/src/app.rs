//! Application state and logic for the applydeck TUI.
//!
//! This module contains the central state container and the message
//! handler that folds user actions and background task outcomes into
//! state changes. Rendering never mutates state and the handler never
//! touches the terminal, so every transition here is unit-testable
//! without a running UI.

use std::time::{Duration, Instant};

use applydeck_types::{BotStatus, Effect, LogEntry, LogStore, Msg, Tab, TaskOutcome};
use applydeck_util::{config_to_text, UserPreferences};
use chrono::{DateTime, Local};
use ratatui::widgets::TableState;
use tracing::warn;

/// How long a toast stays fully visible before it starts fading.
pub const TOAST_VISIBLE: Duration = Duration::from_millis(3000);
/// How long the fade lasts before the toast is dropped.
pub const TOAST_FADE: Duration = Duration::from_millis(300);

/// Severity of a toast notification, mapped to a theme color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
    Warning,
}

/// A transient notification shown above the active view.
#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
    born: Instant,
}

impl Toast {
    pub fn new(kind: ToastKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            born: Instant::now(),
        }
    }

    /// Whether the toast has entered its fade at the given instant.
    pub fn is_fading(&self, now: Instant) -> bool {
        now.duration_since(self.born) >= TOAST_VISIBLE
    }

    /// Whether the toast has outlived its fade and should be dropped.
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.born) >= TOAST_VISIBLE + TOAST_FADE
    }
}

/// Which part of the dashboard receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardFocus {
    /// The log table.
    #[default]
    Table,
    /// The search input.
    Search,
}

/// State for the run log view: the collection, the cursor into its
/// visible set, and the detail modal.
#[derive(Debug, Default)]
pub struct DashboardState {
    pub store: LogStore,
    pub focus: DashboardFocus,
    /// Cursor position within the visible (filtered, sorted) set.
    pub selected: usize,
    pub table_state: TableState,
    pub detail_open: bool,
    pub detail_scroll: u16,
    /// Error text from the last failed fetch. Stale rows stay on
    /// screen; this only drives the error banner.
    pub load_error: Option<String>,
}

impl DashboardState {
    /// Record under the cursor, resolved through the visible set.
    pub fn selected_entry(&self) -> Option<&LogEntry> {
        let at = *self.store.visible_indices().get(self.selected)?;
        self.store.entry(at)
    }

    /// Moves the cursor by `delta` within the visible set.
    fn move_selection(&mut self, delta: isize) {
        let len = self.store.visible_indices().len();
        if len == 0 {
            return;
        }
        let next = if delta > 0 {
            self.selected.saturating_add(delta as usize)
        } else {
            self.selected.saturating_sub((-delta) as usize)
        };
        self.selected = next.min(len - 1);
        self.table_state.select(Some(self.selected));
    }

    /// Keeps the cursor inside the visible set after the set shrank.
    fn clamp_selection(&mut self) {
        let len = self.store.visible_indices().len();
        if len == 0 {
            self.selected = 0;
            self.table_state.select(None);
        } else {
            self.selected = self.selected.min(len - 1);
            self.table_state.select(Some(self.selected));
        }
    }

    /// Jumps back to the top row, e.g. after the filter changed.
    fn reset_selection(&mut self) {
        self.selected = 0;
        if self.store.visible_indices().is_empty() {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(0));
        }
    }
}

/// State for the bot control view.
#[derive(Debug, Default)]
pub struct ControlState {
    /// Last successful status poll. `None` until the first poll lands.
    pub status: Option<BotStatus>,
    /// Whether the last poll failed; stale status stays visible.
    pub status_error: bool,
    /// Lines scrolled up from the output tail. Zero sticks to the tail.
    pub output_scroll: usize,
}

/// State for the configuration editor: a plain line buffer plus a
/// character-indexed cursor.
#[derive(Debug, Default)]
pub struct ConfigState {
    pub lines: Vec<String>,
    pub cursor_row: usize,
    pub cursor_col: usize,
    pub scroll: u16,
    /// Whether a config fetch has ever succeeded.
    pub loaded: bool,
    /// Whether the buffer differs from the last loaded or saved text.
    pub dirty: bool,
    pub saving: bool,
    pub load_error: Option<String>,
}

impl ConfigState {
    /// The buffer as one string, exactly what a save sends.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Replaces the buffer and resets cursor and dirty state.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_owned).collect();
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.cursor_row = 0;
        self.cursor_col = 0;
        self.scroll = 0;
        self.dirty = false;
        self.loaded = true;
    }

    fn current_line(&self) -> &str {
        self.lines.get(self.cursor_row).map(String::as_str).unwrap_or("")
    }

    fn line_chars(&self, row: usize) -> usize {
        self.lines.get(row).map(|line| line.chars().count()).unwrap_or(0)
    }

    fn insert_char(&mut self, c: char) {
        let at = byte_offset(self.current_line(), self.cursor_col);
        if let Some(line) = self.lines.get_mut(self.cursor_row) {
            line.insert(at, c);
            self.cursor_col += 1;
            self.dirty = true;
        }
    }

    fn insert_newline(&mut self) {
        let at = byte_offset(self.current_line(), self.cursor_col);
        if let Some(line) = self.lines.get_mut(self.cursor_row) {
            let rest = line.split_off(at);
            self.lines.insert(self.cursor_row + 1, rest);
            self.cursor_row += 1;
            self.cursor_col = 0;
            self.dirty = true;
        }
    }

    fn backspace(&mut self) {
        if self.cursor_col > 0 {
            let at = byte_offset(self.current_line(), self.cursor_col - 1);
            if let Some(line) = self.lines.get_mut(self.cursor_row) {
                line.remove(at);
                self.cursor_col -= 1;
                self.dirty = true;
            }
        } else if self.cursor_row > 0 {
            let tail = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = self.line_chars(self.cursor_row);
            if let Some(line) = self.lines.get_mut(self.cursor_row) {
                line.push_str(&tail);
            }
            self.dirty = true;
        }
    }

    fn delete(&mut self) {
        if self.cursor_col < self.line_chars(self.cursor_row) {
            let at = byte_offset(self.current_line(), self.cursor_col);
            if let Some(line) = self.lines.get_mut(self.cursor_row) {
                line.remove(at);
                self.dirty = true;
            }
        } else if self.cursor_row + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor_row + 1);
            if let Some(line) = self.lines.get_mut(self.cursor_row) {
                line.push_str(&next);
            }
            self.dirty = true;
        }
    }

    fn cursor_up(&mut self) {
        self.cursor_row = self.cursor_row.saturating_sub(1);
        self.cursor_col = self.cursor_col.min(self.line_chars(self.cursor_row));
    }

    fn cursor_down(&mut self) {
        self.cursor_row = (self.cursor_row + 1).min(self.lines.len().saturating_sub(1));
        self.cursor_col = self.cursor_col.min(self.line_chars(self.cursor_row));
    }

    fn cursor_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.line_chars(self.cursor_row);
        }
    }

    fn cursor_right(&mut self) {
        if self.cursor_col < self.line_chars(self.cursor_row) {
            self.cursor_col += 1;
        } else if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = 0;
        }
    }
}

/// Byte offset of the `col`-th character in `line`, clamped to its end.
fn byte_offset(line: &str, col: usize) -> usize {
    line.char_indices().nth(col).map(|(at, _)| at).unwrap_or(line.len())
}

/// The main application state containing all view data.
pub struct App {
    pub active_tab: Tab,
    pub dashboard: DashboardState,
    pub control: ControlState,
    pub config: ConfigState,
    pub toasts: Vec<Toast>,
    pub preferences: UserPreferences,
    pub dark_mode: bool,
    pub auto_refresh: bool,
    /// Wall-clock time of the last successful log fetch.
    pub last_updated: Option<DateTime<Local>>,
    /// Whether a start or stop request is in flight.
    pub executing: bool,
    /// Whether a log fetch is in flight.
    pub loading_logs: bool,
    /// Animation frame for the busy throbber.
    pub throbber_idx: usize,
    pub should_quit: bool,
}

impl App {
    /// Creates the application state, restoring the persisted color
    /// scheme, polling toggle and active tab.
    pub fn new(preferences: UserPreferences) -> Self {
        let active_tab = preferences
            .active_tab()
            .and_then(|slug| slug.parse().ok())
            .unwrap_or_default();
        let dark_mode = preferences.dark_mode();
        let auto_refresh = preferences.auto_refresh();
        Self {
            active_tab,
            dashboard: DashboardState::default(),
            control: ControlState::default(),
            config: ConfigState::default(),
            toasts: Vec::new(),
            preferences,
            dark_mode,
            auto_refresh,
            last_updated: None,
            executing: false,
            loading_logs: false,
            throbber_idx: 0,
            should_quit: false,
        }
    }

    /// Effects that populate every view once at startup.
    pub fn initial_effects(&mut self) -> Vec<Effect> {
        self.loading_logs = true;
        vec![
            Effect::LoadLogsRequested,
            Effect::RefreshStatusRequested,
            Effect::LoadConfigRequested,
        ]
    }

    /// Effects for one auto-refresh interval. Only the active view is
    /// polled; the config editor is never refreshed under the user.
    pub fn poll_effects(&mut self) -> Vec<Effect> {
        match self.active_tab {
            Tab::Dashboard => {
                self.loading_logs = true;
                vec![Effect::LoadLogsRequested]
            }
            Tab::Control => vec![Effect::RefreshStatusRequested],
            Tab::Config => Vec::new(),
        }
    }

    /// Whether a background request is in flight.
    pub fn is_busy(&self) -> bool {
        self.executing || self.loading_logs || self.config.saving
    }

    /// Whether the UI needs frequent ticks (throbber or fading toasts).
    pub fn is_animating(&self) -> bool {
        self.is_busy() || !self.toasts.is_empty()
    }

    pub fn push_toast(&mut self, kind: ToastKind, text: impl Into<String>) {
        self.toasts.push(Toast::new(kind, text));
    }

    fn prune_toasts(&mut self, now: Instant) {
        self.toasts.retain(|toast| !toast.is_expired(now));
    }

    fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        if let Err(error) = self.preferences.set_active_tab(tab.slug()) {
            warn!(%error, "failed to persist active tab");
        }
    }

    /// Updates the application state based on a message, returning the
    /// side effects the runtime should execute.
    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        let mut effects = Vec::new();
        match msg {
            Msg::Tick => {
                if self.is_busy() {
                    self.throbber_idx = (self.throbber_idx + 1) % 10;
                }
                self.prune_toasts(Instant::now());
            }
            Msg::Resize(_, _) => {
                // Redraw happens unconditionally after any message.
            }
            Msg::Quit => {
                self.should_quit = true;
            }
            Msg::SelectTab(tab) => {
                self.select_tab(tab);
            }
            Msg::NextTab => {
                self.select_tab(self.active_tab.next());
            }
            Msg::PrevTab => {
                self.select_tab(self.active_tab.prev());
            }
            Msg::ToggleDarkMode => {
                self.dark_mode = !self.dark_mode;
                if let Err(error) = self.preferences.set_dark_mode(self.dark_mode) {
                    warn!(%error, "failed to persist dark mode");
                }
            }
            Msg::ToggleAutoRefresh => {
                self.auto_refresh = !self.auto_refresh;
                if let Err(error) = self.preferences.set_auto_refresh(self.auto_refresh) {
                    warn!(%error, "failed to persist auto-refresh");
                }
            }
            Msg::Refresh => {
                effects.extend(self.poll_effects());
            }
            Msg::TaskCompleted(outcome) => {
                effects.extend(self.apply_outcome(outcome));
            }
            Msg::LogsMove(delta) => {
                self.dashboard.move_selection(delta);
            }
            Msg::LogsHome => {
                self.dashboard.reset_selection();
            }
            Msg::LogsEnd => {
                let len = self.dashboard.store.visible_indices().len();
                if len > 0 {
                    self.dashboard.selected = len - 1;
                    self.dashboard.table_state.select(Some(len - 1));
                }
            }
            Msg::LogsOpenDetail => {
                if self.dashboard.selected_entry().is_some() {
                    self.dashboard.detail_open = true;
                    self.dashboard.detail_scroll = 0;
                }
            }
            Msg::LogsCloseDetail => {
                self.dashboard.detail_open = false;
            }
            Msg::DetailScroll(delta) => {
                if self.dashboard.detail_open {
                    self.dashboard.detail_scroll = if delta > 0 {
                        self.dashboard.detail_scroll.saturating_add(delta as u16)
                    } else {
                        self.dashboard.detail_scroll.saturating_sub((-delta) as u16)
                    };
                }
            }
            Msg::FilterNext => {
                let next = self.dashboard.store.filter().next();
                self.dashboard.store.set_filter(next);
                self.dashboard.reset_selection();
            }
            Msg::FilterPrev => {
                let prev = self.dashboard.store.filter().prev();
                self.dashboard.store.set_filter(prev);
                self.dashboard.reset_selection();
            }
            Msg::FocusSearch => {
                self.dashboard.focus = DashboardFocus::Search;
            }
            Msg::AcceptSearch => {
                self.dashboard.focus = DashboardFocus::Table;
            }
            Msg::CancelSearch => {
                self.dashboard.store.set_search("");
                self.dashboard.focus = DashboardFocus::Table;
                self.dashboard.reset_selection();
            }
            Msg::SearchChar(c) => {
                let mut search = self.dashboard.store.search().to_owned();
                search.push(c);
                self.dashboard.store.set_search(search);
                self.dashboard.reset_selection();
            }
            Msg::SearchBackspace => {
                let mut search = self.dashboard.store.search().to_owned();
                search.pop();
                self.dashboard.store.set_search(search);
                self.dashboard.reset_selection();
            }
            Msg::Export(format) => {
                let entries: Vec<LogEntry> = self
                    .dashboard
                    .store
                    .visible_entries()
                    .into_iter()
                    .cloned()
                    .collect();
                if entries.is_empty() {
                    self.push_toast(ToastKind::Warning, "No logs to export.");
                } else {
                    effects.push(Effect::ExportRequested { format, entries });
                }
            }
            Msg::StartBot => {
                if !self.executing {
                    self.executing = true;
                    effects.push(Effect::StartBotRequested);
                }
            }
            Msg::StopBot => {
                if !self.executing {
                    self.executing = true;
                    effects.push(Effect::StopBotRequested);
                }
            }
            Msg::OutputScroll(delta) => {
                let limit = self
                    .control
                    .status
                    .as_ref()
                    .map(|status| status.output.len().saturating_sub(1))
                    .unwrap_or(0);
                self.control.output_scroll = if delta > 0 {
                    self.control.output_scroll.saturating_add(delta as usize).min(limit)
                } else {
                    self.control.output_scroll.saturating_sub((-delta) as usize)
                };
            }
            Msg::ConfigChar(c) => {
                self.config.insert_char(c);
            }
            Msg::ConfigNewline => {
                self.config.insert_newline();
            }
            Msg::ConfigBackspace => {
                self.config.backspace();
            }
            Msg::ConfigDelete => {
                self.config.delete();
            }
            Msg::ConfigUp => {
                self.config.cursor_up();
            }
            Msg::ConfigDown => {
                self.config.cursor_down();
            }
            Msg::ConfigLeft => {
                self.config.cursor_left();
            }
            Msg::ConfigRight => {
                self.config.cursor_right();
            }
            Msg::ConfigHome => {
                self.config.cursor_col = 0;
            }
            Msg::ConfigEnd => {
                self.config.cursor_col = self.config.line_chars(self.config.cursor_row);
            }
            Msg::ConfigSave => {
                if self.config.loaded && !self.config.saving {
                    self.config.saving = true;
                    effects.push(Effect::SaveConfigRequested(self.config.text()));
                }
            }
            Msg::ConfigReload => {
                self.config.load_error = None;
                effects.push(Effect::LoadConfigRequested);
            }
        }
        effects
    }

    /// Folds a finished background task into state. Control outcomes
    /// trigger a follow-up status poll so the indicator matches the
    /// action that just completed.
    fn apply_outcome(&mut self, outcome: TaskOutcome) -> Vec<Effect> {
        let mut effects = Vec::new();
        match outcome {
            TaskOutcome::Logs(Ok(entries)) => {
                self.loading_logs = false;
                self.dashboard.load_error = None;
                self.dashboard.store.replace(entries);
                self.dashboard.clamp_selection();
                self.last_updated = Some(Local::now());
            }
            TaskOutcome::Logs(Err(error)) => {
                self.loading_logs = false;
                warn!(%error, "log fetch failed");
                self.dashboard.load_error = Some(error);
            }
            TaskOutcome::Status(Ok(status)) => {
                self.control.status = Some(status);
                self.control.status_error = false;
                self.control.output_scroll = 0;
            }
            TaskOutcome::Status(Err(error)) => {
                warn!(%error, "status poll failed");
                self.control.status_error = true;
            }
            TaskOutcome::Started(Ok(reply)) => {
                self.executing = false;
                if reply.is_already_running() {
                    self.push_toast(ToastKind::Info, "Bot is already running.");
                } else {
                    self.push_toast(ToastKind::Success, "Bot started successfully!");
                }
                effects.push(Effect::RefreshStatusRequested);
            }
            TaskOutcome::Started(Err(error)) => {
                self.executing = false;
                self.push_toast(ToastKind::Error, format!("Error starting bot: {error}"));
            }
            TaskOutcome::Stopped(Ok(reply)) => {
                self.executing = false;
                if reply.is_not_running() {
                    self.push_toast(ToastKind::Info, "Bot is not running.");
                } else if reply.status == "error" {
                    // The server reports stop failures inside a 200 reply.
                    self.push_toast(
                        ToastKind::Error,
                        format!("Error stopping bot: {}", reply.display_message()),
                    );
                } else {
                    self.push_toast(ToastKind::Success, "Bot stopped successfully!");
                }
                effects.push(Effect::RefreshStatusRequested);
            }
            TaskOutcome::Stopped(Err(error)) => {
                self.executing = false;
                self.push_toast(ToastKind::Error, format!("Error stopping bot: {error}"));
            }
            TaskOutcome::Config(Ok(value)) => {
                self.config.load_error = None;
                self.config.set_text(&config_to_text(&value));
            }
            TaskOutcome::Config(Err(error)) => {
                warn!(%error, "config fetch failed");
                self.config.load_error = Some(error);
            }
            TaskOutcome::ConfigSaved(Ok(())) => {
                self.config.saving = false;
                self.config.dirty = false;
                self.push_toast(ToastKind::Success, "Configuration saved successfully!");
            }
            TaskOutcome::ConfigSaved(Err(error)) => {
                self.config.saving = false;
                self.push_toast(
                    ToastKind::Error,
                    format!("Error saving configuration: {error}"),
                );
            }
            TaskOutcome::Exported(Ok(path)) => {
                self.push_toast(
                    ToastKind::Success,
                    format!("Logs exported to {}", path.display()),
                );
            }
            TaskOutcome::Exported(Err(error)) => {
                self.push_toast(ToastKind::Error, format!("Error exporting logs: {error}"));
            }
        }
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use applydeck_types::{ControlReply, ExportFormat, StatusFilter};
    use serde_json::json;

    fn app() -> App {
        App::new(UserPreferences::ephemeral())
    }

    fn entry(timestamp: &str, status: &str) -> LogEntry {
        LogEntry {
            timestamp: Some(timestamp.into()),
            status: Some(status.into()),
            ..LogEntry::default()
        }
    }

    #[test]
    fn tab_switch_persists_the_slug() {
        let mut app = app();
        app.update(Msg::SelectTab(Tab::Config));
        assert_eq!(app.active_tab, Tab::Config);
        assert_eq!(app.preferences.active_tab().as_deref(), Some("config"));
    }

    #[test]
    fn toggles_flip_state_and_preferences() {
        let mut app = app();
        assert!(app.dark_mode);
        app.update(Msg::ToggleDarkMode);
        assert!(!app.dark_mode);
        assert!(!app.preferences.dark_mode());

        assert!(app.auto_refresh);
        app.update(Msg::ToggleAutoRefresh);
        assert!(!app.auto_refresh);
        assert!(!app.preferences.auto_refresh());
    }

    #[test]
    fn poll_covers_only_the_active_view() {
        let mut app = app();
        assert_eq!(app.poll_effects(), vec![Effect::LoadLogsRequested]);
        app.update(Msg::SelectTab(Tab::Control));
        assert_eq!(app.poll_effects(), vec![Effect::RefreshStatusRequested]);
        app.update(Msg::SelectTab(Tab::Config));
        assert!(app.poll_effects().is_empty());
    }

    #[test]
    fn start_requests_dedupe_while_in_flight() {
        let mut app = app();
        assert_eq!(app.update(Msg::StartBot), vec![Effect::StartBotRequested]);
        assert!(app.executing);
        assert!(app.update(Msg::StartBot).is_empty());
        assert!(app.update(Msg::StopBot).is_empty());
    }

    #[test]
    fn start_outcome_toasts_and_rechecks_status() {
        let mut app = app();
        app.update(Msg::StartBot);
        let reply = ControlReply {
            status: "started".into(),
            message: Some("Bot started".into()),
        };
        let effects = app.update(Msg::TaskCompleted(TaskOutcome::Started(Ok(reply))));
        assert_eq!(effects, vec![Effect::RefreshStatusRequested]);
        assert!(!app.executing);
        assert_eq!(app.toasts.len(), 1);
        assert_eq!(app.toasts[0].kind, ToastKind::Success);
        assert_eq!(app.toasts[0].text, "Bot started successfully!");
    }

    #[test]
    fn already_running_reply_is_informational() {
        let mut app = app();
        let reply = ControlReply {
            status: "already_running".into(),
            message: Some("Bot is already running".into()),
        };
        app.update(Msg::TaskCompleted(TaskOutcome::Started(Ok(reply))));
        assert_eq!(app.toasts[0].kind, ToastKind::Info);
        assert_eq!(app.toasts[0].text, "Bot is already running.");
    }

    #[test]
    fn stop_error_reply_surfaces_the_server_message() {
        let mut app = app();
        let reply = ControlReply {
            status: "error".into(),
            message: Some("process not found".into()),
        };
        app.update(Msg::TaskCompleted(TaskOutcome::Stopped(Ok(reply))));
        assert_eq!(app.toasts[0].kind, ToastKind::Error);
        assert_eq!(app.toasts[0].text, "Error stopping bot: process not found");
    }

    #[test]
    fn export_of_an_empty_view_only_warns() {
        let mut app = app();
        let effects = app.update(Msg::Export(ExportFormat::Csv));
        assert!(effects.is_empty());
        assert_eq!(app.toasts[0].kind, ToastKind::Warning);
        assert_eq!(app.toasts[0].text, "No logs to export.");
    }

    #[test]
    fn export_carries_the_visible_rows_newest_first() {
        let mut app = app();
        app.dashboard.store.replace(vec![
            entry("2024-01-01T08:00:00", "success"),
            entry("2024-01-03T08:00:00", "failed"),
            entry("2024-01-02T08:00:00", "success"),
        ]);
        app.dashboard.store.set_filter(StatusFilter::All);
        let effects = app.update(Msg::Export(ExportFormat::Json));
        match &effects[0] {
            Effect::ExportRequested { format, entries } => {
                assert_eq!(*format, ExportFormat::Json);
                let stamps: Vec<&str> = entries
                    .iter()
                    .map(|e| e.timestamp.as_deref().unwrap())
                    .collect();
                assert_eq!(
                    stamps,
                    vec![
                        "2024-01-03T08:00:00",
                        "2024-01-02T08:00:00",
                        "2024-01-01T08:00:00"
                    ]
                );
            }
            other => panic!("unexpected effect: {other:?}"),
        }
    }

    #[test]
    fn log_fetch_success_replaces_rows_and_stamps_the_clock() {
        let mut app = app();
        app.loading_logs = true;
        app.update(Msg::TaskCompleted(TaskOutcome::Logs(Ok(vec![entry(
            "2024-01-01T08:00:00",
            "success",
        )]))));
        assert!(!app.loading_logs);
        assert!(app.dashboard.load_error.is_none());
        assert_eq!(app.dashboard.store.len(), 1);
        assert!(app.last_updated.is_some());
    }

    #[test]
    fn log_fetch_failure_keeps_stale_rows() {
        let mut app = app();
        app.dashboard.store.replace(vec![entry("2024-01-01T08:00:00", "success")]);
        app.update(Msg::TaskCompleted(TaskOutcome::Logs(Err(
            "connection refused".into()
        ))));
        assert_eq!(app.dashboard.store.len(), 1);
        assert_eq!(
            app.dashboard.load_error.as_deref(),
            Some("connection refused")
        );
    }

    #[test]
    fn search_keystrokes_narrow_and_reset_the_cursor() {
        let mut app = app();
        app.dashboard.store.replace(vec![
            LogEntry {
                company: Some("Acme".into()),
                ..LogEntry::default()
            },
            LogEntry {
                company: Some("Globex".into()),
                ..LogEntry::default()
            },
        ]);
        app.update(Msg::LogsMove(1));
        assert_eq!(app.dashboard.selected, 1);
        app.update(Msg::FocusSearch);
        for c in "glo".chars() {
            app.update(Msg::SearchChar(c));
        }
        assert_eq!(app.dashboard.store.search(), "glo");
        assert_eq!(app.dashboard.selected, 0);
        assert_eq!(app.dashboard.store.visible_indices(), vec![1]);
        app.update(Msg::CancelSearch);
        assert_eq!(app.dashboard.store.search(), "");
        assert_eq!(app.dashboard.focus, DashboardFocus::Table);
    }

    #[test]
    fn detail_opens_only_when_a_row_is_selected() {
        let mut app = app();
        app.update(Msg::LogsOpenDetail);
        assert!(!app.dashboard.detail_open);

        app.dashboard.store.replace(vec![entry("2024-01-01", "success")]);
        app.dashboard.reset_selection();
        app.update(Msg::LogsOpenDetail);
        assert!(app.dashboard.detail_open);
        app.update(Msg::LogsCloseDetail);
        assert!(!app.dashboard.detail_open);
    }

    #[test]
    fn config_fetch_renders_text_and_save_sends_it_verbatim() {
        let mut app = app();
        let value = json!({"browser": {"headless": true}, "max_applications": 50});
        app.update(Msg::TaskCompleted(TaskOutcome::Config(Ok(value))));
        assert!(app.config.loaded);
        assert!(!app.config.dirty);
        let text = app.config.text();
        assert!(text.contains("browser:"));
        assert!(text.contains("  headless: true"));

        let effects = app.update(Msg::ConfigSave);
        assert_eq!(effects, vec![Effect::SaveConfigRequested(text)]);
        assert!(app.config.saving);
        // A second save while one is in flight is ignored.
        assert!(app.update(Msg::ConfigSave).is_empty());
    }

    #[test]
    fn config_editing_marks_dirty_and_splices_lines() {
        let mut app = app();
        app.config.set_text("alpha\nbeta");
        app.update(Msg::ConfigEnd);
        app.update(Msg::ConfigChar('!'));
        assert!(app.config.dirty);
        assert_eq!(app.config.text(), "alpha!\nbeta");

        app.update(Msg::ConfigNewline);
        assert_eq!(app.config.text(), "alpha!\n\nbeta");
        assert_eq!(app.config.cursor_row, 1);

        app.update(Msg::ConfigBackspace);
        assert_eq!(app.config.text(), "alpha!\nbeta");
        assert_eq!(app.config.cursor_col, 6);

        app.update(Msg::ConfigDown);
        app.update(Msg::ConfigHome);
        app.update(Msg::ConfigDelete);
        assert_eq!(app.config.text(), "alpha!\neta");
    }

    #[test]
    fn config_cursor_clamps_to_shorter_lines() {
        let mut app = app();
        app.config.set_text("a long first line\nab");
        app.update(Msg::ConfigEnd);
        assert_eq!(app.config.cursor_col, 17);
        app.update(Msg::ConfigDown);
        assert_eq!(app.config.cursor_col, 2);
    }

    #[test]
    fn save_before_a_successful_load_is_refused() {
        let mut app = app();
        assert!(app.update(Msg::ConfigSave).is_empty());
        assert!(!app.config.saving);
    }

    #[test]
    fn failed_save_toasts_the_server_detail() {
        let mut app = app();
        app.config.set_text("answers: [");
        app.config.saving = true;
        app.update(Msg::TaskCompleted(TaskOutcome::ConfigSaved(Err(
            "Invalid YAML: mapping values are not allowed here".into(),
        ))));
        assert!(!app.config.saving);
        assert_eq!(app.toasts[0].kind, ToastKind::Error);
        assert!(app.toasts[0]
            .text
            .starts_with("Error saving configuration: Invalid YAML"));
    }

    #[test]
    fn toasts_fade_then_expire() {
        let toast = Toast::new(ToastKind::Info, "hello");
        let shown = toast.born + Duration::from_millis(100);
        let fading = toast.born + TOAST_VISIBLE + Duration::from_millis(1);
        let gone = toast.born + TOAST_VISIBLE + TOAST_FADE;
        assert!(!toast.is_fading(shown));
        assert!(toast.is_fading(fading));
        assert!(!toast.is_expired(fading));
        assert!(toast.is_expired(gone));
    }

    #[test]
    fn prune_drops_expired_toasts_and_keeps_fresh_ones() {
        let mut app = app();
        app.push_toast(ToastKind::Info, "short lived");
        app.push_toast(ToastKind::Error, "fresh");
        let later = app.toasts[0].born + TOAST_VISIBLE + TOAST_FADE + Duration::from_millis(1);
        app.toasts[1].born = later;
        app.prune_toasts(later);
        assert_eq!(app.toasts.len(), 1);
        assert_eq!(app.toasts[0].text, "fresh");
    }

    #[test]
    fn status_outcome_pins_output_to_the_tail() {
        let mut app = app();
        app.control.output_scroll = 5;
        let status = BotStatus {
            running: true,
            status: "running".into(),
            output: vec!["line".into(); 10],
        };
        app.update(Msg::TaskCompleted(TaskOutcome::Status(Ok(status))));
        assert_eq!(app.control.output_scroll, 0);
        assert!(!app.control.status_error);

        app.update(Msg::OutputScroll(3));
        assert_eq!(app.control.output_scroll, 3);
        app.update(Msg::OutputScroll(100));
        assert_eq!(app.control.output_scroll, 9);
        app.update(Msg::OutputScroll(-100));
        assert_eq!(app.control.output_scroll, 0);
    }

    #[test]
    fn quit_sets_the_flag() {
        let mut app = app();
        app.update(Msg::Quit);
        assert!(app.should_quit);
    }
}
