//! Key routing.
//!
//! Translates raw key events into [`Msg`] values based on where focus
//! currently sits. Routing is pure so the bindings can be tested without
//! a terminal; the loop in [`crate::ui::runtime`] applies the returned
//! messages in order.

use applydeck_types::{ExportFormat, Msg, Tab};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, DashboardFocus};

/// Translates one key event into the messages it triggers.
///
/// Contexts are checked from most to least specific: an open detail modal
/// swallows keys it does not handle, then the search input, then the
/// always-editing config tab, then the shared and per-tab bindings.
pub fn messages_for(app: &App, key: KeyEvent) -> Vec<Msg> {
    if app.active_tab == Tab::Dashboard && app.dashboard.detail_open {
        return detail_keys(key);
    }
    if app.active_tab == Tab::Dashboard && app.dashboard.focus == DashboardFocus::Search {
        return search_keys(key);
    }
    if app.active_tab == Tab::Config {
        return config_keys(key);
    }

    match key.code {
        // shared bindings
        KeyCode::Char('q') => vec![Msg::Quit],
        KeyCode::Tab => vec![Msg::NextTab],
        KeyCode::BackTab => vec![Msg::PrevTab],
        KeyCode::Char('1') => vec![Msg::SelectTab(Tab::Dashboard)],
        KeyCode::Char('2') => vec![Msg::SelectTab(Tab::Control)],
        KeyCode::Char('3') => vec![Msg::SelectTab(Tab::Config)],
        KeyCode::Char('d') => vec![Msg::ToggleDarkMode],
        KeyCode::Char('a') => vec![Msg::ToggleAutoRefresh],
        KeyCode::Char('r') => vec![Msg::Refresh],
        _ => match app.active_tab {
            Tab::Dashboard => dashboard_keys(key),
            Tab::Control => control_keys(key),
            Tab::Config => Vec::new(),
        },
    }
}

fn detail_keys(key: KeyEvent) -> Vec<Msg> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => vec![Msg::LogsCloseDetail],
        KeyCode::Up | KeyCode::Char('k') => vec![Msg::DetailScroll(-1)],
        KeyCode::Down | KeyCode::Char('j') => vec![Msg::DetailScroll(1)],
        KeyCode::PageUp => vec![Msg::DetailScroll(-10)],
        KeyCode::PageDown => vec![Msg::DetailScroll(10)],
        _ => Vec::new(),
    }
}

fn search_keys(key: KeyEvent) -> Vec<Msg> {
    match key.code {
        KeyCode::Enter | KeyCode::Tab => vec![Msg::AcceptSearch],
        KeyCode::Esc => vec![Msg::CancelSearch],
        KeyCode::Backspace => vec![Msg::SearchBackspace],
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            vec![Msg::SearchChar(c)]
        }
        _ => Vec::new(),
    }
}

fn dashboard_keys(key: KeyEvent) -> Vec<Msg> {
    match key.code {
        KeyCode::Char('/') => vec![Msg::FocusSearch],
        KeyCode::Up | KeyCode::Char('k') => vec![Msg::LogsMove(-1)],
        KeyCode::Down | KeyCode::Char('j') => vec![Msg::LogsMove(1)],
        KeyCode::PageUp => vec![Msg::LogsMove(-10)],
        KeyCode::PageDown => vec![Msg::LogsMove(10)],
        KeyCode::Home | KeyCode::Char('g') => vec![Msg::LogsHome],
        KeyCode::End | KeyCode::Char('G') => vec![Msg::LogsEnd],
        KeyCode::Enter => vec![Msg::LogsOpenDetail],
        KeyCode::Char('f') => vec![Msg::FilterNext],
        KeyCode::Char('F') => vec![Msg::FilterPrev],
        KeyCode::Char('e') => vec![Msg::Export(ExportFormat::Csv)],
        KeyCode::Char('E') => vec![Msg::Export(ExportFormat::Json)],
        _ => Vec::new(),
    }
}

fn control_keys(key: KeyEvent) -> Vec<Msg> {
    match key.code {
        KeyCode::Char('s') => vec![Msg::StartBot],
        KeyCode::Char('x') => vec![Msg::StopBot],
        KeyCode::Up | KeyCode::Char('k') => vec![Msg::OutputScroll(-1)],
        KeyCode::Down | KeyCode::Char('j') => vec![Msg::OutputScroll(1)],
        KeyCode::PageUp => vec![Msg::OutputScroll(-10)],
        KeyCode::PageDown => vec![Msg::OutputScroll(10)],
        _ => Vec::new(),
    }
}

/// The config tab edits on every keystroke, so plain characters insert and
/// only Ctrl-chords and a handful of structural keys keep other meanings.
fn config_keys(key: KeyEvent) -> Vec<Msg> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('s') => vec![Msg::ConfigSave],
            KeyCode::Char('r') => vec![Msg::ConfigReload],
            _ => Vec::new(),
        };
    }
    match key.code {
        KeyCode::Tab => vec![Msg::NextTab],
        KeyCode::BackTab => vec![Msg::PrevTab],
        KeyCode::Enter => vec![Msg::ConfigNewline],
        KeyCode::Backspace => vec![Msg::ConfigBackspace],
        KeyCode::Delete => vec![Msg::ConfigDelete],
        KeyCode::Up => vec![Msg::ConfigUp],
        KeyCode::Down => vec![Msg::ConfigDown],
        KeyCode::Left => vec![Msg::ConfigLeft],
        KeyCode::Right => vec![Msg::ConfigRight],
        KeyCode::Home => vec![Msg::ConfigHome],
        KeyCode::End => vec![Msg::ConfigEnd],
        KeyCode::PageUp => vec![Msg::ConfigUp; 10],
        KeyCode::PageDown => vec![Msg::ConfigDown; 10],
        KeyCode::Char(c) => vec![Msg::ConfigChar(c)],
        _ => Vec::new(),
    }
}
