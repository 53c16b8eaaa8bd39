//! UI rendering module for the TUI application.
//!
//! [`draw`] paints the whole frame from scratch each render: the tab bar,
//! the active view, the key hints and any overlays. Rendering reads state
//! and never mutates it beyond widget scroll bookkeeping, so everything
//! visual stays a pure function of [`App`].

pub mod config_editor;
pub mod control;
pub mod dashboard;
pub mod keys;
pub mod runtime;
pub mod theme;
pub mod toast;

use applydeck_types::Tab;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Paragraph, Tabs},
};

use crate::app::App;
use theme::Theme;

/// Frames of the busy throbber, advanced by `Msg::Tick`.
pub const THROBBER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Renders the full frame for the current application state.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let theme = theme::for_mode(app.dark_mode);
    let theme = theme.as_ref();
    let area = frame.area();

    frame.render_widget(Block::default().style(theme.base_style()), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    draw_tab_bar(frame, app, theme, chunks[0]);

    match app.active_tab {
        Tab::Dashboard => dashboard::draw(frame, app, theme, chunks[1]),
        Tab::Control => control::draw(frame, app, theme, chunks[1]),
        Tab::Config => config_editor::draw(frame, app, theme, chunks[1]),
    }

    draw_hints(frame, app, theme, chunks[2]);

    if app.active_tab == Tab::Dashboard && app.dashboard.detail_open {
        dashboard::draw_detail_modal(frame, app, theme, area);
    }

    toast::draw(frame, app, theme, area);
}

fn draw_tab_bar(frame: &mut Frame, app: &App, theme: &dyn Theme, area: Rect) {
    let sections = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(26)])
        .split(area);

    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!(" {} {} ", i + 1, tab.label())))
        .collect();
    let selected = Tab::ALL.iter().position(|t| *t == app.active_tab).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(theme.text_secondary_style())
        .highlight_style(theme.accent_emphasis_style().add_modifier(Modifier::REVERSED))
        .divider("|");
    frame.render_widget(tabs, sections[0]);

    // Right side shows the busy throbber and the two persisted toggles.
    let mut spans = Vec::new();
    if app.is_busy() {
        spans.push(Span::styled(
            format!("{} ", THROBBER[app.throbber_idx % THROBBER.len()]),
            theme.accent_primary_style(),
        ));
    }
    spans.push(Span::styled("auto ", theme.text_muted_style()));
    spans.push(on_off(app.auto_refresh, theme));
    spans.push(Span::styled("  dark ", theme.text_muted_style()));
    spans.push(on_off(app.dark_mode, theme));
    spans.push(Span::raw(" "));
    let status = Paragraph::new(Line::from(spans)).right_aligned();
    frame.render_widget(status, sections[1]);
}

fn on_off(enabled: bool, theme: &dyn Theme) -> Span<'static> {
    if enabled {
        Span::styled("on", theme.status_success())
    } else {
        Span::styled("off", theme.text_muted_style())
    }
}

fn draw_hints(frame: &mut Frame, app: &App, theme: &dyn Theme, area: Rect) {
    let pairs: &[(&str, &str)] = if app.active_tab == Tab::Dashboard && app.dashboard.detail_open {
        &[("↑/↓", "scroll"), ("Esc", "close")]
    } else if app.active_tab == Tab::Dashboard
        && app.dashboard.focus == crate::app::DashboardFocus::Search
    {
        &[("Enter", "accept"), ("Esc", "clear")]
    } else {
        match app.active_tab {
            Tab::Dashboard => &[
                ("↑/↓", "select"),
                ("Enter", "details"),
                ("/", "search"),
                ("f", "filter"),
                ("e/E", "export"),
                ("r", "refresh"),
                ("Tab", "views"),
                ("q", "quit"),
            ],
            Tab::Control => &[
                ("s", "start"),
                ("x", "stop"),
                ("↑/↓", "scroll"),
                ("r", "refresh"),
                ("Tab", "views"),
                ("q", "quit"),
            ],
            Tab::Config => &[
                ("Ctrl-S", "save"),
                ("Ctrl-R", "reload"),
                ("Tab", "views"),
                ("Ctrl-C", "quit"),
            ],
        }
    };

    let mut spans = vec![Span::styled(" ", theme.text_muted_style())];
    for (key, action) in pairs {
        spans.push(Span::styled(*key, theme.accent_primary_style()));
        spans.push(Span::styled(format!(" {action}  "), theme.text_muted_style()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Centers a rect of the given percentage size within `r`.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);
    area[1]
}
