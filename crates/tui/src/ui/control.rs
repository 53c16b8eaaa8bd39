//! Bot control view: the status panel with start and stop affordances,
//! and the captured output pane pinned to its tail.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::app::App;
use crate::ui::THROBBER;
use crate::ui::theme::Theme;

pub fn draw(frame: &mut Frame, app: &App, theme: &dyn Theme, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    draw_status_panel(frame, app, theme, chunks[0]);
    draw_output(frame, app, theme, chunks[1]);
}

fn draw_status_panel(frame: &mut Frame, app: &App, theme: &dyn Theme, area: Rect) {
    let running = app.control.status.as_ref().is_some_and(|s| s.running);

    let status_line = if app.control.status_error {
        // Unknown rather than failed, so the dot goes grey instead of red.
        Line::from(vec![
            Span::styled("● ", theme.text_muted_style()),
            Span::styled("Error checking status", theme.text_secondary_style()),
        ])
    } else {
        match &app.control.status {
            Some(status) if status.running => Line::from(vec![
                Span::styled("● ", theme.status_success()),
                Span::styled("Running", theme.status_success().add_modifier(Modifier::BOLD)),
            ]),
            Some(_) => Line::from(vec![
                Span::styled("● ", theme.status_error()),
                Span::styled("Stopped", theme.text_primary_style()),
            ]),
            None => Line::from(Span::styled("● Checking...", theme.text_muted_style())),
        }
    };

    let mut action_spans = vec![
        action_span("[s] Start", !running && !app.executing, theme),
        Span::raw("   "),
        action_span("[x] Stop", running && !app.executing, theme),
    ];
    if app.executing {
        action_spans.push(Span::raw("   "));
        action_spans.push(Span::styled(
            format!("{} working", THROBBER[app.throbber_idx % THROBBER.len()]),
            theme.accent_primary_style(),
        ));
    }

    let block = Block::bordered()
        .border_style(theme.border_style(false))
        .title(Span::styled("Bot Status", theme.text_secondary_style()));
    let panel = Paragraph::new(vec![status_line, Line::from(action_spans)]).block(block);
    frame.render_widget(panel, area);
}

fn action_span(label: &str, enabled: bool, theme: &dyn Theme) -> Span<'static> {
    let style = if enabled {
        theme.accent_primary_style().add_modifier(Modifier::BOLD)
    } else {
        theme.text_muted_style().add_modifier(Modifier::DIM)
    };
    Span::styled(label.to_owned(), style)
}

fn draw_output(frame: &mut Frame, app: &App, theme: &dyn Theme, area: Rect) {
    let block = Block::bordered()
        .border_style(theme.border_style(false))
        .title(Span::styled("Output", theme.text_secondary_style()));

    let lines: Vec<&str> = app
        .control
        .status
        .as_ref()
        .map(|status| status.output.iter().map(String::as_str).collect())
        .unwrap_or_default();

    if lines.is_empty() {
        let placeholder =
            Paragraph::new(Span::styled("No output available.", theme.text_muted_style()))
                .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    // Pin the view to the tail; output_scroll counts lines back up.
    let visible = area.height.saturating_sub(2) as usize;
    let base = lines.len().saturating_sub(visible);
    let scroll_y = base.saturating_sub(app.control.output_scroll) as u16;

    let text: Vec<Line> = lines
        .into_iter()
        .map(|line| Line::styled(line, Style::default().fg(theme.roles().text)))
        .collect();
    let output = Paragraph::new(text).scroll((scroll_y, 0)).block(block);
    frame.render_widget(output, area);
}
