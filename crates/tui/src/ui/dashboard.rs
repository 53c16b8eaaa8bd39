//! Run log view: stat cards, filter and search bar, the log table and
//! the per-record detail modal.

use applydeck_types::{LogEntry, LogStatus};
use applydeck_util::{format_clock, relative_age};
use chrono::Utc;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Cell, Clear, Paragraph, Row, Table, Wrap},
};
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

use crate::app::{App, DashboardFocus};
use crate::ui::theme::Theme;
use crate::ui::{THROBBER, centered_rect};

pub fn draw(frame: &mut Frame, app: &mut App, theme: &dyn Theme, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    draw_stats(frame, app, theme, chunks[0]);
    draw_filter_bar(frame, app, theme, chunks[1]);
    draw_table(frame, app, theme, chunks[2]);
}

fn draw_stats(frame: &mut Frame, app: &App, theme: &dyn Theme, area: Rect) {
    let stats = app.dashboard.store.stats();
    let cards: [(&str, String, Style); 5] = [
        (
            "Success",
            stats.count(LogStatus::Success).to_string(),
            theme.status_success(),
        ),
        (
            "Failed",
            stats.count(LogStatus::Failed).to_string(),
            theme.status_error(),
        ),
        (
            "Timeout",
            stats.count(LogStatus::Timeout).to_string(),
            theme.status_warning(),
        ),
        (
            "Skipped",
            stats.count(LogStatus::Skipped).to_string(),
            theme.text_muted_style(),
        ),
        (
            "Success Rate",
            format!("{}%", stats.success_rate()),
            theme.accent_emphasis_style(),
        ),
    ];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(area);

    for ((label, value, style), column) in cards.into_iter().zip(columns.iter()) {
        let block = Block::bordered()
            .border_style(theme.border_style(false))
            .title(Span::styled(label, theme.text_secondary_style()));
        let card = Paragraph::new(Line::styled(value, style.add_modifier(Modifier::BOLD)))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(card, *column);
    }
}

fn draw_filter_bar(frame: &mut Frame, app: &App, theme: &dyn Theme, area: Rect) {
    let sections = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(16),
            Constraint::Min(20),
            Constraint::Length(22),
        ])
        .split(area);

    let filter = app.dashboard.store.filter();
    let filter_block = Block::bordered()
        .border_style(theme.border_style(false))
        .title(Span::styled("Filter", theme.text_secondary_style()));
    let filter_text = Paragraph::new(Line::from(vec![
        Span::styled("◂ ", theme.text_muted_style()),
        Span::styled(filter.label(), theme.accent_primary_style()),
        Span::styled(" ▸", theme.text_muted_style()),
    ]))
    .block(filter_block);
    frame.render_widget(filter_text, sections[0]);

    let searching = app.dashboard.focus == DashboardFocus::Search;
    let query = app.dashboard.store.search();
    let search_block = Block::bordered()
        .border_style(theme.border_style(searching))
        .title(Span::styled("Search", theme.text_secondary_style()));
    let search_inner = search_block.inner(sections[1]);
    let search_text = if query.is_empty() && !searching {
        Paragraph::new(Span::styled("press / to search", theme.text_muted_style()))
    } else {
        // Keep the cursor in view when the query outgrows the box.
        let overflow = (query.width() as u16).saturating_sub(search_inner.width.saturating_sub(1));
        Paragraph::new(Span::styled(query, theme.text_primary_style())).scroll((0, overflow))
    };
    frame.render_widget(search_text.block(search_block), sections[1]);
    if searching {
        let x = search_inner.x
            + (query.width() as u16).min(search_inner.width.saturating_sub(1));
        frame.set_cursor_position(Position::new(x, search_inner.y));
    }

    let mut spans = Vec::new();
    if app.loading_logs {
        spans.push(Span::styled(
            format!("{} ", THROBBER[app.throbber_idx % THROBBER.len()]),
            theme.accent_primary_style(),
        ));
    }
    if app.dashboard.load_error.is_some() {
        spans.push(Span::styled("Error loading logs.", theme.status_error()));
    } else {
        let updated = app
            .last_updated
            .map(|at| at.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "never".into());
        spans.push(Span::styled(updated, theme.text_primary_style()));
    }
    let updated_block = Block::bordered()
        .border_style(theme.border_style(false))
        .title(Span::styled("Last updated", theme.text_secondary_style()));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(updated_block), sections[2]);
}

fn draw_table(frame: &mut Frame, app: &mut App, theme: &dyn Theme, area: Rect) {
    let dashboard = &mut app.dashboard;
    let shown = dashboard.store.visible_indices().len();
    let total = dashboard.store.len();

    let block = Block::bordered()
        .border_style(theme.border_style(dashboard.focus == DashboardFocus::Table))
        .title(Span::styled(
            format!("Run Log ({shown} of {total})"),
            theme.text_secondary_style(),
        ));

    if dashboard.store.is_empty() && dashboard.load_error.is_some() {
        let detail = dashboard.load_error.clone().unwrap_or_default();
        let message = Paragraph::new(vec![
            Line::styled("Error loading logs.", theme.status_error().add_modifier(Modifier::BOLD)),
            Line::styled(detail, theme.text_muted_style()),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
        frame.render_widget(message, area);
        return;
    }

    if dashboard.store.is_empty() && app.loading_logs {
        let message = Paragraph::new(Line::styled("Loading logs...", theme.text_muted_style()))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(message, area);
        return;
    }

    if shown == 0 {
        let message = Paragraph::new(Line::styled(
            "No logs matching your criteria.",
            theme.text_muted_style(),
        ))
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(message, area);
        return;
    }

    let now = Utc::now();
    let rows: Vec<Row> = dashboard
        .store
        .visible_entries()
        .into_iter()
        .map(|entry| {
            Row::new(vec![
                time_cell(entry, now, theme),
                Cell::from(text_or_na(entry.job_title.as_deref())),
                Cell::from(text_or_na(entry.company.as_deref())),
                Cell::from(text_or_na(entry.location.as_deref())),
                Cell::from(status_cell(entry)).style(status_style(entry, theme)),
                Cell::from(reason_cell(entry)).style(reason_style(entry, theme)),
            ])
            .height(2)
        })
        .collect();

    let header = Row::new(["Time", "Job Title", "Company", "Location", "Status", "Reason"])
        .style(theme.text_secondary_style().add_modifier(Modifier::BOLD));
    let table = Table::new(
        rows,
        [
            Constraint::Length(19),
            Constraint::Percentage(26),
            Constraint::Percentage(18),
            Constraint::Percentage(14),
            Constraint::Length(9),
            Constraint::Percentage(42),
        ],
    )
    .header(header)
    .column_spacing(1)
    .row_highlight_style(theme.selection_style().add_modifier(Modifier::BOLD))
    .block(block);

    frame.render_stateful_widget(table, area, &mut dashboard.table_state);
}

/// Modal with every recorded field of the selected run.
pub fn draw_detail_modal(frame: &mut Frame, app: &App, theme: &dyn Theme, area: Rect) {
    let Some(entry) = app.dashboard.selected_entry() else {
        return;
    };

    let modal = centered_rect(72, 76, area);
    frame.render_widget(Clear, modal);

    let title = format!(
        "{} at {}",
        entry.job_title.as_deref().unwrap_or("Job"),
        entry.company.as_deref().unwrap_or("Company"),
    );
    let block = Block::bordered()
        .border_style(theme.border_style(true))
        .style(theme.modal_background_style())
        .title(Span::styled(title, theme.accent_emphasis_style()))
        .title_bottom(Line::styled(" ↑/↓ scroll  Esc close ", theme.text_muted_style()).right_aligned());

    let body = Paragraph::new(detail_lines(entry, theme))
        .wrap(Wrap { trim: false })
        .scroll((app.dashboard.detail_scroll, 0))
        .block(block);
    frame.render_widget(body, modal);
}

fn detail_lines<'a>(entry: &'a LogEntry, theme: &dyn Theme) -> Vec<Line<'a>> {
    let mut lines = Vec::new();
    let clock = entry
        .timestamp
        .as_deref()
        .map(|raw| format_clock(raw).unwrap_or_else(|| raw.to_owned()));
    lines.push(field("Time", clock.unwrap_or_else(|| "N/A".into()), theme));
    lines.push(field(
        "Location",
        text_or_na(entry.location.as_deref()),
        theme,
    ));
    lines.push(Line::from(vec![
        label_span("Status", theme),
        Span::styled(status_cell(entry), status_style(entry, theme)),
    ]));
    lines.push(field("Duration", duration_detail(entry), theme));
    if let Some(reason) = entry.reason.as_deref() {
        lines.push(field("Reason", reason.to_owned(), theme));
    }
    if let Some(error) = entry.error.as_deref() {
        lines.push(Line::from(vec![
            label_span("Error", theme),
            Span::styled(error, theme.status_error()),
        ]));
    }
    if let Some(link) = entry.job_link.as_deref() {
        lines.push(field("Link", link.to_owned(), theme));
    }
    if let Some(screenshot) = entry.screenshot.as_deref() {
        lines.push(field("Screenshot", screenshot.to_owned(), theme));
    }

    lines.push(Line::default());
    lines.push(Line::styled("Answers", theme.accent_emphasis_style()));
    lines.extend(json_lines(entry.answers.as_ref(), theme));
    lines.push(Line::default());
    lines.push(Line::styled("AI Answers", theme.accent_emphasis_style()));
    lines.extend(json_lines(entry.ai_answers.as_ref(), theme));
    lines
}

fn label_span(label: &str, theme: &dyn Theme) -> Span<'static> {
    Span::styled(format!("{label:<12}"), theme.text_secondary_style())
}

fn field(label: &str, value: String, theme: &dyn Theme) -> Line<'static> {
    Line::from(vec![
        label_span(label, theme),
        Span::styled(value, theme.text_primary_style()),
    ])
}

fn json_lines(value: Option<&Value>, theme: &dyn Theme) -> Vec<Line<'static>> {
    match value {
        None | Some(Value::Null) => {
            vec![Line::styled("None", theme.text_muted_style())]
        }
        Some(value) => {
            let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            pretty
                .lines()
                .map(|line| Line::styled(line.to_owned(), theme.text_primary_style()))
                .collect()
        }
    }
}

fn text_or_na(value: Option<&str>) -> String {
    match value {
        Some(text) if !text.is_empty() => text.to_owned(),
        _ => "N/A".into(),
    }
}

/// Wall-clock time stacked over the relative age.
fn time_cell(entry: &LogEntry, now: chrono::DateTime<Utc>, theme: &dyn Theme) -> Cell<'static> {
    let Some(raw) = entry.timestamp.as_deref() else {
        return Cell::from(Line::styled("N/A", theme.text_muted_style()));
    };
    let clock = format_clock(raw).unwrap_or_else(|| raw.to_owned());
    let mut lines = vec![Line::styled(clock, theme.text_primary_style())];
    if let Some(age) = relative_age(raw, now) {
        lines.push(Line::styled(age, theme.text_muted_style()));
    }
    Cell::from(Text::from(lines))
}

fn status_cell(entry: &LogEntry) -> String {
    let raw = entry.status_str();
    if raw.is_empty() { "N/A".into() } else { raw.to_owned() }
}

/// Failure reason with the error message as fallback, mirroring how the
/// run log records one or the other but rarely both.
fn reason_cell(entry: &LogEntry) -> String {
    entry
        .reason
        .as_deref()
        .filter(|text| !text.is_empty())
        .or_else(|| entry.error.as_deref().filter(|text| !text.is_empty()))
        .map(str::to_owned)
        .unwrap_or_else(|| "N/A".into())
}

fn reason_style(entry: &LogEntry, theme: &dyn Theme) -> Style {
    let has_reason = entry.reason.as_deref().is_some_and(|text| !text.is_empty());
    if !has_reason && entry.error.is_some() {
        theme.status_error()
    } else {
        theme.text_secondary_style()
    }
}

fn duration_detail(entry: &LogEntry) -> String {
    match entry.time_taken_sec {
        Some(secs) => format!("{secs} sec"),
        None => "N/A".into(),
    }
}

fn status_style(entry: &LogEntry, theme: &dyn Theme) -> Style {
    match entry.known_status() {
        Some(LogStatus::Success) => theme.status_success(),
        Some(LogStatus::Failed) => theme.status_error(),
        Some(LogStatus::Timeout) => theme.status_warning(),
        Some(LogStatus::Skipped) => theme.text_muted_style(),
        None => theme.text_secondary_style(),
    }
}
