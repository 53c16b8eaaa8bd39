//! Configuration editor view: a plain text buffer with a visible
//! terminal cursor, edited in place and saved back to the server.

use ratatui::{
    Frame,
    layout::{Alignment, Position, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::ui::THROBBER;
use crate::ui::theme::Theme;

pub fn draw(frame: &mut Frame, app: &mut App, theme: &dyn Theme, area: Rect) {
    let throbber_idx = app.throbber_idx;
    let config = &mut app.config;

    let mut title_spans = vec![Span::styled("Configuration", theme.text_secondary_style())];
    if config.dirty {
        title_spans.push(Span::styled(" [modified]", theme.status_warning()));
    }
    let mut block = Block::bordered()
        .border_style(theme.border_style(true))
        .title(Line::from(title_spans));
    if config.saving {
        block = block.title(
            Line::styled(
                format!("{} saving", THROBBER[throbber_idx % THROBBER.len()]),
                theme.accent_primary_style(),
            )
            .right_aligned(),
        );
    }

    if !config.loaded {
        let message = if let Some(error) = config.load_error.as_deref() {
            Paragraph::new(vec![
                Line::styled(
                    "Error loading configuration.",
                    theme.status_error().add_modifier(Modifier::BOLD),
                ),
                Line::styled(error.to_owned(), theme.text_muted_style()),
            ])
        } else {
            Paragraph::new(Line::styled(
                "Loading configuration...",
                theme.text_muted_style(),
            ))
        };
        frame.render_widget(
            message.alignment(Alignment::Center).wrap(Wrap { trim: true }).block(block),
            area,
        );
        return;
    }

    let inner = block.inner(area);

    // Follow the cursor: adjust the stored scroll so the edited line is
    // always inside the viewport.
    let height = inner.height.max(1) as usize;
    let mut top = config.scroll as usize;
    if config.cursor_row < top {
        top = config.cursor_row;
    } else if config.cursor_row >= top + height {
        top = config.cursor_row + 1 - height;
    }
    config.scroll = top as u16;

    let text: Vec<Line> = config
        .lines
        .iter()
        .map(|line| Line::styled(line.as_str(), theme.text_primary_style()))
        .collect();
    let editor = Paragraph::new(text).scroll((config.scroll, 0)).block(block);
    frame.render_widget(editor, area);

    let prefix_width = config
        .lines
        .get(config.cursor_row)
        .map(|line| line.chars().take(config.cursor_col).collect::<String>().width())
        .unwrap_or(0);
    let x = inner.x + (prefix_width as u16).min(inner.width.saturating_sub(1));
    let y = inner.y + (config.cursor_row - top) as u16;
    frame.set_cursor_position(Position::new(x, y));
}
