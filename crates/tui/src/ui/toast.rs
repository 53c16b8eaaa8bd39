//! Toast overlay. Notifications stack upward from the bottom-right
//! corner, dim once their fade starts and disappear when pruned by the
//! next tick.

use std::time::Instant;

use applydeck_util::truncate_with_ellipsis;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Clear, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, ToastKind};
use crate::ui::theme::Theme;

pub fn draw(frame: &mut Frame, app: &App, theme: &dyn Theme, area: Rect) {
    if app.toasts.is_empty() {
        return;
    }

    let now = Instant::now();
    // Newest toast sits closest to the bottom edge, above the hint bar.
    let mut bottom = area.bottom().saturating_sub(1);
    for toast in app.toasts.iter().rev() {
        let width = (toast.text.width() as u16 + 4)
            .min(area.width.saturating_sub(4))
            .max(8);
        let height = 3;
        if bottom < area.top() + height {
            break;
        }

        let rect = Rect {
            x: area.right().saturating_sub(width + 2),
            y: bottom - height,
            width,
            height,
        };

        let mut accent = kind_style(toast.kind, theme);
        let mut text_style = Style::default()
            .fg(theme.roles().text)
            .bg(theme.roles().surface);
        if toast.is_fading(now) {
            accent = accent.add_modifier(Modifier::DIM);
            text_style = text_style.add_modifier(Modifier::DIM);
        }

        frame.render_widget(Clear, rect);
        let block = Block::bordered()
            .border_style(accent.bg(theme.roles().surface))
            .style(Style::default().bg(theme.roles().surface));
        let max_chars = rect.width.saturating_sub(4) as usize;
        let body = Paragraph::new(Span::styled(
            truncate_with_ellipsis(&toast.text, max_chars),
            text_style,
        ))
        .block(block);
        frame.render_widget(body, rect);

        bottom = rect.y;
    }
}

fn kind_style(kind: ToastKind, theme: &dyn Theme) -> Style {
    match kind {
        ToastKind::Success => theme.status_success(),
        ToastKind::Error => theme.status_error(),
        ToastKind::Info => theme.status_info(),
        ToastKind::Warning => theme.status_warning(),
    }
}
