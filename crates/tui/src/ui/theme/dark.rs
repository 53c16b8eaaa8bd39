use ratatui::style::Color;

use super::roles::{Theme, ThemeRoles};

// Slate palette tuned for dark terminals.
pub const BG: Color = Color::Rgb(0x0F, 0x17, 0x2A); // #0f172a - Background
pub const SURFACE: Color = Color::Rgb(0x1E, 0x29, 0x3B); // #1e293b - Cards and panels
pub const BORDER: Color = Color::Rgb(0x33, 0x41, 0x55); // #334155 - Borders and dividers
pub const MODAL_BG: Color = Color::Rgb(0x02, 0x06, 0x17); // #020617 - Modal overlay

pub const TEXT_PRIMARY: Color = Color::Rgb(0xE2, 0xE8, 0xF0); // #e2e8f0 - Default text
pub const TEXT_SECONDARY: Color = Color::Rgb(0x94, 0xA3, 0xB8); // #94a3b8 - Labels and headers
pub const TEXT_MUTED: Color = Color::Rgb(0x64, 0x74, 0x8B); // #64748b - Hints and placeholders

pub const ACCENT_PRIMARY: Color = Color::Rgb(0x60, 0xA5, 0xFA); // #60a5fa - Interactive elements
pub const ACCENT_SECONDARY: Color = Color::Rgb(0x38, 0xBD, 0xF8); // #38bdf8 - Focus and emphasis

pub const STATUS_INFO: Color = Color::Rgb(0x38, 0xBD, 0xF8); // #38bdf8
pub const STATUS_OK: Color = Color::Rgb(0x4A, 0xDE, 0x80); // #4ade80
pub const STATUS_WARN: Color = Color::Rgb(0xFB, 0xBF, 0x24); // #fbbf24
pub const STATUS_ERROR: Color = Color::Rgb(0xF8, 0x71, 0x71); // #f87171

pub const SELECTION_BG: Color = BORDER;
pub const SELECTION_FG: Color = Color::Rgb(0xF8, 0xFA, 0xFC); // #f8fafc

/// Default palette, used while dark mode is on.
#[derive(Debug, Clone)]
pub struct DarkTheme {
    roles: ThemeRoles,
}

impl DarkTheme {
    pub fn new() -> Self {
        Self {
            roles: ThemeRoles {
                background: BG,
                surface: SURFACE,
                border: BORDER,

                text: TEXT_PRIMARY,
                text_secondary: TEXT_SECONDARY,
                text_muted: TEXT_MUTED,

                accent_primary: ACCENT_PRIMARY,
                accent_secondary: ACCENT_SECONDARY,

                info: STATUS_INFO,
                success: STATUS_OK,
                warning: STATUS_WARN,
                error: STATUS_ERROR,

                selection_bg: SELECTION_BG,
                selection_fg: SELECTION_FG,
                focus: ACCENT_SECONDARY,
                modal_bg: MODAL_BG,
            },
        }
    }
}

impl Default for DarkTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for DarkTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}
