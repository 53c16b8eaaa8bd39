use ratatui::style::Color;

use super::roles::{Theme, ThemeRoles};

// Light counterpart of the slate palette.
pub const BG: Color = Color::Rgb(0xF8, 0xFA, 0xFC); // #f8fafc - Background
pub const SURFACE: Color = Color::Rgb(0xFF, 0xFF, 0xFF); // #ffffff - Cards and panels
pub const BORDER: Color = Color::Rgb(0xCB, 0xD5, 0xE1); // #cbd5e1 - Borders and dividers
pub const MODAL_BG: Color = Color::Rgb(0xE2, 0xE8, 0xF0); // #e2e8f0 - Modal overlay

pub const TEXT_PRIMARY: Color = Color::Rgb(0x0F, 0x17, 0x2A); // #0f172a - Default text
pub const TEXT_SECONDARY: Color = Color::Rgb(0x47, 0x55, 0x69); // #475569 - Labels and headers
pub const TEXT_MUTED: Color = Color::Rgb(0x94, 0xA3, 0xB8); // #94a3b8 - Hints and placeholders

pub const ACCENT_PRIMARY: Color = Color::Rgb(0x25, 0x63, 0xEB); // #2563eb - Interactive elements
pub const ACCENT_SECONDARY: Color = Color::Rgb(0x02, 0x84, 0xC7); // #0284c7 - Focus and emphasis

pub const STATUS_INFO: Color = Color::Rgb(0x02, 0x84, 0xC7); // #0284c7
pub const STATUS_OK: Color = Color::Rgb(0x16, 0xA3, 0x4A); // #16a34a
pub const STATUS_WARN: Color = Color::Rgb(0xD9, 0x77, 0x06); // #d97706
pub const STATUS_ERROR: Color = Color::Rgb(0xDC, 0x26, 0x26); // #dc2626

pub const SELECTION_BG: Color = Color::Rgb(0xDB, 0xEA, 0xFE); // #dbeafe
pub const SELECTION_FG: Color = TEXT_PRIMARY;

/// Palette used while dark mode is off.
#[derive(Debug, Clone)]
pub struct LightTheme {
    roles: ThemeRoles,
}

impl LightTheme {
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
                focus: ACCENT_PRIMARY,
                modal_bg: MODAL_BG,
            },
        }
    }
}

impl Default for LightTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for LightTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}
