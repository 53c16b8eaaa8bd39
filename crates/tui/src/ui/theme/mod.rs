//! Theme styling module for the TUI UI layer.
//!
//! Defines semantic color roles, dark and light palettes, and style
//! builders for Ratatui widgets. Prefer these helpers over hard-coding
//! colors to keep the views consistent.

pub mod dark;
pub mod light;
pub mod roles;

pub use dark::DarkTheme;
pub use light::LightTheme;
pub use roles::{Theme, ThemeRoles};

/// Returns the palette matching the persisted dark-mode flag.
pub fn for_mode(dark_mode: bool) -> Box<dyn Theme> {
    if dark_mode {
        Box::new(DarkTheme::new())
    } else {
        Box::new(LightTheme::new())
    }
}
