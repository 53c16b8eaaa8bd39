pub mod config_text;
pub mod export;
pub mod paths;
pub mod preferences;
pub mod text;
pub mod timefmt;

pub use config_text::config_to_text;
pub use export::{logs_to_csv, logs_to_json, CSV_HEADERS};
pub use paths::{expand_tilde, export_dir, log_file_path, LOG_PATH_ENV};
pub use preferences::{PreferencesError, UserPreferences, PREFERENCES_PATH_ENV};
pub use text::truncate_with_ellipsis;
pub use timefmt::{format_clock, relative_age};
