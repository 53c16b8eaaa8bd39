use std::env;
use std::path::PathBuf;

use dirs_next::{config_dir, download_dir, home_dir};

/// Environment variable overriding where the TUI writes its log file.
pub const LOG_PATH_ENV: &str = "APPLYDECK_LOG_PATH";

/// Expands a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    if p == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = p.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    if let Some(rest) = p.strip_prefix("~\\") {
        // Windows-style
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(p)
}

/// Directory exported log files are written to: the platform download
/// directory when one exists, otherwise the current working directory.
pub fn export_dir() -> PathBuf {
    download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Where the TUI writes its own log file. `APPLYDECK_LOG_PATH` wins;
/// otherwise the file lives under the platform config directory.
pub fn log_file_path() -> PathBuf {
    if let Ok(path) = env::var(LOG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("applydeck")
        .join("logs")
        .join("tui.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paths_pass_through() {
        assert_eq!(expand_tilde("/tmp/logs.csv"), PathBuf::from("/tmp/logs.csv"));
        assert_eq!(expand_tilde(" relative/file "), PathBuf::from("relative/file"));
    }

    #[test]
    fn tilde_prefix_joins_home() {
        if let Some(home) = home_dir() {
            assert_eq!(expand_tilde("~"), home);
            assert_eq!(expand_tilde("~/prefs.json"), home.join("prefs.json"));
        }
    }

    #[test]
    fn log_path_honors_the_override() {
        temp_env::with_var(LOG_PATH_ENV, Some("/tmp/applydeck-test.log"), || {
            assert_eq!(log_file_path(), PathBuf::from("/tmp/applydeck-test.log"));
        });
        temp_env::with_var(LOG_PATH_ENV, None::<&str>, || {
            assert!(log_file_path().ends_with("applydeck/logs/tui.log"));
        });
    }
}
