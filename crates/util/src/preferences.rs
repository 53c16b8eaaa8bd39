//! User preference persistence for the applydeck TUI.
//!
//! This module provides a tiny JSON-backed store that records lightweight
//! settings that survive restarts: the color scheme, whether auto-refresh
//! is on, and the last active tab. The file is written to the standard
//! configuration directory (`~/.config/applydeck/preferences.json` on most
//! platforms) and is safe to read/write from multiple threads thanks to
//! the internal `Mutex`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use dirs_next::config_dir;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::paths::expand_tilde;

/// Environment variable allowing callers to override the preferences file path.
pub const PREFERENCES_PATH_ENV: &str = "APPLYDECK_PREFERENCES_PATH";

/// Default filename for the JSON payload.
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Error surfaced when reading or writing preferences fails.
#[derive(Debug, Error)]
pub enum PreferencesError {
    /// I/O failure (for example, permissions or missing directory).
    #[error("preferences I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization or deserialization failure.
    #[error("preferences serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persisted preference values. Absent keys fall back to the defaults,
/// so a file written by an older build keeps working.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PreferencesPayload {
    /// Dark color scheme toggle. Defaults to on.
    pub dark_mode: Option<bool>,
    /// Background polling toggle. Defaults to on.
    pub auto_refresh: Option<bool>,
    /// Identifier of the tab that was active when the app last ran.
    pub active_tab: Option<String>,
}

/// Thread-safe preferences store backed by a JSON file.
#[derive(Debug, Default)]
pub struct UserPreferences {
    path: PathBuf,
    payload: Mutex<PreferencesPayload>,
    persist_to_disk: bool,
}

impl UserPreferences {
    /// Create a store rooted at the default config directory path, or at
    /// the path named by `APPLYDECK_PREFERENCES_PATH` when set.
    pub fn new() -> Result<Self, PreferencesError> {
        Self::with_path(default_preferences_path())
    }

    /// Create a store rooted at an explicit path.
    pub fn with_path(path: PathBuf) -> Result<Self, PreferencesError> {
        let payload = load_payload(&path)?;
        Ok(Self {
            path,
            payload: Mutex::new(payload),
            persist_to_disk: true,
        })
    }

    /// Build an in-memory store used as a fallback when the config
    /// directory cannot be accessed.
    pub fn ephemeral() -> Self {
        Self {
            path: PathBuf::new(),
            payload: Mutex::new(PreferencesPayload::default()),
            persist_to_disk: false,
        }
    }

    /// Path to the underlying JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the dark color scheme is selected. On when never saved.
    pub fn dark_mode(&self) -> bool {
        self.payload
            .lock()
            .expect("preferences lock poisoned")
            .dark_mode
            .unwrap_or(true)
    }

    /// Persist the dark mode toggle.
    pub fn set_dark_mode(&self, enabled: bool) -> Result<(), PreferencesError> {
        let mut payload = self.payload.lock().expect("preferences lock poisoned");
        payload.dark_mode = Some(enabled);
        self.save_locked(&payload)
    }

    /// Whether background polling is enabled. On when never saved.
    pub fn auto_refresh(&self) -> bool {
        self.payload
            .lock()
            .expect("preferences lock poisoned")
            .auto_refresh
            .unwrap_or(true)
    }

    /// Persist the auto-refresh toggle.
    pub fn set_auto_refresh(&self, enabled: bool) -> Result<(), PreferencesError> {
        let mut payload = self.payload.lock().expect("preferences lock poisoned");
        payload.auto_refresh = Some(enabled);
        self.save_locked(&payload)
    }

    /// Identifier of the last active tab, if one was saved.
    pub fn active_tab(&self) -> Option<String> {
        self.payload
            .lock()
            .expect("preferences lock poisoned")
            .active_tab
            .clone()
    }

    /// Persist the active tab identifier.
    pub fn set_active_tab(&self, tab_id: &str) -> Result<(), PreferencesError> {
        let mut payload = self.payload.lock().expect("preferences lock poisoned");
        payload.active_tab = Some(tab_id.to_owned());
        self.save_locked(&payload)
    }

    fn save_locked(&self, payload: &PreferencesPayload) -> Result<(), PreferencesError> {
        if !self.persist_to_disk {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(payload)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

fn default_preferences_path() -> PathBuf {
    if let Ok(path) = env::var(PREFERENCES_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("applydeck")
        .join(PREFERENCES_FILE_NAME)
}

fn load_payload(path: &Path) -> Result<PreferencesPayload, PreferencesError> {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(payload) => Ok(payload),
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to parse preferences file; using defaults"
                );
                Ok(PreferencesPayload::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            Ok(PreferencesPayload::default())
        }
        Err(error) => Err(PreferencesError::Io(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_apply_when_nothing_was_saved() {
        let prefs = UserPreferences::ephemeral();
        assert!(prefs.dark_mode());
        assert!(prefs.auto_refresh());
        assert!(prefs.active_tab().is_none());
    }

    #[test]
    fn values_round_trip_through_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");

        let prefs = UserPreferences::with_path(path.clone()).unwrap();
        prefs.set_dark_mode(false).unwrap();
        prefs.set_auto_refresh(false).unwrap();
        prefs.set_active_tab("config").unwrap();
        drop(prefs);

        let reloaded = UserPreferences::with_path(path).unwrap();
        assert!(!reloaded.dark_mode());
        assert!(!reloaded.auto_refresh());
        assert_eq!(reloaded.active_tab().as_deref(), Some("config"));
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "not json").unwrap();

        let prefs = UserPreferences::with_path(path).unwrap();
        assert!(prefs.dark_mode());
        assert!(prefs.auto_refresh());
    }

    #[test]
    fn default_path_honors_env_override() {
        temp_env::with_var(PREFERENCES_PATH_ENV, Some("~/custom/prefs.json"), || {
            let path = default_preferences_path();
            assert_eq!(path, expand_tilde("~/custom/prefs.json"));
        });
    }

    #[test]
    fn ephemeral_store_never_touches_disk() {
        let prefs = UserPreferences::ephemeral();
        prefs.set_dark_mode(false).unwrap();
        assert!(!prefs.dark_mode());
        assert_eq!(prefs.path(), Path::new(""));
    }
}
