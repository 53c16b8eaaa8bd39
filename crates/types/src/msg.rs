//! Messages and effects exchanged between the UI and the runtime.
//!
//! State changes flow one way: key events become [`Msg`] values, the
//! application folds each message into its state and returns [`Effect`]s,
//! and the runtime executes those effects as background tasks whose
//! results come back as [`TaskOutcome`] wrapped in a new message.

use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::Value;

use crate::{BotStatus, ControlReply, LogEntry};

/// Top-level views of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    /// Run log table with stats, filter and search.
    #[default]
    Dashboard,
    /// Bot status, captured output and start/stop controls.
    Control,
    /// Configuration editor.
    Config,
}

impl Tab {
    /// All tabs, in display order.
    pub const ALL: [Tab; 3] = [Tab::Dashboard, Tab::Control, Tab::Config];

    /// Title shown in the tab bar.
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Control => "Bot Control",
            Tab::Config => "Configuration",
        }
    }

    /// Stable identifier used when persisting the active tab.
    pub fn slug(&self) -> &'static str {
        match self {
            Tab::Dashboard => "dashboard",
            Tab::Control => "control",
            Tab::Config => "config",
        }
    }

    /// The next tab in display order, wrapping at the end.
    pub fn next(&self) -> Tab {
        let at = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(at + 1) % Self::ALL.len()]
    }

    /// The previous tab in display order, wrapping at the start.
    pub fn prev(&self) -> Tab {
        let at = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(at + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .iter()
            .copied()
            .find(|tab| tab.slug().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown tab: {s}"))
    }
}

/// Export formats the dashboard offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
        }
    }

    /// File name for an export performed on the given date, e.g.
    /// `applydeck_logs_2024-06-01.csv`.
    pub fn file_name(&self, date: NaiveDate) -> String {
        format!("applydeck_logs_{}.{}", date.format("%Y-%m-%d"), self.extension())
    }
}

/// Result of a background task run by the runtime.
///
/// Errors cross the channel as display strings so the outcome stays a
/// plain data type; the application only needs the text for a toast.
#[derive(Debug, Clone)]
pub enum TaskOutcome {
    /// Run log fetch finished.
    Logs(Result<Vec<LogEntry>, String>),
    /// Status poll finished.
    Status(Result<BotStatus, String>),
    /// Start request finished.
    Started(Result<ControlReply, String>),
    /// Stop request finished.
    Stopped(Result<ControlReply, String>),
    /// Configuration fetch finished.
    Config(Result<Value, String>),
    /// Configuration save finished.
    ConfigSaved(Result<(), String>),
    /// Export file write finished, carrying the written path.
    Exported(Result<PathBuf, String>),
}

/// Messages that update the application state.
///
/// This enum defines all the user actions and system events that can
/// trigger state changes in the application.
#[derive(Debug, Clone)]
pub enum Msg {
    /// Periodic UI tick (toast expiry, animations)
    Tick,
    /// Terminal resized
    Resize(u16, u16),
    /// Quit the application
    Quit,
    /// Switch to the given tab
    SelectTab(Tab),
    /// Cycle to the next tab
    NextTab,
    /// Cycle to the previous tab
    PrevTab,
    /// Toggle between the dark and light palettes
    ToggleDarkMode,
    /// Toggle the auto-refresh poller
    ToggleAutoRefresh,
    /// Refresh the active tab immediately
    Refresh,
    /// Background task completed with outcome
    TaskCompleted(TaskOutcome),
    // Log table interactions
    /// Move the log selection cursor by the given offset
    LogsMove(isize),
    /// Jump to the first visible row
    LogsHome,
    /// Jump to the last visible row
    LogsEnd,
    /// Open details for the current selection
    LogsOpenDetail,
    /// Close the details modal
    LogsCloseDetail,
    /// Scroll the open details modal by the given offset
    DetailScroll(isize),
    /// Cycle the status filter forward
    FilterNext,
    /// Cycle the status filter backward
    FilterPrev,
    /// Move focus into the search input
    FocusSearch,
    /// Leave the search input, keeping the query
    AcceptSearch,
    /// Leave the search input and clear the query
    CancelSearch,
    /// Add a character to the search input
    SearchChar(char),
    /// Remove a character from the search input
    SearchBackspace,
    /// Export the visible rows in the given format
    Export(ExportFormat),
    // Bot control interactions
    /// Ask the server to start the bot
    StartBot,
    /// Ask the server to stop the bot
    StopBot,
    /// Scroll the captured output pane by the given offset
    OutputScroll(isize),
    // Config editor interactions
    /// Insert a character at the config cursor
    ConfigChar(char),
    /// Insert a line break at the config cursor
    ConfigNewline,
    /// Remove the character before the config cursor
    ConfigBackspace,
    /// Remove the character under the config cursor
    ConfigDelete,
    /// Move the config cursor one line up
    ConfigUp,
    /// Move the config cursor one line down
    ConfigDown,
    /// Move the config cursor one column left
    ConfigLeft,
    /// Move the config cursor one column right
    ConfigRight,
    /// Move the config cursor to the start of the line
    ConfigHome,
    /// Move the config cursor to the end of the line
    ConfigEnd,
    /// Save the edited configuration text
    ConfigSave,
    /// Reload the configuration from the server, discarding edits
    ConfigReload,
}

/// Side effects produced by state changes.
///
/// Each variant is a request the runtime executes off the UI thread;
/// results come back as [`Msg::TaskCompleted`].
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Request a background fetch of the run log
    LoadLogsRequested,
    /// Request a background status poll
    RefreshStatusRequested,
    /// Request a background bot start
    StartBotRequested,
    /// Request a background bot stop
    StopBotRequested,
    /// Request a background fetch of the configuration
    LoadConfigRequested,
    /// Request a background save of the given configuration text
    SaveConfigRequested(String),
    /// Request an export of the given rows, already filtered and sorted
    ExportRequested {
        format: ExportFormat,
        entries: Vec<LogEntry>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_cycle_wraps_both_directions() {
        assert_eq!(Tab::Config.next(), Tab::Dashboard);
        assert_eq!(Tab::Dashboard.prev(), Tab::Config);
        assert_eq!(Tab::Dashboard.next(), Tab::Control);
    }

    #[test]
    fn tab_slugs_round_trip() {
        for tab in Tab::ALL {
            assert_eq!(tab.slug().parse::<Tab>(), Ok(tab));
        }
        assert!("settings".parse::<Tab>().is_err());
    }

    #[test]
    fn file_names_carry_the_date_and_extension() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(
            ExportFormat::Csv.file_name(date),
            "applydeck_logs_2024-06-01.csv"
        );
        assert_eq!(
            ExportFormat::Json.file_name(date),
            "applydeck_logs_2024-06-01.json"
        );
    }
}
