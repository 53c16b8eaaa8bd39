//! Shared type definitions used across the applydeck workspace.
//!
//! Everything that crosses a crate boundary lives here: the wire types
//! deserialized from the bot's HTTP API ([`LogEntry`], [`BotStatus`],
//! [`ControlReply`]), the in-memory log collection built on top of them
//! ([`LogStore`]), and the message and effect types that drive the UI
//! ([`Msg`], [`Effect`]). The wire types are deliberately tolerant:
//! every field is optional or defaulted so a partially written record
//! never poisons a whole fetch.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

mod logs;
mod msg;

pub use logs::{parse_log_timestamp, LogStats, LogStore};
pub use msg::{Effect, ExportFormat, Msg, Tab, TaskOutcome};

/// One application attempt as recorded by the bot.
///
/// Records are appended by the bot as it runs, so older files can miss
/// fields that newer bot versions write. Every field is therefore
/// optional on the wire; serialization skips absent fields so a
/// re-exported record is faithful to what was fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO-8601 timestamp of the attempt, as written by the bot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Title of the job posting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    /// Company name on the posting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Location string as shown on the posting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Outcome keyword, e.g. `success` or `failed`. Unknown values are
    /// preserved verbatim; [`LogEntry::known_status`] maps the known set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Reason the bot gives when it skips or abandons a posting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Error detail for failed attempts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock seconds the attempt took.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_taken_sec: Option<f64>,
    /// Form answers the bot submitted, keyed by question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answers: Option<Value>,
    /// Answers produced by the model rather than the static profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_answers: Option<Value>,
    /// URL of the posting the bot applied to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_link: Option<String>,
    /// Screenshot the bot captured for this attempt, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
}

impl LogEntry {
    /// Returns the parsed status when the raw value is one of the known
    /// outcome keywords, regardless of case.
    pub fn known_status(&self) -> Option<LogStatus> {
        self.status.as_deref().and_then(|raw| raw.parse().ok())
    }

    /// The raw status string, or an empty string when absent.
    pub fn status_str(&self) -> &str {
        self.status.as_deref().unwrap_or("")
    }
}

/// The closed set of outcome keywords the dashboard understands.
///
/// Records whose status falls outside this set still render (with the
/// raw string) but are not counted toward any stats bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogStatus {
    Success,
    Failed,
    Timeout,
    Skipped,
}

impl LogStatus {
    /// All known statuses, in the order the filter cycles through them.
    pub const ALL: [LogStatus; 4] = [
        LogStatus::Success,
        LogStatus::Failed,
        LogStatus::Timeout,
        LogStatus::Skipped,
    ];

    /// Canonical lowercase keyword for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogStatus::Success => "success",
            LogStatus::Failed => "failed",
            LogStatus::Timeout => "timeout",
            LogStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Ok(LogStatus::Success),
            "failed" => Ok(LogStatus::Failed),
            "timeout" => Ok(LogStatus::Timeout),
            "skipped" => Ok(LogStatus::Skipped),
            _ => Err(()),
        }
    }
}

/// Status filter applied to the log table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Every record passes.
    #[default]
    All,
    /// Only records whose status parses to the given keyword pass.
    Only(LogStatus),
}

impl StatusFilter {
    /// Filter choices in the order the UI cycles through them.
    pub const CHOICES: [StatusFilter; 5] = [
        StatusFilter::All,
        StatusFilter::Only(LogStatus::Success),
        StatusFilter::Only(LogStatus::Failed),
        StatusFilter::Only(LogStatus::Timeout),
        StatusFilter::Only(LogStatus::Skipped),
    ];

    /// Whether the given record passes this filter.
    pub fn matches(&self, entry: &LogEntry) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => entry.known_status() == Some(*wanted),
        }
    }

    /// Label shown in the filter widget.
    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }

    /// The next choice in cycle order, wrapping at the end.
    pub fn next(&self) -> StatusFilter {
        let at = Self::CHOICES.iter().position(|c| c == self).unwrap_or(0);
        Self::CHOICES[(at + 1) % Self::CHOICES.len()]
    }

    /// The previous choice in cycle order, wrapping at the start.
    pub fn prev(&self) -> StatusFilter {
        let at = Self::CHOICES.iter().position(|c| c == self).unwrap_or(0);
        Self::CHOICES[(at + Self::CHOICES.len() - 1) % Self::CHOICES.len()]
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse::<LogStatus>()
            .map(StatusFilter::Only)
            .map_err(|()| format!("unknown status filter: {s}"))
    }
}

/// Reply to `GET /api/status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BotStatus {
    /// Whether the bot process is currently alive.
    #[serde(default)]
    pub running: bool,
    /// Human-readable state keyword, e.g. `running` or `stopped`.
    #[serde(default)]
    pub status: String,
    /// Tail of the bot's captured stdout, newest line last.
    #[serde(default)]
    pub output: Vec<String>,
}

/// Reply to the start/stop control endpoints.
///
/// The bot answers control requests with a short status keyword plus a
/// human-readable message. `already_running` and `not_running` are
/// informational, not errors: the dashboard surfaces the message and
/// refreshes, the same as for a successful start or stop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlReply {
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ControlReply {
    /// True when a start request found the bot already alive.
    pub fn is_already_running(&self) -> bool {
        self.status == "already_running"
    }

    /// True when a stop request found nothing to stop.
    pub fn is_not_running(&self) -> bool {
        self.status == "not_running"
    }

    /// Message to surface, falling back to the status keyword.
    pub fn display_message(&self) -> &str {
        match self.message.as_deref() {
            Some(msg) if !msg.is_empty() => msg,
            _ => self.status.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_entry_tolerates_sparse_records() {
        let entry: LogEntry = serde_json::from_str(r#"{"job_title":"Rust Engineer"}"#)
            .expect("sparse record should deserialize");
        assert_eq!(entry.job_title.as_deref(), Some("Rust Engineer"));
        assert!(entry.timestamp.is_none());
        assert!(entry.known_status().is_none());
    }

    #[test]
    fn log_entry_serialization_skips_absent_fields() {
        let entry = LogEntry {
            company: Some("Acme".into()),
            ..LogEntry::default()
        };
        let json = serde_json::to_string(&entry).expect("serialize");
        assert_eq!(json, r#"{"company":"Acme"}"#);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("SUCCESS".parse(), Ok(LogStatus::Success));
        assert_eq!(" Failed ".parse(), Ok(LogStatus::Failed));
        assert!("captcha_wall".parse::<LogStatus>().is_err());
    }

    #[test]
    fn unknown_status_is_preserved_but_not_classified() {
        let entry: LogEntry =
            serde_json::from_str(r#"{"status":"captcha_wall"}"#).expect("deserialize");
        assert_eq!(entry.status_str(), "captcha_wall");
        assert!(entry.known_status().is_none());
    }

    #[test]
    fn filter_cycle_wraps_both_directions() {
        let mut filter = StatusFilter::All;
        for _ in 0..StatusFilter::CHOICES.len() {
            filter = filter.next();
        }
        assert_eq!(filter, StatusFilter::All);
        assert_eq!(
            StatusFilter::All.prev(),
            StatusFilter::Only(LogStatus::Skipped)
        );
    }

    #[test]
    fn control_reply_falls_back_to_status_keyword() {
        let reply: ControlReply =
            serde_json::from_str(r#"{"status":"already_running"}"#).expect("deserialize");
        assert!(reply.is_already_running());
        assert_eq!(reply.display_message(), "already_running");
    }
}
