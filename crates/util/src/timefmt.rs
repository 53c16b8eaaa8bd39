//! Timestamp presentation helpers.
//!
//! Run records carry timestamps as strings in whatever shape the bot
//! wrote them. These helpers parse through [`parse_log_timestamp`] and
//! format for the two places timestamps appear: the log table (relative
//! age next to a local clock time) and the detail view (full local
//! time). Callers pass `now` explicitly so behavior is testable.

use applydeck_types::parse_log_timestamp;
use chrono::{DateTime, Local, Utc};

/// Formats how long ago a timestamp was, in the coarsest unit that has
/// elapsed: `45s ago`, `12m ago`, `3h ago`, `2d ago`. Future timestamps
/// clamp to `0s ago`. Returns `None` when the string does not parse.
pub fn relative_age(timestamp: &str, now: DateTime<Utc>) -> Option<String> {
    let then = parse_log_timestamp(timestamp)?;
    let elapsed = (now - then).num_seconds().max(0);
    let formatted = if elapsed < 60 {
        format!("{elapsed}s ago")
    } else if elapsed < 3600 {
        format!("{}m ago", elapsed / 60)
    } else if elapsed < 86_400 {
        format!("{}h ago", elapsed / 3600)
    } else {
        format!("{}d ago", elapsed / 86_400)
    };
    Some(formatted)
}

/// Formats a record timestamp as local wall-clock time for display.
/// Returns `None` when the string does not parse.
pub fn format_clock(timestamp: &str) -> Option<String> {
    let parsed = parse_log_timestamp(timestamp)?;
    Some(
        parsed
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
    )
}
