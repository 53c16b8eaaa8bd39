//! In-memory run log collection and the read models derived from it.
//!
//! [`LogStore`] owns the records exactly as fetched plus the current
//! filter and search term. Views are derived on read: the visible set
//! is recomputed from scratch each time, so stale filter state can
//! never leak into a render. Stats always cover the full collection,
//! not the filtered view.

use std::cmp::Reverse;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::{LogEntry, LogStatus, StatusFilter};

/// Counts derived from the full log collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogStats {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub timeout: usize,
    pub skipped: usize,
}

impl LogStats {
    /// Count for one known status bucket.
    pub fn count(&self, status: LogStatus) -> usize {
        match status {
            LogStatus::Success => self.success,
            LogStatus::Failed => self.failed,
            LogStatus::Timeout => self.timeout,
            LogStatus::Skipped => self.skipped,
        }
    }

    /// Successful attempts as a whole percentage of all attempts,
    /// rounded half-up. Zero when the collection is empty.
    pub fn success_rate(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.success as f64 / self.total as f64) * 100.0).round() as u32
    }
}

/// The run log collection plus the filter state applied to it.
#[derive(Debug, Clone, Default)]
pub struct LogStore {
    entries: Vec<LogEntry>,
    filter: StatusFilter,
    search: String,
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in fetch order, unfiltered.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Swaps in a freshly fetched collection. Filter and search are
    /// kept as they are; the visible set adjusts on the next read.
    pub fn replace(&mut self, entries: Vec<LogEntry>) {
        self.entries = entries;
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Indices into [`Self::entries`] that pass the current filter and
    /// search, sorted newest first. Records without a usable timestamp
    /// sort as the epoch, which places them last; ties keep fetch
    /// order because the sort is stable.
    pub fn visible_indices(&self) -> Vec<usize> {
        let needle = self.search.to_lowercase();
        let mut indices: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| self.filter.matches(entry) && matches_search(entry, &needle))
            .map(|(at, _)| at)
            .collect();
        indices.sort_by_key(|&at| Reverse(sort_stamp(&self.entries[at])));
        indices
    }

    /// The visible records themselves, in the same order as
    /// [`Self::visible_indices`].
    pub fn visible_entries(&self) -> Vec<&LogEntry> {
        self.visible_indices()
            .into_iter()
            .map(|at| &self.entries[at])
            .collect()
    }

    /// Record at a collection index, as returned by
    /// [`Self::visible_indices`].
    pub fn entry(&self, at: usize) -> Option<&LogEntry> {
        self.entries.get(at)
    }

    /// Counts over the full collection. Unknown statuses contribute to
    /// `total` only.
    pub fn stats(&self) -> LogStats {
        let mut stats = LogStats {
            total: self.entries.len(),
            ..LogStats::default()
        };
        for entry in &self.entries {
            match entry.known_status() {
                Some(LogStatus::Success) => stats.success += 1,
                Some(LogStatus::Failed) => stats.failed += 1,
                Some(LogStatus::Timeout) => stats.timeout += 1,
                Some(LogStatus::Skipped) => stats.skipped += 1,
                None => {}
            }
        }
        stats
    }
}

/// Case-insensitive substring match over the searchable fields. The
/// location field is deliberately not searched.
fn matches_search(entry: &LogEntry, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    [
        &entry.job_title,
        &entry.company,
        &entry.status,
        &entry.reason,
        &entry.error,
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}

fn sort_stamp(entry: &LogEntry) -> DateTime<Utc> {
    entry
        .timestamp
        .as_deref()
        .and_then(parse_log_timestamp)
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Parses the timestamp formats the bot has written over its lifetime:
/// RFC 3339 with an offset, naive ISO-8601 with or without fractional
/// seconds, and bare dates. Naive values are taken as UTC.
pub fn parse_log_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.into()));
    }
    None
}
