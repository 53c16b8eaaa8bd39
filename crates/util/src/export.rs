//! Log export rendering.
//!
//! Both formats serialize the records exactly as handed in, which is
//! the currently visible (filtered and sorted) view, not the full
//! collection. Rendering is pure string building; writing the file is
//! the caller's concern.

use applydeck_types::LogEntry;

/// Column headers of the CSV export, in column order.
pub const CSV_HEADERS: [&str; 9] = [
    "Timestamp",
    "Job Title",
    "Company",
    "Location",
    "Status",
    "Reason",
    "Error",
    "Time Taken",
    "Job Link",
];

/// Renders records as CSV. Every data cell is quoted, with embedded
/// quotes doubled; absent fields render as empty cells.
pub fn logs_to_csv(entries: &[&LogEntry]) -> String {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(CSV_HEADERS.join(","));
    for entry in entries {
        let cells = [
            text_cell(&entry.timestamp),
            text_cell(&entry.job_title),
            text_cell(&entry.company),
            text_cell(&entry.location),
            text_cell(&entry.status),
            text_cell(&entry.reason),
            text_cell(&entry.error),
            entry
                .time_taken_sec
                .map(|taken| taken.to_string())
                .unwrap_or_default(),
            text_cell(&entry.job_link),
        ];
        let row: Vec<String> = cells.iter().map(|cell| quote(cell)).collect();
        lines.push(row.join(","));
    }
    lines.join("\n")
}

/// Renders records as pretty-printed JSON. Fields absent on a record
/// are omitted, so a re-import sees exactly the exported set.
pub fn logs_to_json(entries: &[&LogEntry]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(entries)
}

fn text_cell(field: &Option<String>) -> String {
    field.clone().unwrap_or_default()
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LogEntry {
        LogEntry {
            timestamp: Some("2024-06-01T09:30:00".into()),
            job_title: Some("Rust Engineer".into()),
            company: Some("Acme".into()),
            location: Some("Remote".into()),
            status: Some("failed".into()),
            reason: Some(r#"He said "hi""#.into()),
            time_taken_sec: Some(12.0),
            job_link: Some("https://jobs.example.com/42".into()),
            ..LogEntry::default()
        }
    }

    #[test]
    fn csv_doubles_embedded_quotes() {
        let entry = sample();
        let csv = logs_to_csv(&[&entry]);
        assert!(csv.contains(r#""He said ""hi""""#));
    }

    #[test]
    fn csv_has_fixed_header_and_one_row_per_record() {
        let first = sample();
        let second = LogEntry::default();
        let csv = logs_to_csv(&[&first, &second]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Timestamp,Job Title,Company,Location,Status,Reason,Error,Time Taken,Job Link"
        );
        // A fully absent record still renders all nine (empty) cells.
        assert_eq!(lines[2], r#""","","","","","","","","""#);
    }

    #[test]
    fn whole_seconds_render_without_a_fraction() {
        let entry = sample();
        let csv = logs_to_csv(&[&entry]);
        assert!(csv.contains(r#""12""#));
        assert!(!csv.contains("12.0"));
    }

    #[test]
    fn json_round_trips_the_visible_view() {
        let first = sample();
        let second = LogEntry {
            company: Some("Globex".into()),
            ..LogEntry::default()
        };
        let json = logs_to_json(&[&first, &second]).unwrap();
        let reimported: Vec<LogEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(reimported, vec![first, second]);
    }
}
