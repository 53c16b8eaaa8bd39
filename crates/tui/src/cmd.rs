//! Effect execution layer.
//!
//! This module is the boundary where the pure state updates in
//! [`crate::app`] meet the outside world. Each [`Effect`] becomes one
//! background task talking to the bot's API or the filesystem; every
//! task resolves to a [`TaskOutcome`] that the runtime feeds back into
//! the application as a message. Nothing here touches `App` directly.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use applydeck_api::BotClient;
use applydeck_types::{Effect, ExportFormat, LogEntry, TaskOutcome};
use applydeck_util::{export_dir, logs_to_csv, logs_to_json};
use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Spawns one background task per effect and returns the join handles
/// the runtime polls for completion.
pub fn spawn_effects(
    client: &Arc<BotClient>,
    effects: Vec<Effect>,
) -> Vec<JoinHandle<TaskOutcome>> {
    effects
        .into_iter()
        .map(|effect| spawn_effect(client, effect))
        .collect()
}

fn spawn_effect(client: &Arc<BotClient>, effect: Effect) -> JoinHandle<TaskOutcome> {
    let client = Arc::clone(client);
    match effect {
        Effect::LoadLogsRequested => tokio::spawn(async move {
            TaskOutcome::Logs(client.logs(None).await.map_err(|error| error.to_string()))
        }),
        Effect::RefreshStatusRequested => tokio::spawn(async move {
            TaskOutcome::Status(client.status().await.map_err(|error| error.to_string()))
        }),
        Effect::StartBotRequested => tokio::spawn(async move {
            TaskOutcome::Started(client.start().await.map_err(|error| error.to_string()))
        }),
        Effect::StopBotRequested => tokio::spawn(async move {
            TaskOutcome::Stopped(client.stop().await.map_err(|error| error.to_string()))
        }),
        Effect::LoadConfigRequested => tokio::spawn(async move {
            TaskOutcome::Config(client.config().await.map_err(|error| error.to_string()))
        }),
        Effect::SaveConfigRequested(text) => tokio::spawn(async move {
            TaskOutcome::ConfigSaved(
                client
                    .save_config(&text)
                    .await
                    .map_err(|error| error.to_string()),
            )
        }),
        Effect::ExportRequested { format, entries } => tokio::spawn(async move {
            TaskOutcome::Exported(write_export(&export_dir(), format, &entries).await)
        }),
    }
}

/// Renders the rows in the requested format and writes them under
/// `dir`, named after today's UTC date. Returns the written path.
async fn write_export(
    dir: &Path,
    format: ExportFormat,
    entries: &[LogEntry],
) -> Result<PathBuf, String> {
    let refs: Vec<&LogEntry> = entries.iter().collect();
    let content = match format {
        ExportFormat::Csv => logs_to_csv(&refs),
        ExportFormat::Json => logs_to_json(&refs).map_err(|error| error.to_string())?,
    };
    let path = dir.join(format.file_name(Utc::now().date_naive()));
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|error| format!("{}: {error}", dir.display()))?;
    tokio::fs::write(&path, content)
        .await
        .map_err(|error| format!("{}: {error}", path.display()))?;
    debug!(path = %path.display(), rows = entries.len(), "wrote export file");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<LogEntry> {
        vec![
            LogEntry {
                timestamp: Some("2024-06-01T09:30:00".into()),
                job_title: Some("Rust Engineer".into()),
                status: Some("success".into()),
                ..LogEntry::default()
            },
            LogEntry {
                company: Some("Acme".into()),
                status: Some("failed".into()),
                ..LogEntry::default()
            },
        ]
    }

    #[tokio::test]
    async fn csv_export_lands_on_disk_with_dated_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_export(dir.path(), ExportFormat::Csv, &sample_rows())
            .await
            .unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("applydeck_logs_"));
        assert!(name.ends_with(".csv"));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Timestamp,Job Title,"));
        assert_eq!(content.lines().count(), 3);
    }

    #[tokio::test]
    async fn json_export_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let rows = sample_rows();
        let path = write_export(dir.path(), ExportFormat::Json, &rows)
            .await
            .unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let reimported: Vec<LogEntry> = serde_json::from_str(&content).unwrap();
        assert_eq!(reimported, rows);
    }

    #[tokio::test]
    async fn export_into_an_unwritable_directory_reports_the_path() {
        let error = write_export(
            Path::new("/proc/definitely/not/writable"),
            ExportFormat::Csv,
            &sample_rows(),
        )
        .await
        .unwrap_err();
        assert!(error.contains("/proc/definitely/not/writable"));
    }
}
