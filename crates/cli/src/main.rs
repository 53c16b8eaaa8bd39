//! `applydeck` binary.
//!
//! Without a subcommand this launches the terminal dashboard. The
//! subcommands are headless one-shots over the same HTTP client, meant
//! for scripts and quick checks.

use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use applydeck_api::BotClient;
use applydeck_types::LogStore;
use applydeck_util::{log_file_path, UserPreferences};
use clap::{Parser, Subcommand};
use tracing::info;

/// Dashboard and controls for the applydeck bot.
#[derive(Debug, Parser)]
#[command(name = "applydeck", version, about)]
struct Cli {
    /// Base URL of the bot API, overriding APPLYDECK_API_BASE.
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print whether the bot is running, plus its captured output.
    Status,
    /// Ask the bot to start.
    Start,
    /// Ask the bot to stop.
    Stop,
    /// Print run records, newest first.
    Logs {
        /// Cap the number of records fetched.
        #[arg(long, value_name = "N")]
        limit: Option<u32>,
        /// Emit the records as JSON instead of a listing.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let client = match cli.base_url.as_deref() {
        Some(base) => BotClient::new(base)?,
        None => BotClient::new_from_env()?,
    };

    match cli.command {
        None => {
            // The alternate screen owns stdout, so the TUI logs to a file.
            init_file_tracing()?;
            info!(base = client.base_url(), "starting dashboard");
            let preferences = UserPreferences::new()?;
            applydeck_tui::run(client, preferences).await
        }
        Some(command) => {
            init_stderr_tracing();
            run_one_shot(&client, command).await
        }
    }
}

fn init_stderr_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn init_file_tracing() -> Result<()> {
    let path = log_file_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

async fn run_one_shot(client: &BotClient, command: Command) -> Result<()> {
    match command {
        Command::Status => {
            let status = client.status().await?;
            println!("status: {}", if status.running { "running" } else { "stopped" });
            for line in &status.output {
                println!("{line}");
            }
        }
        Command::Start => {
            let reply = client.start().await?;
            println!("{}", reply.display_message());
        }
        Command::Stop => {
            let reply = client.stop().await?;
            println!("{}", reply.display_message());
        }
        Command::Logs { limit, json } => {
            let entries = client.logs(limit).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                let mut store = LogStore::new();
                store.replace(entries);
                for entry in store.visible_entries() {
                    println!(
                        "{:<20} {:<8} {} at {}",
                        entry.timestamp.as_deref().unwrap_or("-"),
                        entry.status_str(),
                        entry.job_title.as_deref().unwrap_or("N/A"),
                        entry.company.as_deref().unwrap_or("N/A"),
                    );
                }
            }
        }
    }
    Ok(())
}
