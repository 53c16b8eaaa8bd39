//! Terminal dashboard for the applydeck bot.
//!
//! Renders the run log, bot controls and configuration editor against a
//! running bot server, mirroring the web dashboard in the terminal. The
//! crate follows a message-driven architecture: input and background
//! task results become [`applydeck_types::Msg`] values, `app` folds them
//! into state, and `ui` renders that state each frame.
//!
//! ## Module map
//!
//! - `app`: state container and message handler, fully unit-testable
//! - `cmd`: executes effects as Tokio tasks against the HTTP client
//! - `ui`: rendering, key routing, themes and the event loop

mod app;
mod cmd;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use applydeck_api::BotClient;
use applydeck_util::UserPreferences;

use crate::app::App;

/// Runs the dashboard until the user quits.
///
/// Sets up the terminal, restores persisted preferences into the initial
/// state and drives the event loop. Terminal state is restored before
/// returning.
///
/// # Errors
///
/// Returns an error when the terminal cannot enter or leave raw mode, or
/// when rendering fails mid-session.
pub async fn run(client: BotClient, preferences: UserPreferences) -> Result<()> {
    let client = Arc::new(client);
    let mut app = App::new(preferences);
    ui::runtime::run_app(client, &mut app).await
}
