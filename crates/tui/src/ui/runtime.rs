//! Terminal lifecycle and the main event loop.
//!
//! The loop multiplexes four sources with `tokio::select!`: terminal input
//! forwarded from a dedicated reader thread, an animation ticker, the
//! auto-refresh timer, and completions of spawned background tasks. State
//! changes flow through [`App::update`], which returns effects; the loop
//! turns those into tasks via [`cmd::spawn_effects`] and feeds each outcome
//! back in as [`Msg::TaskCompleted`].

use std::io::{Stdout, stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use applydeck_api::BotClient;
use applydeck_types::{Msg, TaskOutcome};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::stream::{FuturesUnordered, StreamExt};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::warn;

use crate::app::App;
use crate::cmd;
use crate::ui;

/// Cadence of the backend poll while auto-refresh is enabled.
const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Redraw cadence while a throbber or toast is on screen.
const FAST_TICK: Duration = Duration::from_millis(100);

/// Redraw cadence while the screen is static.
const IDLE_TICK: Duration = Duration::from_millis(5000);

/// Timer behind the auto-refresh toggle.
///
/// At most one interval exists at a time, so flipping the toggle on and off
/// can never stack polls. While disarmed, [`RefreshTimer::tick`] pends
/// forever and its select arm goes quiet.
struct RefreshTimer {
    period: Duration,
    interval: Option<time::Interval>,
}

impl RefreshTimer {
    fn new(period: Duration) -> Self {
        Self { period, interval: None }
    }

    /// Arms the timer, replacing any prior schedule. The first fire lands a
    /// full period from now.
    fn arm(&mut self) {
        let mut interval = time::interval_at(time::Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    fn disarm(&mut self) {
        self.interval = None;
    }

    fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending().await,
        }
    }
}

/// Spawn a dedicated input thread that blocks on terminal input and forwards
/// `crossterm` events over a Tokio channel.
///
/// `event::read()` blocks, so it gets its own OS thread; keeping `read()` on
/// one thread also ensures reliable resize delivery across terminals. The
/// thread exits once the receiver side is dropped.
fn spawn_input_thread() -> Result<mpsc::Receiver<Event>> {
    let (sender, receiver) = mpsc::channel::<Event>(500);
    std::thread::Builder::new()
        .name("applydeck-input".into())
        .spawn(move || {
            loop {
                match event::read() {
                    Ok(event) => {
                        if sender.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(error) => {
                        warn!(%error, "failed to read terminal event");
                        break;
                    }
                }
            }
        })
        .context("failed to spawn input thread")?;
    Ok(receiver)
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(out);
    let terminal = Terminal::new(backend).context("failed to initialize terminal")?;
    Ok(terminal)
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to restore cursor")?;
    Ok(())
}

fn render(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    terminal
        .draw(|frame| ui::draw(frame, app))
        .context("failed to draw frame")?;
    Ok(())
}

fn is_ctrl_c(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(key)
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
    )
}

/// Runs the dashboard until the user quits or the input source closes.
pub async fn run_app(client: Arc<BotClient>, app: &mut App) -> Result<()> {
    let mut input_receiver = spawn_input_thread()?;
    let mut terminal = setup_terminal()?;

    let mut pending_tasks: FuturesUnordered<JoinHandle<TaskOutcome>> = FuturesUnordered::new();
    let mut effects = app.initial_effects();

    let mut refresh_timer = RefreshTimer::new(POLL_INTERVAL);

    let mut current_tick = IDLE_TICK;
    let mut ticker = time::interval(current_tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(&mut terminal, app)?;
    let mut last_size = crossterm::terminal::size().ok();

    loop {
        if !effects.is_empty() {
            pending_tasks.extend(cmd::spawn_effects(&client, std::mem::take(&mut effects)));
        }

        if app.auto_refresh && !refresh_timer.is_armed() {
            refresh_timer.arm();
        } else if !app.auto_refresh && refresh_timer.is_armed() {
            refresh_timer.disarm();
        }

        // Tick fast while something on screen is moving, otherwise idle.
        let needs_animation = app.is_animating() || !pending_tasks.is_empty();
        let target_tick = if needs_animation { FAST_TICK } else { IDLE_TICK };
        if target_tick != current_tick {
            current_tick = target_tick;
            ticker = time::interval(current_tick);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        let mut needs_render = false;

        tokio::select! {
            maybe_event = input_receiver.recv() => {
                match maybe_event {
                    Some(event) if is_ctrl_c(&event) => break,
                    Some(Event::Key(key)) => {
                        for msg in ui::keys::messages_for(app, key) {
                            effects.extend(app.update(msg));
                        }
                        needs_render = true;
                    }
                    Some(Event::Resize(width, height)) => {
                        let _ = app.update(Msg::Resize(width, height));
                        last_size = Some((width, height));
                        needs_render = true;
                    }
                    Some(_) => {}
                    None => break,
                }
            }
            _ = ticker.tick() => {
                effects.extend(app.update(Msg::Tick));
                needs_render = needs_animation;
            }
            _ = refresh_timer.tick() => {
                effects.extend(app.poll_effects());
                needs_render = true;
            }
            Some(joined) = pending_tasks.next(), if !pending_tasks.is_empty() => {
                match joined {
                    Ok(outcome) => {
                        effects.extend(app.update(Msg::TaskCompleted(outcome)));
                    }
                    Err(error) => {
                        // A panicked task would otherwise strand its
                        // in-flight flag and spin the throbber forever.
                        warn!(%error, "background task failed");
                        app.executing = false;
                        app.loading_logs = false;
                        app.config.saving = false;
                    }
                }
                needs_render = true;
            }
            _ = signal::ctrl_c() => break,
        }

        if app.should_quit {
            break;
        }

        // Some terminals drop resize events under load; compare against the
        // last known size as a fallback.
        if let Ok((width, height)) = crossterm::terminal::size()
            && last_size != Some((width, height))
        {
            last_size = Some((width, height));
            let _ = app.update(Msg::Resize(width, height));
            needs_render = true;
        }

        if needs_render {
            render(&mut terminal, app)?;
        }
    }

    cleanup_terminal(&mut terminal)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn disarmed_timer_never_fires() {
        let mut timer = RefreshTimer::new(Duration::from_secs(5));
        tokio::select! {
            _ = timer.tick() => panic!("disarmed timer fired"),
            _ = time::sleep(Duration::from_secs(60)) => {}
        }
    }

    #[tokio::test(start_paused = true)]
    async fn armed_timer_fires_one_full_period_out() {
        let mut timer = RefreshTimer::new(Duration::from_secs(5));
        timer.arm();
        let started = time::Instant::now();
        timer.tick().await;
        assert_eq!(started.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn armed_timer_keeps_its_cadence() {
        let mut timer = RefreshTimer::new(Duration::from_secs(5));
        timer.arm();
        let started = time::Instant::now();
        timer.tick().await;
        timer.tick().await;
        assert_eq!(started.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_pushes_the_next_fire_out() {
        let mut timer = RefreshTimer::new(Duration::from_secs(5));
        timer.arm();
        time::sleep(Duration::from_secs(4)).await;
        timer.arm();
        let started = time::Instant::now();
        timer.tick().await;
        assert_eq!(started.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn disarming_silences_a_running_timer() {
        let mut timer = RefreshTimer::new(Duration::from_secs(5));
        timer.arm();
        timer.disarm();
        tokio::select! {
            _ = timer.tick() => panic!("disarmed timer fired"),
            _ = time::sleep(Duration::from_secs(60)) => {}
        }
    }
}
