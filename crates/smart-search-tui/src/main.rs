use std::time::Duration;

use anyhow::{Context, Result};
use ratatui::{
    crossterm::{self, event},
    prelude::*,
    widgets::*,
};
use smart_search::{Action, Notification};
use tokio::sync::mpsc;

use ::log::debug;

use crate::app::{App, AppEvent};
use crate::config::AppConfig;

mod app;
mod config;
mod geometry;
mod log_capture;
mod theme;
mod view_models;
mod views;

pub fn initialize_panic_handler() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = shutdown();
        original_hook(panic_info);
    }));
}

fn startup() -> Result<()> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(
        std::io::stderr(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture
    )?;
    Ok(())
}

fn shutdown() -> Result<()> {
    crossterm::execute!(
        std::io::stderr(),
        crossterm::event::DisableMouseCapture,
        crossterm::terminal::LeaveAlternateScreen
    )?;
    crossterm::terminal::disable_raw_mode()?;
    Ok(())
}

/// Forward terminal events to the main loop until the receiver goes away
fn start_event_handler(tx: mpsc::UnboundedSender<AppEvent>) -> tokio::task::JoinHandle<()> {
    let tick_rate = Duration::from_millis(250);
    tokio::spawn(async move {
        loop {
            let ready = match event::poll(tick_rate) {
                Ok(ready) => ready,
                Err(err) => {
                    ::log::error!("Polling terminal events failed: {}", err);
                    break;
                }
            };
            if !ready {
                continue;
            }
            let terminal_event = match event::read() {
                Ok(terminal_event) => terminal_event,
                Err(err) => {
                    ::log::error!("Reading terminal event failed: {}", err);
                    break;
                }
            };
            if tx.send(AppEvent::Terminal(terminal_event)).is_err() {
                break;
            }
        }
    })
}

/// One unit of work for the main loop
enum Step {
    Deferred(Action),
    Notification(Notification),
    Event(AppEvent),
    Closed,
}

async fn run(config: AppConfig, log_buffer: log_capture::LogBuffer) -> Result<()> {
    let mut t = Terminal::new(CrosstermBackend::new(std::io::stderr()))?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (mut app, mut notifications) = App::new(config, event_tx.clone(), log_buffer);
    let event_task = start_event_handler(event_tx);

    app.reload_data();

    loop {
        let size = t.size().context("Failed to read terminal size")?;
        app.sync_layout(Rect::new(0, 0, size.width, size.height));

        t.draw(|f| {
            ui(f, &mut app);
        })?;

        // Timer and placement completions first, then notifications, then input
        let step = tokio::time::timeout(Duration::from_millis(100), async {
            tokio::select! {
                biased;
                Some(action) = app.controller.recv() => Step::Deferred(action),
                Some(notification) = notifications.recv() => Step::Notification(notification),
                Some(app_event) = event_rx.recv() => Step::Event(app_event),
                else => Step::Closed,
            }
        })
        .await;

        match step {
            Ok(Step::Deferred(action)) => app.controller.dispatch(action),
            Ok(Step::Notification(notification)) => {
                debug!("Notification: {:?}", notification);
                app.handle_notification(notification);
            }
            Ok(Step::Event(app_event)) => app.handle_event(app_event),
            Ok(Step::Closed) => break,
            // Timeout - advance the loading spinner
            Err(_) => app.on_tick(),
        }
        app.sync_overlay();

        if app.should_quit {
            break;
        }
    }

    app.controller.teardown();
    event_task.abort();

    Ok(())
}

fn ui(f: &mut Frame, app: &mut App) {
    let Some(layout) = app.layout else {
        return;
    };
    let snapshot = app.snapshot();
    let theme = &app.theme;

    f.render_widget(
        Block::default().style(Style::default().bg(theme.bg_primary)),
        layout.area,
    );
    views::search::render_title(f, layout.title, theme);
    views::search::render_input(f, layout.input, &snapshot, theme, app.tick);
    views::search::render_status(f, layout.status, &app.status, theme);

    // Dropdown floats above everything but the debug console
    app.dropdown = views::search::render_dropdown(f, layout.input, &snapshot, theme);

    if app.debug_console.is_open {
        views::debug_console::render_debug_console(
            f,
            f.area(),
            &app.debug_console.logs,
            app.debug_console.height_percent,
            &app.theme,
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize debug console logger before anything else
    let log_buffer = log_capture::init_logger()?;
    let config = AppConfig::load().with_args(std::env::args().skip(1));

    initialize_panic_handler();
    startup()?;
    let result = run(config, log_buffer).await;
    shutdown()?;
    result
}
