//! WorkTime - convert prices into hours of work, in the terminal.
//!
//! Type an hourly wage and a price; the result shows how long one has to work
//! to pay for it. Settings persist between runs. With a shell origin
//! configured, the offline web shell is cached in the background and the
//! `--sync-shell`, `--fetch` and `--navigate` flags drive it directly.

mod app;
mod cli;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use worktime_core::settings::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
use worktime_core::Config;

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file written inside the log directory
const LOG_FILE: &str = "worktime.log";

fn env_filter() -> EnvFilter {
    // RUST_LOG controls the level, e.g. RUST_LOG=worktime_core=debug
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Log to stderr, for command-line commands
fn init_stderr_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter())
        .init();
}

/// Log to a file so the terminal UI stays clean. Logging is skipped if no
/// log directory can be created.
fn init_file_tracing(config: &Config) -> Option<WorkerGuard> {
    let log_dir = config.log_dir().ok()?;
    std::fs::create_dir_all(&log_dir).ok()?;

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(env_filter())
        .init();
    Some(guard)
}

/// Settings store backed by `storage.json`, or memory if there is no config
/// directory.
fn settings_store(config: &Config) -> Arc<dyn KeyValueStore> {
    match config.storage_path() {
        Ok(path) => Arc::new(FileKeyValueStore::new(path)),
        Err(e) => {
            warn!(error = %e, "No config directory, settings will not persist");
            Arc::new(MemoryKeyValueStore::new())
        }
    }
}

/// Load config for the terminal UI, falling back to defaults
fn load_config() -> Config {
    match Config::load() {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args = cli::Args::parse();
    if let Some(action) = args.action() {
        init_stderr_tracing();
        return cli::run(action, &Config::load()?).await;
    }

    let config = load_config();
    let _log_guard = init_file_tracing(&config);
    info!("WorkTime starting");

    let store = settings_store(&config);
    let mut app = App::new(config, store);
    app.start_shell_sync();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("WorkTime shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Windows reports releases too
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key) {
                    return Ok(());
                }
            }
        }

        // Pick up settings changes and finished background work
        app.check_settings_changes();
        app.check_background_tasks();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
