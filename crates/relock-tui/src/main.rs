//! Relock TUI - Terminal host for the screen-lock gate
//!
//! Puts a protected Home screen behind the relock gate: every activation of
//! the screen runs one access check, driving a simulated biometric sensor
//! and a passphrase confirmation through terminal prompts.

use std::fs;
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod app;
mod credential;
mod sensor;
mod ui;

use app::App;

#[derive(Parser)]
#[command(name = "relock-tui")]
#[command(about = "Screen-lock gate with biometric and passphrase authentication", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory for preferences and credential storage
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Enable the simulated biometric sensor
    #[arg(long)]
    sensor: bool,

    /// Log file path (defaults to <data-dir>/relock-tui.log)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

/// Application entry point with panic handling for terminal restoration
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

    // The terminal owns stdout, so logs go to a file
    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| data_dir.join("relock-tui.log"));
    init_logging(&log_path)?;

    // Set up panic hook to restore terminal on crash
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore terminal state
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let result = run_app(&data_dir, cli.sensor).await;

    if let Err(e) = &result {
        tracing::error!("Application error: {}", e);
    }

    result
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("relock")
}

fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Arc::new(log_file)),
        )
        .with(
            EnvFilter::from_default_env()
                .add_directive("relock_tui=info".parse()?)
                .add_directive("relock_core=info".parse()?),
        )
        .init();

    Ok(())
}

/// Main application runner
async fn run_app(data_dir: &Path, use_sensor: bool) -> Result<()> {
    // Open the stores before touching the terminal so a failure leaves the
    // shell usable
    let mut app = App::new(data_dir, use_sensor)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}
