//! Simulation viewer binary.
//!
//! Composition root: loads configuration, sets up file logging (the terminal
//! backend owns stdout), builds a presentation backend, and runs the toy
//! ecosystem through it.
//!
//! # Features
//!
//! - `backend-terminal`: ratatui/crossterm terminal backend (default)
//! - `backend-window`: minifb window with the egui overlay (default)
//!
//! # Examples
//!
//! ```bash
//! # Let the factory pick (window when a display is reachable)
//! cargo run -p sim-viewer
//!
//! # Force the terminal backend with mouse input
//! SIM_BACKEND=terminal SIM_MOUSE=1 cargo run -p sim-viewer
//! ```
mod app;
mod world;

use std::path::PathBuf;

use anyhow::{Context, Result};
use presentation::{Presentation, RenderConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use app::ViewerApp;
use world::{Ecosystem, Params};

const WORLD_WIDTH: u32 = 192;
const WORLD_HEIGHT: u32 = 108;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging()?;

    let config = RenderConfig::from_env();
    tracing::info!(?config, "starting simulation viewer");

    let presentation = Presentation::new(config).context("no presentation backend available")?;
    let world = Ecosystem::new(WORLD_WIDTH, WORLD_HEIGHT, Params::default());

    ViewerApp::new(presentation, world).run()?;

    tracing::info!("viewer shutdown complete");
    Ok(())
}

/// File-only logging; stdout belongs to the terminal backend.
fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "viewer.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    // Keep the writer alive for the rest of the process.
    std::mem::forget(guard);

    tracing::info!("Log file: {}/viewer.log", log_dir.display());
    Ok(())
}

/// Platform cache directory for viewer logs.
///
/// - Linux: `~/.cache/sim-viewer/logs` (or `$XDG_CACHE_HOME/sim-viewer/logs`)
/// - macOS: `~/Library/Caches/sim-viewer/logs`
/// - Windows: `%LOCALAPPDATA%\sim-viewer\cache\logs`
/// - Fallback: `<tmp>/sim-viewer/logs`
fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "sim-viewer")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("sim-viewer"))
        .join("logs")
}
