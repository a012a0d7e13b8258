//! Tracing subscriber setup
//!
//! The TUI owns the terminal, so interactive sessions log to
//! `<data dir>/moviemanager/moviemanager.log`. CLI commands log to stderr.
//! The filter comes from `RUST_LOG`, then the config's `log_level`,
//! then `info`.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

const DEFAULT_LEVEL: &str = "info";

/// Log file location for interactive sessions
pub fn log_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("moviemanager").join("moviemanager.log"))
}

fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config.log_level.as_deref().unwrap_or(DEFAULT_LEVEL);
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    })
}

/// Log to a file. Silently does nothing when the file cannot be opened.
pub fn init_tui_logging(config: &Config) {
    let Some(path) = log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(env_filter(config))
        .with(layer)
        .try_init();
}

/// Log to stderr, keeping stdout clean for command output
pub fn init_cli_logging(config: &Config) {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(env_filter(config))
        .with(layer)
        .try_init();
}
