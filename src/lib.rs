//! CoinView Market Browser Library
//!
//! Fetches cryptocurrency market snapshots, price history and news, and runs
//! them through the list/chart pipelines that feed the terminal UI.

pub mod cli;
pub mod coingecko;
pub mod config;
pub mod http;
pub mod market_data;
pub mod news;
pub mod session;
pub mod ui;

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;

use crate::config::LogConfig;

/// Application result type for consistent error handling
pub type AppResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Initialize tracing subscriber for logging.
///
/// With `to_file` set, output goes to `log.file_path` through a non-blocking
/// writer; the returned guard must be held until shutdown so buffered lines
/// are flushed. Otherwise output goes to stderr.
pub fn init_logging(level: &str, log: &LogConfig, to_file: bool) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("coinview={}", level).into());

    if !to_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .context("Failed to install stderr subscriber")?;
        return Ok(None);
    }

    let path = Path::new(&log.file_path);
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", log.file_path))?;

    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory: {}", directory.display()))?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init()
        .context("Failed to install file subscriber")?;

    Ok(Some(guard))
}
