//! Subscriber setup for the binaries. The library only emits events.

use std::path::PathBuf;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Set to `1` for debug output.
pub const DEBUG_ENV: &str = "MAZEBOT_DEBUG";
/// Directory the log file is written to. Defaults to the system temp directory.
pub const LOG_DIR_ENV: &str = "MAZEBOT_LOG_DIR";

fn level_from(debug: Option<&str>) -> Level {
    match debug {
        Some("1") => Level::DEBUG,
        _ => Level::INFO,
    }
}

pub fn log_dir() -> PathBuf {
    std::env::var_os(LOG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
}

/// Sends events to `file_name` through a non-blocking writer.
///
/// Stdout is left to the rendered maze. Buffered lines are flushed when the
/// returned guard is dropped, so hold it until the end of `main`.
pub fn init(file_name: &str) -> Result<WorkerGuard, Box<dyn std::error::Error + Send + Sync>> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(log_dir())?;
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let level = level_from(std::env::var(DEBUG_ENV).ok().as_deref());

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_max_level(level)
        .with_ansi(false)
        .try_init()?;
    tracing::debug!("Logging to {:?} at {}", log_dir().join(file_name), level);
    Ok(guard)
}
