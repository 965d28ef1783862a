//! Tracing setup for the `outfitter` binary
//!
//! stdout is reserved for the JSON search results and index reports, so every
//! log line goes to stderr and, unless `--no-log-file` is given, to
//! `outfitter.log` inside the configured log directory.

use crate::error::OutfitterError;
use std::path::Path;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Log file name inside the configured log directory
pub const LOG_FILE_NAME: &str = "outfitter.log";

fn level_filter(log_level: &str) -> EnvFilter {
    // RUST_LOG takes precedence over the configured level
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
}

/// Install the stderr and log-file subscribers.
///
/// Search spans are closed with their timing, so a slow embedding or chat
/// call shows up in both outputs. Fails if a global subscriber is already
/// installed.
pub fn setup_logging(log_dir: &Path, log_level: &str) -> Result<(), OutfitterError> {
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir).map_err(|e| {
            OutfitterError::config(format!(
                "Failed to create log directory {}: {}",
                log_dir.display(),
                e
            ))
        })?;
    }

    let log_file_path = log_dir.join(LOG_FILE_NAME);
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)
        .map_err(|e| {
            OutfitterError::config(format!(
                "Failed to open log file {}: {}",
                log_file_path.display(),
                e
            ))
        })?;

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(level_filter(log_level));

    let file_layer = fmt::layer()
        .with_writer(log_file)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(level_filter(log_level));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| OutfitterError::internal(format!("Failed to install subscriber: {}", e)))?;

    tracing::info!(
        "Logging to stderr and {} at level {}",
        log_file_path.display(),
        log_level
    );

    Ok(())
}

/// Stderr-only logging, used with `--no-log-file`
pub fn setup_console_logging(log_level: &str) -> Result<(), OutfitterError> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_env_filter(level_filter(log_level))
        .try_init()
        .map_err(|e| OutfitterError::internal(format!("Failed to install subscriber: {}", e)))?;

    tracing::info!("Logging to stderr at level {}", log_level);

    Ok(())
}

/// Parse a `--log-level` value. Unknown names are a configuration error.
pub fn parse_log_level(level: &str) -> Result<Level, OutfitterError> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(OutfitterError::config(format!(
            "Unknown log level '{}' (expected trace, debug, info, warn or error)",
            level
        ))),
    }
}
