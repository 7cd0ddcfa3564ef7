//! Logging configuration with rotation support
//!
//! # Example
//!
//! ```no_run
//! use ragkit_core::logging::init_logging;
//!
//! init_logging("logs", "ragkit.log", "info").unwrap();
//! ```

use crate::error::{Error, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging to stdout and a daily rotated file
///
/// - `directory`: Directory to store logs
/// - `filename_prefix`: Prefix for log files (e.g. "ragkit.log")
/// - `level`: Default log level (e.g. "info", "debug")
pub fn init_logging(directory: &str, filename_prefix: &str, level: &str) -> Result<()> {
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(filename_prefix)
        .build(directory)
        .map_err(|e| Error::Internal(format!("Failed to create log appender: {}", e)))?;

    // Stdout: human readable. File: no colors.
    let stdout_layer = fmt::layer().with_target(false).compact();
    let file_layer = fmt::layer().with_writer(file_appender).with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to init tracing: {}", e)))
}

/// Initialize stdout-only logging
pub fn init_stdout_logging(level: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(fmt::layer().with_target(false).compact())
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to init tracing: {}", e)))
}

// RUST_LOG overrides the default level
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_string_lossy().into_owned();

        // Whichever init runs first in this process wins; the other must
        // report an error instead of panicking.
        let first = init_logging(&path, "ragkit.log", "debug");
        let second = init_stdout_logging("debug");
        assert!(first.is_err() || second.is_err());
    }
}
