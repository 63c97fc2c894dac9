//! Logging initialization for nextstep.
//!
//! Logs go to stderr so stdout stays clean for rendered suggestions, or to
//! `{state}/logs/nextstep-{datetime}.log` when `logging.to_file` is set.

use anyhow::Result;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Result of logging initialization
pub struct LoggingHandle {
    /// Guard that must be kept alive for the duration of the program.
    /// When dropped, ensures all buffered logs are flushed.
    pub _guard: Option<WorkerGuard>,

    /// Path to the log file (only set with file logging enabled)
    pub log_file_path: Option<PathBuf>,
}

/// Effective level filter: `--debug` wins over the configured level
pub fn effective_level(config: &Config, debug_override: bool) -> String {
    if debug_override {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    }
}

/// Log file name for a given timestamp
pub fn log_file_name(timestamp: chrono::DateTime<chrono::Utc>) -> String {
    format!("nextstep-{}.log", timestamp.format("%Y%m%dT%H%M%SZ"))
}

/// Where file logging writes for a run started at `timestamp`, if enabled
pub fn log_file_path(
    config: &Config,
    timestamp: chrono::DateTime<chrono::Utc>,
) -> Option<PathBuf> {
    config
        .logging
        .to_file
        .then(|| config.logs_path().join(log_file_name(timestamp)))
}

/// Initialize logging from configuration.
///
/// # Arguments
/// * `config` - Application configuration
/// * `debug_override` - If true, override log level to "debug" (from --debug flag)
///
/// # Returns
/// A `LoggingHandle` that must be kept alive for the duration of the program.
pub fn init_logging(config: &Config, debug_override: bool) -> Result<LoggingHandle> {
    let log_level = effective_level(config, debug_override);
    let filter = tracing_subscriber::EnvFilter::new(std::env::var("RUST_LOG").unwrap_or(log_level));

    if let Some(log_file_path) = log_file_path(config, chrono::Utc::now()) {
        let logs_dir = config.logs_path();
        std::fs::create_dir_all(&logs_dir)?;

        let file_appender = tracing_appender::rolling::never(
            &logs_dir,
            log_file_path.file_name().unwrap_or_default(),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false) // No ANSI codes in log files
                    .with_writer(non_blocking),
            )
            .init();

        Ok(LoggingHandle {
            _guard: Some(guard),
            log_file_path: Some(log_file_path),
        })
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();

        Ok(LoggingHandle {
            _guard: None,
            log_file_path: None,
        })
    }
}
