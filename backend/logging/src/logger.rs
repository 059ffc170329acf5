//! Structured Logger
//!
//! Console output for people, daily-rotated NDJSON for machines. The level
//! comes from `RUST_LOG` when set, otherwise from configuration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log files are named `crewcheck.log.YYYY-MM-DD`.
pub const LOG_FILE_PREFIX: &str = "crewcheck.log";

/// Initialize the global structured logger.
///
/// Creates `log_dir` if needed. Calling this twice is harmless: the second
/// registration is ignored.
pub fn init_logger<P: AsRef<Path>>(log_dir: P, level: &str) -> Result<()> {
    let log_dir = log_dir.as_ref();
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);

    let file_layer = fmt::layer()
        .json()
        .with_writer(file_appender)
        .with_ansi(false);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
    Ok(())
}
