//! Config validation: hard errors and advisory warnings with field paths.

use thiserror::Error;

use crate::schema::CrewcheckConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

pub fn validate(config: &CrewcheckConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    if config.max_turns == 0 {
        report.error("max_turns", "must be at least 1");
    }
    if config.turn_timeout_secs == Some(0) {
        report.error("turn_timeout_secs", "must be at least 1 second; omit it to wait indefinitely");
    }
    if config.max_threads == Some(0) {
        report.error("max_threads", "must be at least 1; omit it for an unbounded thread store");
    }
    if config.thread_idle_ttl_secs == Some(0) {
        report.error("thread_idle_ttl_secs", "must be at least 1 second; omit it to keep threads");
    }

    if !config.has_api_key() {
        report.warn(
            "openai_api_key",
            "OPENAI_API_KEY is not set; model-backed components are unavailable",
        );
    }
    let level = config.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) && !level.contains('=') {
        report.warn("log_level", format!("unrecognised level '{}'", config.log_level));
    }
    if config.results_dir.as_os_str().is_empty() {
        report.error("results_dir", "must not be empty");
    }

    report
}
