//! Structured logging for crewcheck.
//!
//! Console plus rolling NDJSON file output, redaction of secrets before they
//! reach a log line, and typed per-turn event records.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{TurnEvent, TurnEventEntry, TurnEventLogger};
pub use logger::{init_logger, LOG_FILE_PREFIX};
pub use redact::redact_sensitive_data;
