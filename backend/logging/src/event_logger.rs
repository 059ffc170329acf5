//! Turn Event Logger
//!
//! One structured record per conversation turn (inquiry, response,
//! judgment, error), redacted and emitted through `tracing` so it lands in
//! the NDJSON log.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnEvent {
    Inquiry { customer_id: String, content: String },
    Response { content: String },
    Judgment { judge: String, score: f64 },
    Error { error_msg: String },
}

impl TurnEvent {
    fn redacted(self) -> Self {
        match self {
            TurnEvent::Inquiry { customer_id, content } => TurnEvent::Inquiry {
                customer_id,
                content: redact_sensitive_data(&content),
            },
            TurnEvent::Response { content } => TurnEvent::Response {
                content: redact_sensitive_data(&content),
            },
            TurnEvent::Error { error_msg } => TurnEvent::Error {
                error_msg: redact_sensitive_data(&error_msg),
            },
            judgment @ TurnEvent::Judgment { .. } => judgment,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TurnEventEntry {
    pub thread_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: TurnEvent,
}

pub struct TurnEventLogger;

impl TurnEventLogger {
    /// Build the redacted entry for a turn event.
    pub fn entry(thread_id: &str, event: TurnEvent) -> TurnEventEntry {
        TurnEventEntry {
            thread_id: thread_id.to_string(),
            timestamp: Utc::now(),
            event: event.redacted(),
        }
    }

    /// Redact and emit a turn event on the `turn_events` target.
    pub fn log_event(thread_id: &str, event: TurnEvent) {
        let entry = Self::entry(thread_id, event);
        match serde_json::to_string(&entry) {
            Ok(json) => info!(target: "turn_events", thread_id, event = %json, "Turn event"),
            Err(_) => info!(target: "turn_events", thread_id, event = ?entry, "Turn event"),
        }
    }
}
