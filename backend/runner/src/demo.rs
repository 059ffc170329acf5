//! The canned four-inquiry demo.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crewcheck_core::{AgentAdapter, ChatMessage};
use crewcheck_logging::{TurnEvent, TurnEventLogger};

use crate::results::ResultsStore;
use crate::turn::{call_with_timeout, timestamp, turn_input};

pub const DEMO_INQUIRIES: [&str; 4] = [
    "I can't log into my account",
    "I was charged twice for my subscription",
    "How do I integrate your API with my application?",
    "I want to cancel my subscription",
];

/// One demo inquiry and its outcome. Exactly one of `response` / `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoRecord {
    pub inquiry: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub customer_id: String,
    pub timestamp: String,
}

/// Send each canned inquiry on its own thread, tagged with customer
/// `CUST00{i}`. A failed inquiry is recorded and the run moves on.
///
/// `on_record` sees each record as soon as it is ready. Results are written to
/// `basic_demo_*.json`.
pub async fn run_basic_demo(
    adapter: &dyn AgentAdapter,
    store: &ResultsStore,
    turn_timeout: Option<Duration>,
    mut on_record: impl FnMut(usize, &DemoRecord),
) -> Result<(Vec<DemoRecord>, PathBuf)> {
    let mut records = Vec::with_capacity(DEMO_INQUIRIES.len());

    for (i, inquiry) in DEMO_INQUIRIES.iter().enumerate() {
        let n = i + 1;
        let customer_id = format!("CUST00{n}");
        let thread_id = Uuid::new_v4().to_string();
        let messages = vec![
            ChatMessage::system(format!("Customer {customer_id} opened a support request.")),
            ChatMessage::user(*inquiry),
        ];

        TurnEventLogger::log_event(
            &thread_id,
            TurnEvent::Inquiry {
                customer_id: customer_id.clone(),
                content: inquiry.to_string(),
            },
        );

        let record = match call_with_timeout(adapter, turn_input(&thread_id, &messages, 0), turn_timeout).await {
            Ok(reply) => {
                let response = reply.text();
                TurnEventLogger::log_event(&thread_id, TurnEvent::Response { content: response.clone() });
                DemoRecord {
                    inquiry: inquiry.to_string(),
                    response: Some(response),
                    error: None,
                    customer_id,
                    timestamp: timestamp(),
                }
            }
            Err(e) => {
                let error_msg = format!("Error processing inquiry: {e}");
                warn!(inquiry = n, error = %e, "Demo inquiry failed");
                TurnEventLogger::log_event(&thread_id, TurnEvent::Error { error_msg: error_msg.clone() });
                DemoRecord {
                    inquiry: inquiry.to_string(),
                    response: None,
                    error: Some(error_msg),
                    customer_id,
                    timestamp: timestamp(),
                }
            }
        };
        on_record(n, &record);
        records.push(record);
    }

    let path = store.write_json("basic_demo", &records).await?;
    info!(inquiries = records.len(), "Basic demo complete");
    Ok((records, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crewcheck_adapter::{CrewAdapter, ThreadStoreConfig};
    use crewcheck_core::{AgentInput, AgentReply};

    struct Echo;

    #[async_trait]
    impl AgentAdapter for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn call(&self, input: AgentInput) -> AgentReply {
            let system = input.new_messages.first().map(|m| m.content.clone()).unwrap_or_default();
            AgentReply::Text(format!("{system} | {}", input.last_user_message().unwrap_or_default()))
        }
    }

    struct Stuck;

    #[async_trait]
    impl AgentAdapter for Stuck {
        fn name(&self) -> &str {
            "stuck"
        }

        async fn call(&self, _input: AgentInput) -> AgentReply {
            tokio::time::sleep(Duration::from_secs(60)).await;
            AgentReply::Text("too late".into())
        }
    }

    #[tokio::test]
    async fn records_every_inquiry_and_writes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ResultsStore::new(tmp.path());
        let mut seen = Vec::new();
        let (records, path) = run_basic_demo(&Echo, &store, None, |n, _| seen.push(n))
            .await
            .unwrap();

        assert_eq!(seen, vec![1, 2, 3, 4]);
        assert_eq!(records.len(), 4);
        assert_eq!(records[1].customer_id, "CUST002");
        assert_eq!(
            records[1].response.as_deref(),
            Some("Customer CUST002 opened a support request. | I was charged twice for my subscription")
        );
        assert!(records.iter().all(|r| r.error.is_none()));

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("basic_demo_"));
        let saved: Vec<serde_json::Value> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved.len(), 4);
        assert!(saved[0].get("error").is_none());
        assert_eq!(saved[0]["inquiry"], "I can't log into my account");
    }

    #[tokio::test]
    async fn timeouts_become_error_records() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ResultsStore::new(tmp.path());
        let (records, _) = run_basic_demo(&Stuck, &store, Some(Duration::from_millis(10)), |_, _| {})
            .await
            .unwrap();

        assert_eq!(records.len(), 4);
        for r in &records {
            assert!(r.response.is_none());
            let err = r.error.as_deref().unwrap();
            assert!(err.starts_with("Error processing inquiry: timed out"), "{err}");
        }
    }

    #[tokio::test]
    async fn default_crew_greets_tagged_customers() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ResultsStore::new(tmp.path());
        let adapter = CrewAdapter::with_default_crew(ThreadStoreConfig::default());
        let (records, _) = run_basic_demo(&adapter, &store, None, |_, _| {}).await.unwrap();

        assert_eq!(adapter.thread_count(), 4);
        let first = records[0].response.as_deref().unwrap();
        assert!(first.starts_with("Hello John Smith"), "{first}");
        let second = records[1].response.as_deref().unwrap();
        assert!(second.starts_with("Hello Sarah Johnson"), "{second}");
    }
}
