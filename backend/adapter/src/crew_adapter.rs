use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crewcheck_core::{
    AgentAdapter, AgentInput, AgentReply, ChatMessage, CrewInfo, CrewcheckError, Responder,
    ResponderFactory, TurnKind,
};
use crewcheck_crew::CustomerServiceCrew;

use crate::cleaner::clean_response;
use crate::extract::{extract_customer_id, format_conversation};
use crate::thread_store::{ThreadState, ThreadStore, ThreadStoreConfig};

const CUSTOMER_ID_KEY: &str = "customer_id";
const LAST_RESPONSE_KEY: &str = "last_response";

/// Payload returned for judgment turns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JudgmentSummary {
    pub conversation_summary: String,
    pub total_messages: usize,
    pub customer_id: String,
    pub last_response: String,
    pub crew_info: CrewInfo,
}

/// Connects the scenario harness to a crew, one crew instance per thread.
pub struct CrewAdapter {
    threads: ThreadStore,
}

impl CrewAdapter {
    pub fn new(factory: ResponderFactory, config: ThreadStoreConfig) -> Self {
        Self {
            threads: ThreadStore::new(factory, &config),
        }
    }

    /// Adapter backed by the offline [`CustomerServiceCrew`].
    pub fn with_default_crew(config: ThreadStoreConfig) -> Self {
        let factory: ResponderFactory =
            Arc::new(|| Arc::new(CustomerServiceCrew::new()) as Arc<dyn Responder>);
        Self::new(factory, config)
    }

    /// Messages stored for a thread, or `None` if the thread was never seen.
    pub async fn thread_messages(&self, thread_id: &str) -> Option<Vec<ChatMessage>> {
        let state = self.threads.get(thread_id)?;
        let state = state.lock().await;
        Some(state.messages.clone())
    }

    /// A context value stored for a thread (`customer_id`, `last_response`).
    pub async fn thread_context(&self, thread_id: &str, key: &str) -> Option<serde_json::Value> {
        let state = self.threads.get(thread_id)?;
        let state = state.lock().await;
        state.context.get(key).cloned()
    }

    pub fn thread_count(&self) -> u64 {
        self.threads.len()
    }

    pub fn forget_thread(&self, thread_id: &str) {
        self.threads.forget(thread_id);
    }

    async fn converse(
        &self,
        state: &mut ThreadState,
        input: &AgentInput,
        customer_id: String,
    ) -> Result<String, CrewcheckError> {
        let user_message = match input.last_user_message() {
            Some(m) => m.to_string(),
            None => {
                warn!(thread_id = %input.thread_id, "No user message in input; sending empty inquiry");
                String::new()
            }
        };

        let responder = Arc::clone(&state.responder);
        let cid = customer_id.clone();
        let raw = tokio::task::spawn_blocking(move || responder.respond(&user_message, &cid))
            .await
            .map_err(|e| CrewcheckError::Responder(e.to_string()))?
            .map_err(|e| CrewcheckError::Responder(e.to_string()))?;

        let response = clean_response(&raw);
        debug!(raw_len = raw.len(), cleaned_len = response.len(), "Cleaned crew response");

        state.context.insert(
            LAST_RESPONSE_KEY.to_string(),
            serde_json::Value::String(response.clone()),
        );
        state.context.insert(
            CUSTOMER_ID_KEY.to_string(),
            serde_json::Value::String(customer_id),
        );
        Ok(response)
    }

    fn judgment_summary(state: &ThreadState, input: &AgentInput) -> JudgmentSummary {
        JudgmentSummary {
            conversation_summary: format_conversation(&input.messages),
            total_messages: input.messages.len(),
            customer_id: state
                .context_str(CUSTOMER_ID_KEY)
                .unwrap_or("unknown")
                .to_string(),
            last_response: state
                .context_str(LAST_RESPONSE_KEY)
                .unwrap_or_default()
                .to_string(),
            crew_info: state.responder.crew_info(),
        }
    }
}

fn apology(err: &CrewcheckError) -> String {
    format!(
        "I apologize, but I encountered an error while processing your request. \
         Please try again or contact support if the issue persists. \
         Error: Error in crew adapter: {err}"
    )
}

#[async_trait]
impl AgentAdapter for CrewAdapter {
    fn name(&self) -> &str {
        "crew_adapter"
    }

    #[instrument(skip(self, input), fields(thread_id = %input.thread_id))]
    async fn call(&self, input: AgentInput) -> AgentReply {
        let state = self.threads.get_or_create(&input.thread_id);
        let mut state = state.lock().await;

        let customer_id = extract_customer_id(&input.messages);
        state.messages.extend(input.new_messages.iter().cloned());

        match input.turn_kind() {
            TurnKind::Judgment => {
                info!(messages = input.messages.len(), "Answering judgment request");
                let summary = Self::judgment_summary(&state, &input);
                match serde_json::to_string(&summary) {
                    Ok(json) => AgentReply::Text(json),
                    Err(e) => {
                        let err = CrewcheckError::Other(e.into());
                        error!(error = %err, "Failed to encode judgment summary");
                        AgentReply::Text(apology(&err))
                    }
                }
            }
            TurnKind::Conversation => match self.converse(&mut state, &input, customer_id).await {
                Ok(response) => AgentReply::Text(response),
                Err(err) => {
                    error!(error = %err, "Crew adapter turn failed");
                    AgentReply::Text(apology(&err))
                }
            },
        }
    }
}
