//! Single adapter turns with an optional deadline.

use std::time::Duration;

use chrono::Local;

use crewcheck_core::{AgentAdapter, AgentInput, AgentReply, ChatMessage, CrewcheckError};

/// Local wall-clock time in ISO-8601 form, as stored in result files.
pub fn timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Conversation turn whose `new_messages` are everything after the first
/// `seen` messages.
pub fn turn_input(thread_id: &str, messages: &[ChatMessage], seen: usize) -> AgentInput {
    let mut input = AgentInput::conversation(thread_id, messages.to_vec());
    input.new_messages = messages.get(seen..).unwrap_or_default().to_vec();
    input
}

/// Call the adapter, giving up after `limit` if one is set. The adapter's
/// work is not cancelled; the caller just stops waiting.
pub async fn call_with_timeout(
    adapter: &dyn AgentAdapter,
    input: AgentInput,
    limit: Option<Duration>,
) -> Result<AgentReply, CrewcheckError> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, adapter.call(input))
            .await
            .map_err(|_| CrewcheckError::Timeout(limit.as_secs())),
        None => Ok(adapter.call(input).await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_messages_start_after_seen() {
        let msgs = vec![
            ChatMessage::system("s"),
            ChatMessage::user("u1"),
            ChatMessage::assistant("a1"),
            ChatMessage::user("u2"),
        ];
        let input = turn_input("t", &msgs, 2);
        assert_eq!(input.new_messages, msgs[2..].to_vec());
        assert_eq!(input.messages.len(), 4);
        assert!(!input.judgment_request);
        assert!(turn_input("t", &msgs, 9).new_messages.is_empty());
    }

    #[test]
    fn timestamp_is_iso_like() {
        let ts = timestamp();
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], "T");
    }
}
