use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, Role};

/// One turn handed to an adapter by the scenario harness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentInput {
    /// Full conversation so far, oldest first.
    pub messages: Vec<ChatMessage>,
    /// Messages added since the adapter was last called for this thread.
    pub new_messages: Vec<ChatMessage>,
    pub thread_id: String,
    /// Set by the harness when it wants an evaluation summary instead of a reply.
    #[serde(default)]
    pub judgment_request: bool,
    /// Opaque harness state, passed through untouched.
    #[serde(default)]
    pub scenario_state: serde_json::Value,
}

/// How an adapter must treat a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    Conversation,
    Judgment,
}

impl AgentInput {
    /// Build a conversational turn where `new_messages` is the trailing message, if any.
    pub fn conversation(thread_id: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        let new_messages = messages.last().cloned().into_iter().collect();
        Self {
            messages,
            new_messages,
            thread_id: thread_id.into(),
            judgment_request: false,
            scenario_state: serde_json::Value::Null,
        }
    }

    /// Build a judgment turn over the given conversation. No new messages are attached.
    pub fn judgment(thread_id: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            new_messages: Vec::new(),
            thread_id: thread_id.into(),
            judgment_request: true,
            scenario_state: serde_json::Value::Null,
        }
    }

    pub fn turn_kind(&self) -> TurnKind {
        if self.judgment_request {
            TurnKind::Judgment
        } else {
            TurnKind::Conversation
        }
    }

    /// Most recent user-authored message, scanning from the end.
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}

/// What an adapter hands back to the harness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgentReply {
    Text(String),
    Messages(Vec<ChatMessage>),
}

impl AgentReply {
    /// Flatten the reply into plain text, joining multi-part replies by newline.
    pub fn text(&self) -> String {
        match self {
            AgentReply::Text(s) => s.clone(),
            AgentReply::Messages(msgs) => msgs
                .iter()
                .map(|m| m.content.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

impl From<String> for AgentReply {
    fn from(s: String) -> Self {
        AgentReply::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_user_message_scans_from_end() {
        let input = AgentInput::conversation(
            "t1",
            vec![
                ChatMessage::user("first"),
                ChatMessage::assistant("reply"),
                ChatMessage::user("second"),
                ChatMessage::assistant("another"),
            ],
        );
        assert_eq!(input.last_user_message(), Some("second"));
    }

    #[test]
    fn last_user_message_absent() {
        let input = AgentInput::conversation("t1", vec![ChatMessage::system("boot")]);
        assert_eq!(input.last_user_message(), None);
    }

    #[test]
    fn turn_kind_follows_flag() {
        let convo = AgentInput::conversation("t", vec![ChatMessage::user("hi")]);
        assert_eq!(convo.turn_kind(), TurnKind::Conversation);
        assert_eq!(convo.new_messages.len(), 1);

        let judge = AgentInput::judgment("t", vec![ChatMessage::user("hi")]);
        assert_eq!(judge.turn_kind(), TurnKind::Judgment);
        assert!(judge.new_messages.is_empty());
    }

    #[test]
    fn deserializes_without_optional_fields() {
        let raw = r#"{"messages":[],"new_messages":[],"thread_id":"x"}"#;
        let input: AgentInput = serde_json::from_str(raw).unwrap();
        assert!(!input.judgment_request);
        assert!(input.scenario_state.is_null());
    }

    #[test]
    fn multi_part_reply_flattens() {
        let reply = AgentReply::Messages(vec![
            ChatMessage::assistant("one"),
            ChatMessage::assistant("two"),
        ]);
        assert_eq!(reply.text(), "one\ntwo");
    }
}
