//! Heuristics that pull context out of raw conversation messages.

use crewcheck_core::{ChatMessage, Role, DEFAULT_CUSTOMER_ID};

/// Find a customer id in the conversation.
///
/// Every message is lowercased and split on whitespace; the first token that
/// contains `cust` and has a successor yields that successor. Matching is
/// deliberately broad, so "customer 4477" resolves to `4477`. Falls back to
/// [`DEFAULT_CUSTOMER_ID`].
pub fn extract_customer_id(messages: &[ChatMessage]) -> String {
    for msg in messages {
        let content = msg.content.to_lowercase();
        let words: Vec<&str> = content.split_whitespace().collect();
        for pair in words.windows(2) {
            if pair[0].contains("cust") {
                return pair[1].to_string();
            }
        }
    }
    DEFAULT_CUSTOMER_ID.to_string()
}

/// Render the conversation as `Customer:` / `Agent:` / `System:` lines.
pub fn format_conversation(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| {
            let speaker = match m.role {
                Role::User => "Customer",
                Role::Assistant => "Agent",
                Role::System => "System",
            };
            format!("{speaker}: {}", m.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
