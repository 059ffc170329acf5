use serde::{Deserialize, Serialize};

/// Customer id used when none can be found in the conversation.
pub const DEFAULT_CUSTOMER_ID: &str = "CUST001";

/// Role and goal of one crew member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentSummary {
    pub role: String,
    pub goal: String,
}

/// Shape of the crew behind a responder, reported in judgment summaries.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrewInfo {
    pub agents: Vec<AgentSummary>,
    pub process: String,
    pub tools: Vec<String>,
}
