//! Single-agent adapter: answers as one crew role, without running the crew.

use async_trait::async_trait;
use tracing::warn;

use crewcheck_core::{AgentAdapter, AgentInput, AgentReply, CrewcheckError};
use crewcheck_crew::{CrewRole, CustomerServiceCrew};

/// Lets a scenario talk to one crew role in isolation.
pub struct IndividualAgentAdapter {
    role_title: String,
    role: Option<CrewRole>,
}

impl IndividualAgentAdapter {
    /// Resolve `role_title` against the crew. Unknown roles are accepted and
    /// answered with a generic template.
    pub fn new(role_title: impl Into<String>) -> Self {
        let role_title = role_title.into();
        let crew = CustomerServiceCrew::new();
        let role = CrewRole::from_title(&role_title).filter(|r| crew.agent(*r).is_some());
        if role.is_none() {
            let err = CrewcheckError::UnknownRole(role_title.clone());
            warn!(error = %err, "Falling back to generic agent replies");
        }
        Self { role_title, role }
    }

    pub fn role(&self) -> Option<CrewRole> {
        self.role
    }

    fn respond(&self, message: &str) -> String {
        match self.role {
            Some(CrewRole::Triage) => format!(
                "I'll help route your inquiry: '{message}'. Let me determine the best specialist for your needs."
            ),
            Some(CrewRole::Technical) => format!(
                "I'll help you with this technical issue: '{message}'. Let me provide a step-by-step solution."
            ),
            Some(CrewRole::Billing) => format!(
                "I'll assist you with this billing matter: '{message}'. Let me review your account and resolve this."
            ),
            Some(CrewRole::Manager) => format!(
                "I'll personally handle this escalated issue: '{message}'. Let me ensure we find the best solution for you."
            ),
            None => format!("As a {}, I'll help you with: '{message}'", self.role_title),
        }
    }
}

#[async_trait]
impl AgentAdapter for IndividualAgentAdapter {
    fn name(&self) -> &str {
        &self.role_title
    }

    async fn call(&self, input: AgentInput) -> AgentReply {
        let message = input.last_user_message().unwrap_or_default();
        AgentReply::Text(self.respond(message))
    }
}
