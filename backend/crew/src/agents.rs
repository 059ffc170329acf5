//! Crew member profiles.

use serde::{Deserialize, Serialize};

use crewcheck_core::AgentSummary;

/// The four seats in the customer-service crew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrewRole {
    Triage,
    Technical,
    Billing,
    Manager,
}

impl CrewRole {
    pub const ALL: [CrewRole; 4] = [
        CrewRole::Triage,
        CrewRole::Technical,
        CrewRole::Billing,
        CrewRole::Manager,
    ];

    /// Display title, as used by the scenario harness to address an agent.
    pub fn title(&self) -> &'static str {
        match self {
            CrewRole::Triage => "Customer Service Triage Specialist",
            CrewRole::Technical => "Technical Support Specialist",
            CrewRole::Billing => "Billing Support Specialist",
            CrewRole::Manager => "Customer Service Manager",
        }
    }

    pub fn from_title(title: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.title() == title)
    }
}

/// Static description of a crew member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    pub role: CrewRole,
    pub goal: String,
    pub backstory: String,
    pub allow_delegation: bool,
    pub max_iter: u32,
}

impl AgentProfile {
    pub fn for_role(role: CrewRole) -> Self {
        let (goal, backstory, allow_delegation, max_iter) = match role {
            CrewRole::Triage => (
                "Efficiently route customer inquiries to the appropriate specialist agent",
                "Experienced triage specialist who quickly understands customer needs, \
                 identifies urgent issues and directs them to the right department.",
                true,
                3,
            ),
            CrewRole::Technical => (
                "Resolve technical issues and provide clear, actionable solutions",
                "Senior support engineer for software and integration issues who explains \
                 complex concepts simply and always gives step-by-step solutions.",
                false,
                5,
            ),
            CrewRole::Billing => (
                "Handle billing inquiries, process refunds, and resolve payment issues",
                "Detail-oriented billing specialist, empathetic about money concerns and \
                 authorised to process refunds and adjust accounts.",
                false,
                4,
            ),
            CrewRole::Manager => (
                "Handle escalated issues and ensure customer satisfaction",
                "Customer service manager for the most sensitive cases, empowered to make \
                 exceptions and offer compensation.",
                true,
                6,
            ),
        };
        Self {
            role,
            goal: goal.to_string(),
            backstory: backstory.to_string(),
            allow_delegation,
            max_iter,
        }
    }

    pub fn summary(&self) -> AgentSummary {
        AgentSummary {
            role: self.role.title().to_string(),
            goal: self.goal.clone(),
        }
    }
}
