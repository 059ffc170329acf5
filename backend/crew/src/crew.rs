use anyhow::Result;
use tracing::{debug, info};

use crewcheck_core::{CrewInfo, CrewcheckError, Responder};

use crate::agents::{AgentProfile, CrewRole};
use crate::tools::{CrewTool, CustomerDataTool, KnowledgeBaseTool, TicketingTool};
use crate::triage::{triage, InquiryKind, Priority, TriageDecision};

/// The customer-service crew: triage hands each inquiry to one specialist, who
/// answers using the shared tools. Runs hierarchically with the manager on top.
pub struct CustomerServiceCrew {
    agents: Vec<AgentProfile>,
    knowledge_base: KnowledgeBaseTool,
    customers: CustomerDataTool,
    tickets: TicketingTool,
}

impl Default for CustomerServiceCrew {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomerServiceCrew {
    pub fn new() -> Self {
        Self {
            agents: CrewRole::ALL.into_iter().map(AgentProfile::for_role).collect(),
            knowledge_base: KnowledgeBaseTool,
            customers: CustomerDataTool,
            tickets: TicketingTool,
        }
    }

    pub fn agents(&self) -> &[AgentProfile] {
        &self.agents
    }

    pub fn agent(&self, role: CrewRole) -> Option<&AgentProfile> {
        self.agents.iter().find(|a| a.role == role)
    }

    fn tools(&self) -> [&dyn CrewTool; 3] {
        [&self.knowledge_base, &self.customers, &self.tickets]
    }

    /// Run an inquiry through the crew. The output carries the crew's execution
    /// log lines ahead of the final answer, as a verbose crew run does.
    pub fn handle_inquiry(&self, inquiry: &str, customer_id: &str) -> Result<String> {
        let inquiry = inquiry.trim();
        if inquiry.is_empty() {
            return Err(CrewcheckError::EmptyInput("inquiry is empty".to_string()).into());
        }

        let decision = triage(inquiry);
        info!(
            customer_id = %customer_id,
            kind = ?decision.kind,
            priority = decision.priority.as_str(),
            assignee = decision.assignee.title(),
            "Triaged inquiry"
        );

        let customer = self.customers.run(customer_id);
        let kb = self.knowledge_base.run(inquiry);
        debug!(customer = %customer, kb = %kb, "Tool results");

        let ticket = if decision.escalate || decision.priority >= Priority::High {
            Some(self.tickets.create(
                &ticket_title(&decision),
                inquiry,
                decision.priority.as_str(),
            ))
        } else {
            None
        };

        let mut out = Vec::new();
        out.push(format!("[Crew] Executing task for customer {customer_id}"));
        out.push(format!("Agent: {}", CrewRole::Triage.title()));
        out.push(format!("Task: Route inquiry \"{inquiry}\""));
        if decision.assignee != CrewRole::Triage {
            out.push(format!("Delegating work to {}", decision.assignee.title()));
            out.push(format!("Agent: {}", decision.assignee.title()));
        }
        out.push(format!("[Tool] customer_data_lookup -> {customer}"));
        out.push("## Final Answer:".to_string());
        out.push(String::new());
        out.extend(self.compose_answer(&decision, customer_id, &kb, ticket.as_deref()));
        Ok(out.join("\n"))
    }

    fn compose_answer(
        &self,
        decision: &TriageDecision,
        customer_id: &str,
        kb: &str,
        ticket: Option<&str>,
    ) -> Vec<String> {
        let mut lines = Vec::new();
        match self.customers.customer_name(customer_id) {
            Some(name) => lines.push(format!("Hello {name}, thank you for reaching out.")),
            None => lines.push("Hello, thank you for reaching out.".to_string()),
        }

        if decision.escalate {
            lines.push(
                "I understand how frustrating this has been, and I'm sorry it has taken this long."
                    .to_string(),
            );
            lines.push(
                "I've escalated your case to our Customer Service Manager, who will contact you within 24 hours."
                    .to_string(),
            );
        } else {
            lines.push(match decision.kind {
                InquiryKind::Billing => {
                    "I understand billing problems are stressful, so let me help you resolve this."
                }
                InquiryKind::Technical => "I'll help you fix this step by step.",
                InquiryKind::General => "I'd be happy to help you with that.",
            }
            .to_string());
        }

        match kb.strip_prefix("Knowledge Base Result: ") {
            Some(answer) => lines.push(format!("Here's what we can do: {answer}")),
            None => lines.push(
                "Let me check with the right specialist so we find the best solution for you."
                    .to_string(),
            ),
        }

        if let Some(ticket) = ticket {
            lines.push(ticket.to_string());
        }
        lines.push("Please let me know if there is anything else I can help you with.".to_string());
        lines
    }
}

fn ticket_title(decision: &TriageDecision) -> String {
    let area = match decision.kind {
        InquiryKind::Billing => "Billing",
        InquiryKind::Technical => "Technical",
        InquiryKind::General => "General",
    };
    if decision.escalate {
        format!("Escalated {area} inquiry")
    } else {
        format!("{area} inquiry")
    }
}

impl Responder for CustomerServiceCrew {
    fn respond(&self, message: &str, customer_id: &str) -> Result<String> {
        self.handle_inquiry(message, customer_id)
    }

    fn crew_info(&self) -> CrewInfo {
        CrewInfo {
            agents: self.agents.iter().map(AgentProfile::summary).collect(),
            process: "hierarchical".to_string(),
            tools: self.tools().iter().map(|t| t.name().to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_inquiry_gets_steps_and_ticket() {
        let crew = CustomerServiceCrew::new();
        let out = crew.handle_inquiry("I can't login to my account", "CUST001").unwrap();
        assert!(out.contains("Hello John Smith"));
        assert!(out.contains("Clear browser cache"));
        assert!(out.contains("Support ticket TKT-"));
        assert!(out.contains("## Final Answer:"));
    }

    #[test]
    fn escalation_mentions_manager() {
        let crew = CustomerServiceCrew::new();
        let out = crew
            .handle_inquiry("I've waited weeks, get me a supervisor", "cust002")
            .unwrap();
        assert!(out.contains("Hello Sarah Johnson"));
        assert!(out.contains("Customer Service Manager, who will contact you"));
        assert!(out.contains("Escalated"));
    }

    #[test]
    fn unknown_customer_still_answered() {
        let crew = CustomerServiceCrew::new();
        let out = crew.handle_inquiry("What are your hours?", "nobody").unwrap();
        assert!(out.contains("Hello, thank you for reaching out."));
        assert!(out.contains("Monday-Friday"));
        assert!(!out.contains("Support ticket"));
    }

    #[test]
    fn empty_inquiry_fails() {
        let crew = CustomerServiceCrew::new();
        let err = crew.handle_inquiry("   ", "CUST001").unwrap_err();
        assert!(err.to_string().contains("empty input"));
    }

    #[test]
    fn crew_info_lists_agents_and_tools() {
        let info = CustomerServiceCrew::new().crew_info();
        assert_eq!(info.agents.len(), 4);
        assert_eq!(info.process, "hierarchical");
        assert_eq!(
            info.tools,
            vec!["knowledge_base_search", "customer_data_lookup", "create_ticket"]
        );
    }
}
