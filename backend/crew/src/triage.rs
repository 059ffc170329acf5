//! Keyword triage: decides which specialist handles an inquiry.

use serde::{Deserialize, Serialize};

use crate::agents::CrewRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InquiryKind {
    Billing,
    Technical,
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageDecision {
    pub kind: InquiryKind,
    pub priority: Priority,
    pub escalate: bool,
    pub assignee: CrewRole,
}

const BILLING_TERMS: &[&str] = &[
    "bill", "charge", "refund", "payment", "invoice", "subscription", "price", "plan",
];
const TECHNICAL_TERMS: &[&str] = &[
    "log in", "login", "password", "api", "error", "integration", "crash", "bug", "slow",
    "dashboard", "webhook",
];
const URGENT_TERMS: &[&str] = &["urgent", "asap", "immediately", "right now", "minutes", "hacked"];
const HIGH_TERMS: &[&str] = &["twice", "cancel", "can't", "cannot", "broken", "security"];
const ESCALATION_TERMS: &[&str] = &[
    "manager", "supervisor", "escalate", "unacceptable", "weeks", "lawyer", "angry",
];

/// Classify an inquiry by keyword presence.
pub fn triage(inquiry: &str) -> TriageDecision {
    let text = inquiry.to_lowercase();
    let hits = |terms: &[&str]| terms.iter().filter(|t| text.contains(*t)).count();

    let billing = hits(BILLING_TERMS);
    let technical = hits(TECHNICAL_TERMS);
    let kind = if billing == 0 && technical == 0 {
        InquiryKind::General
    } else if billing > technical {
        InquiryKind::Billing
    } else {
        InquiryKind::Technical
    };

    let priority = if hits(URGENT_TERMS) > 0 {
        Priority::Urgent
    } else if hits(HIGH_TERMS) > 0 {
        Priority::High
    } else if kind == InquiryKind::General {
        Priority::Low
    } else {
        Priority::Medium
    };

    let escalate = hits(ESCALATION_TERMS) > 0;
    let assignee = match (escalate, kind) {
        (true, _) => CrewRole::Manager,
        (false, InquiryKind::Billing) => CrewRole::Billing,
        (false, InquiryKind::Technical) => CrewRole::Technical,
        (false, InquiryKind::General) => CrewRole::Triage,
    };

    TriageDecision {
        kind,
        priority,
        escalate,
        assignee,
    }
}
