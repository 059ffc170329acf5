//! Offline customer-service crew.
//!
//! A deterministic stand-in for the multi-agent engine: four specialist
//! profiles, a keyword triage step and three tools. It implements
//! [`crewcheck_core::Responder`] so the adapter can drive it like the real crew.

pub mod agents;
pub mod crew;
pub mod tools;
pub mod triage;

pub use agents::{AgentProfile, CrewRole};
pub use crew::CustomerServiceCrew;
pub use tools::{CrewTool, CustomerDataTool, KnowledgeBaseTool, TicketingTool};
pub use triage::{InquiryKind, Priority, TriageDecision};
