//! Adapters between the scenario harness and the customer-service crew.
//!
//! [`CrewAdapter`] keeps one conversation state per thread id, forwards
//! conversational turns to the crew and answers judgment turns with a JSON
//! summary. [`IndividualAgentAdapter`] addresses a single crew role.

pub mod cleaner;
pub mod crew_adapter;
pub mod extract;
pub mod individual;
pub mod thread_store;

pub use cleaner::clean_response;
pub use crew_adapter::{CrewAdapter, JudgmentSummary};
pub use extract::{extract_customer_id, format_conversation};
pub use individual::IndividualAgentAdapter;
pub use thread_store::{ThreadState, ThreadStore, ThreadStoreConfig};
