use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::input::{AgentInput, AgentReply};
use crate::types::CrewInfo;

/// Anything the scenario harness can drive: the crew adapter, single-agent
/// adapters and the judges.
#[async_trait]
pub trait AgentAdapter: Send + Sync {
    /// Human-readable name of this adapter.
    fn name(&self) -> &str;

    /// Handle one turn. Implementations never fail; errors are folded into the reply.
    async fn call(&self, input: AgentInput) -> AgentReply;
}

/// The opaque component that writes the actual reply to a customer.
///
/// Calls are synchronous and may block for a long time, so adapters run them
/// on the blocking pool.
pub trait Responder: Send + Sync {
    fn respond(&self, message: &str, customer_id: &str) -> Result<String>;

    /// Structure of the crew behind this responder.
    fn crew_info(&self) -> CrewInfo;
}

/// Builds a fresh responder for each new conversation thread.
pub type ResponderFactory = Arc<dyn Fn() -> Arc<dyn Responder> + Send + Sync>;
