pub mod chat;
pub mod error;
pub mod input;
pub mod traits;
pub mod types;

pub use chat::{ChatMessage, Role};
pub use error::CrewcheckError;
pub use input::{AgentInput, AgentReply, TurnKind};
pub use traits::{AgentAdapter, Responder, ResponderFactory};
pub use types::{AgentSummary, CrewInfo, DEFAULT_CUSTOMER_ID};
