use thiserror::Error;

/// Top-level error type for crewcheck components.
#[derive(Debug, Error)]
pub enum CrewcheckError {
    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error("responder error: {0}")]
    Responder(String),

    #[error("agent with role '{0}' not found in crew")]
    UnknownRole(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("timed out after {0}s")]
    Timeout(u64),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
