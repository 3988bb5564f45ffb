use thiserror::Error;

use crate::llm::LlmError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("No usable meal name could be recovered from the reply")]
    NoUsableName,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Store query failed: {0}")]
    Query(String),

    #[error("Store task panicked or was cancelled: {0}")]
    Join(String),
}

#[derive(Error, Debug)]
pub enum GenerateError {
    /// No suggestion can possibly be generated (missing credential,
    /// unconfigured provider).
    #[error("Generative service unavailable: {0}")]
    ServiceUnavailable(#[source] LlmError),
}
