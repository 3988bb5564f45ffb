//! Generative text service abstraction.
//!
//! Suggestions are generated by sending a system instruction plus a user
//! prompt to an LLM and parsing whatever text comes back. Providers only
//! move text; making sense of the reply is the job of [`crate::extract`].

mod claude;
mod fake;

pub use claude::ClaudeProvider;
pub use fake::FakeProvider;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{ProviderKind, SuggestConfig};

/// Error type for LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    #[error("Endpoint unreachable: {0}")]
    Unreachable(String),
}

impl LlmError {
    /// True when no call to this provider can ever succeed, as opposed to a
    /// single failed attempt.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, LlmError::NotConfigured(_) | LlmError::Unreachable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_errors() {
        assert!(LlmError::NotConfigured("no key".to_string()).is_unavailable());
        assert!(LlmError::Unreachable("connection refused".to_string()).is_unavailable());
        assert!(!LlmError::RequestFailed("reset by peer".to_string()).is_unavailable());
        assert!(!LlmError::Timeout(500).is_unavailable());
        assert!(!LlmError::RateLimited { retry_after_secs: None }.is_unavailable());
    }
}

/// Trait for LLM providers.
///
/// Implementations should be stateless and thread-safe. The provider makes
/// the API call and returns the model's raw text reply.
#[async_trait]
pub trait LlmProvider: Send + Sync + fmt::Debug {
    /// Send a system instruction and a user prompt, get the text reply.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError>;

    /// Get the provider name (e.g., "claude", "fake").
    fn provider_name(&self) -> &'static str;

    /// Get the model name (e.g., "claude-3-5-haiku-20241022").
    fn model_name(&self) -> &str;
}

/// Build the provider selected by the configuration.
///
/// A `claude` provider without an API key yields
/// [`LlmError::NotConfigured`].
pub fn create_provider(config: &SuggestConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    match config.provider {
        ProviderKind::Fake => Ok(Arc::new(FakeProvider::with_meal_responses())),
        ProviderKind::Claude => {
            let api_key = config
                .api_key
                .clone()
                .ok_or_else(|| LlmError::NotConfigured("ANTHROPIC_API_KEY not set".to_string()))?;
            Ok(Arc::new(ClaudeProvider::new(
                api_key,
                config.model.clone(),
                config.request_timeout,
            )))
        }
    }
}
