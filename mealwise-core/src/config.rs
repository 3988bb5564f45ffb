//! Suggestion configuration from environment variables.

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Default model to use with the Claude provider.
pub const DEFAULT_MODEL: &str = "claude-3-5-haiku-20241022";

/// Default cap on generative calls per orchestrator invocation.
pub const DEFAULT_MAX_ATTEMPTS: usize = 6;

/// Default wall-clock ceiling for one orchestrator invocation.
pub const DEFAULT_TIME_BUDGET_MS: u64 = 25_000;

/// Default HTTP timeout for a single generative call.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 20_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Which generative provider to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Claude,
    Fake,
}

/// Budgets for one [`crate::generate::GenerationOrchestrator::generate`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Hard cap on generative calls, regardless of the requested count.
    pub max_attempts: usize,
    /// No new attempt starts once this much time has passed.
    pub time_budget: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            time_budget: Duration::from_millis(DEFAULT_TIME_BUDGET_MS),
        }
    }
}

/// Suggestion service configuration.
#[derive(Debug, Clone)]
pub struct SuggestConfig {
    pub provider: ProviderKind,
    /// API key for Claude. Absence is only an error once a Claude provider is built.
    pub api_key: Option<String>,
    pub model: String,
    pub request_timeout: Duration,
    pub orchestrator: OrchestratorConfig,
    /// Postgres URL for the meal store; `None` means use an in-memory store.
    pub database_url: Option<String>,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Fake,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            orchestrator: OrchestratorConfig::default(),
            database_url: None,
        }
    }
}

impl SuggestConfig {
    /// Load configuration from environment variables.
    ///
    /// - `MEALWISE_PROVIDER`: "claude" | "fake" (default: "fake")
    /// - `ANTHROPIC_API_KEY`: API key for Claude
    /// - `MEALWISE_MODEL`: Model name (default: "claude-3-5-haiku-20241022")
    /// - `MEALWISE_MAX_ATTEMPTS`: Attempt cap (default: 6)
    /// - `MEALWISE_TIME_BUDGET_MS`: Generation time budget (default: 25000)
    /// - `MEALWISE_REQUEST_TIMEOUT_MS`: Per-call HTTP timeout (default: 20000)
    /// - `DATABASE_URL`: Postgres URL for the meal store
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider = match env::var("MEALWISE_PROVIDER")
            .unwrap_or_else(|_| "fake".to_string())
            .as_str()
        {
            "fake" => ProviderKind::Fake,
            "claude" => ProviderKind::Claude,
            other => {
                return Err(ConfigError::InvalidValue {
                    name: "MEALWISE_PROVIDER".to_string(),
                    value: other.to_string(),
                })
            }
        };

        let api_key = env::var("ANTHROPIC_API_KEY").ok().filter(|k| !k.is_empty());
        let model = env::var("MEALWISE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let max_attempts = parse_env("MEALWISE_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS as u64)? as usize;
        let time_budget_ms = parse_env("MEALWISE_TIME_BUDGET_MS", DEFAULT_TIME_BUDGET_MS)?;
        let request_timeout_ms = parse_env("MEALWISE_REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT_MS)?;

        let database_url = env::var("DATABASE_URL").ok().filter(|u| !u.is_empty());

        Ok(Self {
            provider,
            api_key,
            model,
            request_timeout: Duration::from_millis(request_timeout_ms),
            orchestrator: OrchestratorConfig {
                max_attempts,
                time_budget: Duration::from_millis(time_budget_ms),
            },
            database_url,
        })
    }
}

fn parse_env(name: &str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SuggestConfig::default();
        assert_eq!(config.provider, ProviderKind::Fake);
        assert_eq!(config.orchestrator.max_attempts, 6);
        assert_eq!(config.orchestrator.time_budget, Duration::from_secs(25));
        assert!(config.database_url.is_none());
    }
}
