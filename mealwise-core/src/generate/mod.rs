//! Bounded, deduplicating meal generation.
//!
//! [`GenerationOrchestrator::generate`] asks the generative service for one
//! meal per attempt until it has enough distinct meals, runs out of
//! attempts, or runs out of time. Whatever is still missing is padded from
//! the static [`fallback`] catalog.

pub mod fallback;
pub mod prompts;

use std::collections::HashSet;
use std::sync::Arc;

use tokio::time::{timeout, Instant};

use crate::config::OrchestratorConfig;
use crate::error::GenerateError;
use crate::extract;
use crate::llm::{LlmError, LlmProvider};
use crate::types::{dedup_key, MealSuggestion, SuggestionCriteria};

/// Drives the generative service within attempt and time budgets.
#[derive(Debug, Clone)]
pub struct GenerationOrchestrator {
    provider: Arc<dyn LlmProvider>,
    config: OrchestratorConfig,
}

impl GenerationOrchestrator {
    pub fn new(provider: Arc<dyn LlmProvider>, config: OrchestratorConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Maximum number of generative calls for a request of `count` meals.
    pub fn attempt_limit(&self, count: usize) -> usize {
        count.saturating_mul(2).min(self.config.max_attempts)
    }

    /// Produce up to `count` meals with pairwise-distinct names.
    ///
    /// No attempt starts after the time budget has elapsed. An in-flight
    /// call is abandoned once the remaining budget runs out: its task keeps
    /// running in the background, but a reply that lands after the budget
    /// is discarded rather than accepted (see "Abandoned calls" in
    /// DESIGN.md). Failed calls and unextractable replies only consume an
    /// attempt. A provider without credentials or with an unreachable
    /// endpoint fails the whole call with
    /// [`GenerateError::ServiceUnavailable`].
    pub async fn generate(
        &self,
        criteria: &SuggestionCriteria,
        count: usize,
    ) -> Result<Vec<MealSuggestion>, GenerateError> {
        self.generate_excluding(criteria, count, &[]).await
    }

    /// Like [`generate`](Self::generate), but names in `exclude` count as
    /// already taken: they are listed in every prompt and never returned.
    pub async fn generate_excluding(
        &self,
        criteria: &SuggestionCriteria,
        count: usize,
        exclude: &[String],
    ) -> Result<Vec<MealSuggestion>, GenerateError> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let max_attempts = self.attempt_limit(count);
        let budget = self.config.time_budget;
        let started = Instant::now();

        let mut meals: Vec<MealSuggestion> = Vec::with_capacity(count);
        let mut seen: HashSet<String> = exclude.iter().map(|n| dedup_key(n)).collect();
        let mut attempt = 0;

        while meals.len() < count && attempt < max_attempts {
            let elapsed = started.elapsed();
            if elapsed >= budget {
                tracing::info!(
                    attempts = attempt,
                    accepted = meals.len(),
                    budget_ms = budget.as_millis() as u64,
                    "Generation time budget exhausted"
                );
                break;
            }
            let remaining = budget - elapsed;

            let taken: Vec<String> = exclude
                .iter()
                .cloned()
                .chain(meals.iter().map(|m| m.name.clone()))
                .collect();
            let prompt = prompts::render_user_prompt(criteria, attempt, &taken);
            attempt += 1;

            let reply = match self.call_within(prompt, remaining).await {
                CallOutcome::Reply(text) => text,
                CallOutcome::Failed(e) if e.is_unavailable() => {
                    tracing::warn!(
                        provider = self.provider.provider_name(),
                        error = %e,
                        "Generative service unavailable"
                    );
                    return Err(GenerateError::ServiceUnavailable(e));
                }
                CallOutcome::Failed(e) => {
                    tracing::debug!(attempt, error = %e, "Generation attempt failed");
                    continue;
                }
                CallOutcome::Abandoned => {
                    tracing::debug!(
                        attempt,
                        remaining_ms = remaining.as_millis() as u64,
                        "Generation attempt abandoned at budget"
                    );
                    continue;
                }
            };

            match extract::extract_meal(&reply, criteria) {
                Ok(meal) => {
                    if seen.insert(meal.dedup_key()) {
                        tracing::debug!(attempt, name = %meal.name, "Accepted generated meal");
                        meals.push(meal);
                    } else {
                        tracing::debug!(attempt, name = %meal.name, "Discarded duplicate meal");
                    }
                }
                Err(e) => {
                    tracing::debug!(attempt, error = %e, "Reply yielded no meal");
                }
            }
        }

        let generated = meals.len();
        fallback::pad(criteria, &mut seen, &mut meals, count);

        if meals.len() < count {
            tracing::warn!(
                requested = count,
                returned = meals.len(),
                meal_type = %criteria.meal_type,
                "Not enough distinct meals to fill request"
            );
        }

        tracing::info!(
            provider = self.provider.provider_name(),
            model = self.provider.model_name(),
            requested = count,
            generated,
            fallback = meals.len() - generated,
            attempts = attempt,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Generation finished"
        );

        Ok(meals)
    }

    /// Run one provider call on its own task, waiting at most `limit`.
    async fn call_within(&self, prompt: String, limit: std::time::Duration) -> CallOutcome {
        let provider = Arc::clone(&self.provider);
        let handle = tokio::spawn(async move {
            provider.complete(prompts::SYSTEM_PROMPT, &prompt).await
        });

        // Dropping the handle on timeout detaches the task.
        match timeout(limit, handle).await {
            Ok(Ok(Ok(text))) => CallOutcome::Reply(text),
            Ok(Ok(Err(e))) => CallOutcome::Failed(e),
            Ok(Err(join_error)) => {
                CallOutcome::Failed(LlmError::RequestFailed(join_error.to_string()))
            }
            Err(_) => CallOutcome::Abandoned,
        }
    }
}

enum CallOutcome {
    Reply(String),
    Failed(LlmError),
    Abandoned,
}
