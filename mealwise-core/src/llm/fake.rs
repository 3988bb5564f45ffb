//! Fake LLM provider for testing.
//!
//! This provider returns deterministic responses based on prompt matching,
//! allowing tests to run without network access or API costs. It can also
//! replay a scripted sequence of replies and simulate a slow upstream.

use super::{LlmError, LlmProvider};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};
use std::time::Duration;

/// A fake LLM provider for testing.
///
/// Lookup order for each call: scripted sequence (if any entries remain),
/// then registered prompt substrings, then the default response.
#[derive(Debug)]
pub struct FakeProvider {
    /// (prompt substring, response) pairs, checked in insertion order
    responses: RwLock<Vec<(String, String)>>,
    /// Replies handed out one per call before anything else is consulted
    sequence: Mutex<VecDeque<Result<String, LlmError>>>,
    /// Default response if no match found
    default_response: Option<String>,
    /// Artificial latency applied to every call
    delay: Option<Duration>,
    /// Set when the provider should behave as if no credential exists
    unconfigured: bool,
    calls: AtomicUsize,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self::new().with_default_response("{}")
    }
}

impl FakeProvider {
    /// Create a new FakeProvider with no registered responses.
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(Vec::new()),
            sequence: Mutex::new(VecDeque::new()),
            default_response: None,
            delay: None,
            unconfigured: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a FakeProvider that returns a specific response for prompts containing a substring.
    pub fn with_response(prompt_contains: &str, response: &str) -> Self {
        let provider = Self::new();
        provider.add_response(prompt_contains, response);
        provider
    }

    /// Create a FakeProvider that replays `replies` in order, one per call.
    pub fn with_sequence<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let provider = Self::new();
        {
            let mut sequence = provider.sequence.lock().unwrap_or_else(PoisonError::into_inner);
            sequence.extend(replies.into_iter().map(|r| Ok(r.into())));
        }
        provider
    }

    /// A provider whose every call fails with [`LlmError::NotConfigured`].
    pub fn unconfigured() -> Self {
        Self {
            unconfigured: true,
            ..Self::new()
        }
    }

    /// Add a response for prompts containing a specific substring.
    pub fn add_response(&self, prompt_contains: &str, response: &str) {
        self.responses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((prompt_contains.to_string(), response.to_string()));
    }

    /// Queue an error to be returned by the next unscripted call.
    pub fn push_error(&self, error: LlmError) {
        self.sequence
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err(error));
    }

    /// Set the default response when no pattern matches.
    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    /// Sleep for `delay` before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `complete` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Create a FakeProvider with canned meal replies, one per meal type.
    ///
    /// The lunch reply carries the doubled-quote defect so that the CLI's
    /// fake mode exercises the recovery path.
    pub fn with_meal_responses() -> Self {
        let provider = Self::new();

        provider.add_response(
            "breakfast",
            r#"{"name": "Akara and Pap", "description": "Fluffy bean fritters served with smooth fermented corn pudding.", "prepTime": "40 minutes", "ingredients": ["2 cups black-eyed peas", "1 onion", "1 scotch bonnet pepper", "Salt", "Vegetable oil", "Pap (ogi)"], "instructions": ["Soak and peel the beans.", "Blend beans with onion and pepper.", "Whisk in salt until airy.", "Deep fry spoonfuls until golden.", "Prepare pap with hot water and serve."], "cuisine": "Nigerian", "difficulty": "Medium"}"#,
        );

        provider.add_response(
            "lunch",
            r#"{"name": "" "Egusi Soup" "", "description": "" "Rich melon seed soup with leafy greens." "", "prepTime": "50 minutes", "ingredients": ["1 cup ground egusi", "Spinach", "Palm oil", "Assorted meat", "Stock cubes"], "cuisine": "Nigerian"}"#,
        );

        provider.add_response(
            "dinner",
            r#"Here is a suggestion:
```json
{"name": "Jollof Rice", "description": "Smoky tomato rice cooked in a pepper base.", "prepTime": "1 hour", "ingredients": ["3 cups long grain rice", "Tomato paste", "Red bell peppers", "Onions", "Chicken stock", "Bay leaves", "Thyme"], "instructions": ["Blend peppers and onions.", "Fry tomato paste in oil.", "Add blended base and simmer.", "Stir in rice and stock.", "Cover and steam until tender."], "cuisine": "West African"}
```"#,
        );

        provider.add_response(
            "snack",
            r#"{"name": "Chin Chin", "description": "Crunchy fried dough bites.", "ingredients": ["Flour", "Sugar", "Butter", "Milk", "Nutmeg"],"#,
        );

        provider.with_default_response(
            r#"{"name": "Vegetable Stir Fry", "description": "Quick mixed vegetables in a savory sauce."}"#,
        )
    }
}

#[async_trait]
impl LlmProvider for FakeProvider {
    async fn complete(&self, _system: &str, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.unconfigured {
            return Err(LlmError::NotConfigured(
                "FakeProvider: configured as unavailable".to_string(),
            ));
        }

        let scripted = self
            .sequence
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        if let Some(reply) = scripted {
            return reply;
        }

        {
            let responses = self.responses.read().unwrap_or_else(PoisonError::into_inner);

            // First matching pattern wins (case-insensitive)
            let prompt_lower = prompt.to_lowercase();
            for (pattern, response) in responses.iter() {
                if prompt_lower.contains(&pattern.to_lowercase()) {
                    return Ok(response.clone());
                }
            }
        }

        match &self.default_response {
            Some(response) => Ok(response.clone()),
            None => Err(LlmError::RequestFailed(format!(
                "FakeProvider: No response configured for prompt (first 100 chars): {}",
                prompt.chars().take(100).collect::<String>()
            ))),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_provider_matching() {
        let provider = FakeProvider::with_response("dinner", "jollof");
        let result = provider.complete("", "Suggest a dinner").await.unwrap();
        assert_eq!(result, "jollof");
    }

    #[tokio::test]
    async fn test_fake_provider_case_insensitive() {
        let provider = FakeProvider::with_response("DINNER", "jollof");
        let result = provider.complete("", "dinner please").await.unwrap();
        assert_eq!(result, "jollof");
    }

    #[tokio::test]
    async fn test_fake_provider_no_match() {
        let provider = FakeProvider::new();
        let result = provider.complete("", "random prompt").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fake_provider_default_response() {
        let provider = FakeProvider::new().with_default_response("default");
        let result = provider.complete("", "random prompt").await.unwrap();
        assert_eq!(result, "default");
    }

    #[tokio::test]
    async fn test_sequence_then_default() {
        let provider = FakeProvider::with_sequence(["one", "two"]).with_default_response("rest");
        assert_eq!(provider.complete("", "x").await.unwrap(), "one");
        assert_eq!(provider.complete("", "x").await.unwrap(), "two");
        assert_eq!(provider.complete("", "x").await.unwrap(), "rest");
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_unconfigured() {
        let provider = FakeProvider::unconfigured();
        let err = provider.complete("", "x").await.unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_meal_responses() {
        let provider = FakeProvider::with_meal_responses();
        let result = provider
            .complete("", "Suggest one breakfast meal")
            .await
            .unwrap();
        assert!(result.contains("Akara"));
    }
}
