//! Store-first suggestion flow with generative top-up.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::error::GenerateError;
use crate::generate::{fallback, GenerationOrchestrator};
use crate::pagination::PaginationEngine;
use crate::types::{MealSuggestion, SuggestionCriteria, SuggestionPage};

/// What one [`SuggestionService::next_batch`] call produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionBatch {
    /// Store suggestions first, then any top-up.
    pub suggestions: Vec<MealSuggestion>,
    /// The store page as served by the engine.
    pub page: SuggestionPage,
    /// How many suggestions came from the generative service.
    pub generated: usize,
}

/// Serves from the store while it has rows and fills the rest of each
/// batch from the orchestrator.
#[derive(Debug, Clone)]
pub struct SuggestionService {
    engine: Arc<PaginationEngine>,
    orchestrator: GenerationOrchestrator,
}

impl SuggestionService {
    pub fn new(engine: Arc<PaginationEngine>, orchestrator: GenerationOrchestrator) -> Self {
        Self {
            engine,
            orchestrator,
        }
    }

    pub fn engine(&self) -> &PaginationEngine {
        &self.engine
    }

    /// Up to `count` suggestions with distinct names.
    ///
    /// An unavailable generative service does not fail the batch: the
    /// shortfall is padded from the fallback catalog instead.
    pub async fn next_batch(
        &self,
        criteria: &SuggestionCriteria,
        count: usize,
        get_new: bool,
    ) -> SuggestionBatch {
        let page = self.engine.suggestions(criteria, count, get_new).await;
        let mut suggestions = page.suggestions.clone();
        let shortfall = count.saturating_sub(suggestions.len());
        if shortfall == 0 {
            return SuggestionBatch {
                suggestions,
                page,
                generated: 0,
            };
        }

        let taken: Vec<String> = suggestions.iter().map(|s| s.name.clone()).collect();
        tracing::info!(
            meal_type = %criteria.meal_type,
            from_store = suggestions.len(),
            shortfall,
            "Topping up batch with generated suggestions"
        );

        let extra = match self
            .orchestrator
            .generate_excluding(criteria, shortfall, &taken)
            .await
        {
            Ok(extra) => extra,
            Err(GenerateError::ServiceUnavailable(e)) => {
                tracing::warn!(error = %e, "Generation unavailable, padding from catalog");
                let mut seen: HashSet<String> =
                    suggestions.iter().map(|s| s.dedup_key()).collect();
                let mut padded = Vec::with_capacity(shortfall);
                fallback::pad(criteria, &mut seen, &mut padded, shortfall);
                padded
            }
        };

        let generated = extra.iter().filter(|m| m.is_ai_generated).count();
        suggestions.extend(extra);

        SuggestionBatch {
            suggestions,
            page,
            generated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OrchestratorConfig;
    use crate::llm::FakeProvider;
    use crate::store::{MealRow, MemoryStore};
    use crate::types::Source;
    use uuid::Uuid;

    fn row(name: &str) -> MealRow {
        MealRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            meal_type: "lunch".to_string(),
            dietary_preference: "none".to_string(),
            cuisine: Some("Nigerian".to_string()),
            prep_time: None,
            ingredients: Vec::new(),
            instructions: Vec::new(),
            tags: Vec::new(),
        }
    }

    fn service(rows: Vec<MealRow>, provider: FakeProvider) -> SuggestionService {
        let engine = PaginationEngine::with_seed(Arc::new(MemoryStore::new(rows)), 11);
        let orchestrator =
            GenerationOrchestrator::new(Arc::new(provider), OrchestratorConfig::default());
        SuggestionService::new(Arc::new(engine), orchestrator)
    }

    #[tokio::test]
    async fn test_full_page_skips_generation() {
        let service = service(
            vec![row("Amala"), row("Moi Moi")],
            FakeProvider::unconfigured(),
        );
        let batch = service
            .next_batch(&SuggestionCriteria::new("lunch", "none"), 2, false)
            .await;
        assert_eq!(batch.suggestions.len(), 2);
        assert_eq!(batch.generated, 0);
        assert!(batch.suggestions.iter().all(|s| s.source == Source::Database));
    }

    #[tokio::test]
    async fn test_short_page_is_topped_up() {
        let service = service(
            vec![row("Moi Moi")],
            FakeProvider::with_sequence([r#"{"name": "Moi Moi"}"#, r#"{"name": "Ofada Stew"}"#]),
        );
        let batch = service
            .next_batch(&SuggestionCriteria::new("lunch", "none"), 2, false)
            .await;

        let names: Vec<&str> = batch.suggestions.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Moi Moi", "Ofada Stew"]);
        assert_eq!(batch.generated, 1);
        assert_eq!(batch.page.actual, 1);
        assert!(!batch.page.has_more);
    }

    #[tokio::test]
    async fn test_unavailable_generation_pads_from_catalog() {
        let service = service(vec![row("Moi Moi")], FakeProvider::unconfigured());
        let batch = service
            .next_batch(&SuggestionCriteria::new("lunch", "none"), 3, false)
            .await;

        let names: Vec<&str> = batch.suggestions.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Moi Moi", "Egusi Soup", "Vegetable Fried Rice"]);
        assert_eq!(batch.generated, 0);
    }
}
