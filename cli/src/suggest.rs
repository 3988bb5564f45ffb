use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use mealwise_core::{
    create_provider, FakeProvider, GenerationOrchestrator, LlmProvider, MealStore, MemoryStore,
    PaginationEngine, PgMealStore, SuggestConfig, SuggestionCriteria, SuggestionService,
};

/// Build the meal store: Postgres when a URL is configured, otherwise an
/// in-memory store seeded from `seed_file` (empty without one).
pub async fn build_store(
    database_url: Option<&str>,
    seed_file: Option<&Path>,
) -> Result<Arc<dyn MealStore>> {
    if let Some(url) = database_url {
        let url = url.to_string();
        let store = tokio::task::spawn_blocking(move || PgMealStore::connect(&url))
            .await?
            .context("Failed to connect to meal database")?;
        return Ok(Arc::new(store));
    }

    match seed_file {
        Some(path) => {
            let store = MemoryStore::from_json_file(path)
                .with_context(|| format!("Failed to load seed file: {}", path.display()))?;
            tracing::info!(rows = store.len(), path = %path.display(), "Loaded seed file");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("No DATABASE_URL or --seed-file, store is empty");
            Ok(Arc::new(MemoryStore::default()))
        }
    }
}

/// Fetch `batches` batches and print each as JSON.
pub async fn suggest(
    config: &SuggestConfig,
    criteria: &SuggestionCriteria,
    count: usize,
    batches: usize,
    get_new: bool,
    seed_file: Option<&Path>,
) -> Result<()> {
    let store = build_store(config.database_url.as_deref(), seed_file).await?;

    let provider: Arc<dyn LlmProvider> = match create_provider(config) {
        Ok(provider) => provider,
        Err(e) => {
            tracing::warn!(error = %e, "LLM provider unavailable, shortfalls use the fallback catalog");
            Arc::new(FakeProvider::unconfigured())
        }
    };

    let service = SuggestionService::new(
        Arc::new(PaginationEngine::new(store)),
        GenerationOrchestrator::new(provider, config.orchestrator),
    );

    for _ in 0..batches {
        let batch = service.next_batch(criteria, count, get_new).await;
        println!("{}", serde_json::to_string_pretty(&batch)?);
    }

    Ok(())
}
