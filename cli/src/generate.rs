use anyhow::{Context, Result};
use mealwise_core::{create_provider, GenerationOrchestrator, SuggestConfig, SuggestionCriteria};

/// Generate meals and print them as a JSON array.
pub async fn generate(config: &SuggestConfig, criteria: &SuggestionCriteria, count: usize) -> Result<()> {
    let provider = create_provider(config).context("Failed to create LLM provider")?;
    let orchestrator = GenerationOrchestrator::new(provider, config.orchestrator);

    let meals = orchestrator
        .generate(criteria, count)
        .await
        .context("Generation failed")?;

    println!("{}", serde_json::to_string_pretty(&meals)?);
    Ok(())
}
