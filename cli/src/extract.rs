use anyhow::{Context, Result};
use mealwise_core::{estimate, extract_draft, Source, SuggestionCriteria};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Extract a meal from a raw reply.
/// Outputs JSON to stdout (the meal and the strategy that produced it, or an error message).
pub async fn extract(file: Option<&Path>, criteria: &SuggestionCriteria) -> Result<()> {
    let raw = match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read reply file: {}", path.display()))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read reply from stdin")?;
            buf
        }
    };

    match extract_draft(&raw) {
        Ok(extraction) => {
            let meal = estimate::complete(extraction.draft, Source::Ai, criteria);
            let json = serde_json::json!({
                "strategy": extraction.strategy,
                "meal": meal,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
            Ok(())
        }
        Err(e) => {
            let error_json = serde_json::json!({
                "error": e.to_string()
            });
            println!("{}", serde_json::to_string_pretty(&error_json)?);
            // Return error so exit code is non-zero
            Err(anyhow::anyhow!("Failed to extract meal: {}", e))
        }
    }
}
