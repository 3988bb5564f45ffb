//! End-to-end tests for the generation orchestrator against fake providers.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use mealwise_core::{
    FakeProvider, GenerateError, GenerationOrchestrator, LlmError, MealSuggestion,
    OrchestratorConfig, Source, SuggestionCriteria,
};

fn distinct_names(meals: &[MealSuggestion]) -> bool {
    let keys: HashSet<String> = meals.iter().map(|m| m.name.trim().to_lowercase()).collect();
    keys.len() == meals.len()
}

#[tokio::test(start_paused = true)]
async fn test_timing_out_service_yields_fallback() {
    let provider = Arc::new(FakeProvider::with_meal_responses().with_delay(Duration::from_secs(60)));
    let orchestrator = GenerationOrchestrator::new(
        provider.clone(),
        OrchestratorConfig {
            max_attempts: 6,
            time_budget: Duration::from_secs(5),
        },
    );

    let meals = orchestrator
        .generate(&SuggestionCriteria::new("dinner", "none"), 3)
        .await
        .unwrap();

    assert_eq!(meals.len(), 3);
    assert!(meals.iter().all(|m| m.source == Source::Fallback));
    assert!(meals.iter().all(|m| !m.is_ai_generated));
    assert!(distinct_names(&meals));
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn test_repeated_names_are_deduplicated() {
    let provider = Arc::new(FakeProvider::with_sequence([
        r#"{"name": "Moi Moi"}"#,
        r#"{"name": "  moi moi "}"#,
        r#"{"name": "MOI MOI"}"#,
        r#"{"name": "Ofada Stew"}"#,
        r#"{"name": "ofada stew"}"#,
        r#"{"name": "Moi Moi"}"#,
    ]));
    let orchestrator = GenerationOrchestrator::new(provider.clone(), OrchestratorConfig::default());

    let meals = orchestrator
        .generate(&SuggestionCriteria::new("lunch", "none"), 3)
        .await
        .unwrap();

    assert_eq!(provider.call_count(), 6);
    assert_eq!(meals.len(), 3);
    assert!(distinct_names(&meals));
    let ai: Vec<&str> = meals
        .iter()
        .filter(|m| m.source == Source::Ai)
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(ai, vec!["Moi Moi", "Ofada Stew"]);
    assert_eq!(meals[2].source, Source::Fallback);
}

#[tokio::test]
async fn test_canned_replies_recover_each_meal_type() {
    let provider = Arc::new(FakeProvider::with_meal_responses());
    let orchestrator = GenerationOrchestrator::new(provider, OrchestratorConfig::default());

    let cases = [
        ("breakfast", "Akara and Pap"),
        ("lunch", "Egusi Soup"),
        ("dinner", "Jollof Rice"),
        ("snack", "Chin Chin"),
    ];
    for (meal_type, expected) in cases {
        let meals = orchestrator
            .generate(&SuggestionCriteria::new(meal_type, "none"), 1)
            .await
            .unwrap();
        assert_eq!(meals.len(), 1, "{}", meal_type);
        assert_eq!(meals[0].name, expected, "{}", meal_type);
        assert_eq!(meals[0].source, Source::Ai, "{}", meal_type);
    }
}

#[tokio::test]
async fn test_garbage_replies_only_cost_attempts() {
    let provider = Arc::new(FakeProvider::new().with_default_response("sorry, no idea"));
    provider.push_error(LlmError::ApiError {
        status: 500,
        message: "overloaded".to_string(),
    });
    let orchestrator = GenerationOrchestrator::new(provider.clone(), OrchestratorConfig::default());

    let meals = orchestrator
        .generate(&SuggestionCriteria::new("breakfast", "vegetarian"), 2)
        .await
        .unwrap();

    assert_eq!(provider.call_count(), 4);
    assert_eq!(meals.len(), 2);
    assert!(meals.iter().all(|m| m.source == Source::Fallback));
    assert!(distinct_names(&meals));
}

#[tokio::test]
async fn test_short_catalog_returns_partial_result() {
    let provider = Arc::new(FakeProvider::new().with_default_response("nothing useful"));
    let orchestrator = GenerationOrchestrator::new(provider, OrchestratorConfig::default());

    // Only two lunch entries are vegan
    let meals = orchestrator
        .generate(&SuggestionCriteria::new("lunch", "vegan"), 5)
        .await
        .unwrap();
    assert_eq!(meals.len(), 2);
    assert!(distinct_names(&meals));
}

#[tokio::test]
async fn test_missing_credential_is_unavailable() {
    let orchestrator = GenerationOrchestrator::new(
        Arc::new(FakeProvider::unconfigured()),
        OrchestratorConfig::default(),
    );
    let err = orchestrator
        .generate(&SuggestionCriteria::new("dinner", "none"), 3)
        .await
        .unwrap_err();
    assert!(matches!(err, GenerateError::ServiceUnavailable(LlmError::NotConfigured(_))));
}
