//! Pagination and store-to-generation handoff through the public API.

use std::sync::Arc;

use mealwise_core::{
    FakeProvider, GenerationOrchestrator, MealRow, MemoryStore, OrchestratorConfig,
    PaginationEngine, Source, SuggestionCriteria, SuggestionService,
};

fn seed_rows() -> Vec<MealRow> {
    serde_json::from_str(
        r#"[
            {"name": "Efo Riro", "mealType": "dinner", "dietaryPreference": "none",
             "ingredients": ["Spinach", "Palm oil", "Locust beans"]},
            {"name": "Amala and Ewedu", "mealType": "dinner", "dietaryPreference": "none",
             "ingredients": ["Yam flour", "Jute leaves"]},
            {"name": "Banga Soup", "mealType": "dinner", "dietaryPreference": "none",
             "description": "Palm fruit soup", "ingredients": ["Palm fruit", "Catfish"]},
            {"name": "Akara", "mealType": "breakfast", "dietaryPreference": "none",
             "ingredients": ["Beans"]}
        ]"#,
    )
    .unwrap()
}

fn engine() -> PaginationEngine {
    PaginationEngine::with_seed(Arc::new(MemoryStore::new(seed_rows())), 42)
}

#[tokio::test]
async fn test_pages_follow_name_order() {
    let engine = engine();
    let criteria = SuggestionCriteria::new("dinner", "none");

    assert_eq!(engine.total_available(&criteria).await.unwrap(), 3);

    let mut seen = Vec::new();
    let mut flags = Vec::new();
    for _ in 0..3 {
        let page = engine.suggestions(&criteria, 1, false).await;
        seen.push(page.suggestions[0].name.clone());
        flags.push((page.total_shown, page.has_more));
    }
    assert_eq!(seen, vec!["Amala and Ewedu", "Banga Soup", "Efo Riro"]);
    assert_eq!(flags, vec![(1, true), (2, true), (3, false)]);

    let done = engine.suggestions(&criteria, 1, false).await;
    assert_eq!(done.actual, 0);
    assert!(!done.has_more);
}

#[tokio::test]
async fn test_ingredient_filter_counts_separately() {
    let engine = engine();
    let palm = SuggestionCriteria::new("dinner", "none").with_ingredients("palm");

    let page = engine.suggestions(&palm, 5, false).await;
    let names: Vec<&str> = page.suggestions.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Banga Soup", "Efo Riro"]);
    assert_eq!(page.total_available, 2);
    assert!(!page.has_more);
}

#[tokio::test]
async fn test_reset_replays_first_page() {
    let engine = engine();
    let criteria = SuggestionCriteria::new("dinner", "none");

    let first = engine.suggestions(&criteria, 2, false).await;
    engine.suggestions(&criteria, 2, false).await;
    engine.reset_criteria(&criteria);
    let replay = engine.suggestions(&criteria, 2, false).await;

    assert_eq!(first, replay);
    assert_eq!(replay.total_shown, 2);
}

#[tokio::test]
async fn test_exhausted_store_hands_off_to_generation() {
    let engine = Arc::new(engine());
    let provider = FakeProvider::with_sequence([
        r#"{"name": "Efo Riro"}"#,
        r#"{"name": "Edikang Ikong", "cuisine": "Efik"}"#,
        r#"{"name": "Nkwobi"}"#,
    ]);
    let service = SuggestionService::new(
        engine.clone(),
        GenerationOrchestrator::new(Arc::new(provider), OrchestratorConfig::default()),
    );
    let criteria = SuggestionCriteria::new("dinner", "none");

    let first = service.next_batch(&criteria, 2, false).await;
    assert_eq!(first.generated, 0);
    assert!(first.page.has_more);

    let second = service.next_batch(&criteria, 2, false).await;
    let names: Vec<&str> = second.suggestions.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Efo Riro", "Edikang Ikong"]);
    assert_eq!(second.suggestions[0].source, Source::Database);
    assert_eq!(second.suggestions[1].source, Source::Ai);
    assert_eq!(second.generated, 1);
    assert!(!second.page.has_more);

    assert!(engine.state(&criteria).unwrap().is_exhausted());
}
