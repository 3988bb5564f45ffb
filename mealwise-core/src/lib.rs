pub mod config;
pub mod error;
pub mod estimate;
pub mod extract;
pub mod generate;
pub mod llm;
pub mod pagination;
pub mod service;
pub mod store;
pub mod types;

pub use config::{ConfigError, OrchestratorConfig, ProviderKind, SuggestConfig};
pub use error::{ExtractError, GenerateError, StoreError};
pub use extract::{extract_draft, extract_meal, Extraction, ExtractionStrategy};
pub use generate::GenerationOrchestrator;
pub use llm::{create_provider, ClaudeProvider, FakeProvider, LlmError, LlmProvider};
pub use pagination::{PaginationEngine, PaginationState};
pub use service::{SuggestionBatch, SuggestionService};
pub use store::{MealRow, MealStore, MemoryStore, PgMealStore, StoreQuery};
pub use types::{
    Cost, Difficulty, MealDraft, MealSuggestion, NutritionInfo, Source, SuggestionCriteria,
    SuggestionPage,
};
