//! Backing store of curated meal records.
//!
//! The pagination engine only sees the [`MealStore`] query contract: an
//! exact count and an offset/limit fetch ordered by name.

mod memory;
mod postgres;
pub(crate) mod schema;

pub use memory::MemoryStore;
pub use postgres::PgMealStore;

use async_trait::async_trait;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;
use crate::estimate;
use crate::types::{MealDraft, MealSuggestion, Source, SuggestionCriteria};

/// Filter sent to the store.
///
/// Meal type and dietary preference match exactly. When ingredient tokens
/// are present a row must mention at least one of them in its ingredient
/// list or its description (case-insensitive substring).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreQuery {
    pub meal_type: String,
    pub dietary_preference: String,
    pub ingredient_tokens: Vec<String>,
}

impl StoreQuery {
    pub fn from_criteria(criteria: &SuggestionCriteria) -> Self {
        Self {
            meal_type: criteria.meal_type.trim().to_string(),
            dietary_preference: criteria.dietary_preference.trim().to_string(),
            ingredient_tokens: criteria.ingredient_tokens(),
        }
    }
}

/// One curated record as stored.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::meals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct MealRow {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub meal_type: String,
    pub dietary_preference: String,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub prep_time: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl MealRow {
    /// Complete a stored row into a suggestion. Store identity is kept.
    pub fn into_suggestion(self, criteria: &SuggestionCriteria) -> MealSuggestion {
        let id = self.id;
        let draft = MealDraft {
            name: self.name,
            description: Some(self.description),
            prep_time: self.prep_time,
            ingredients: self.ingredients,
            instructions: self.instructions,
            cuisine: self.cuisine,
            tags: self.tags,
            ..Default::default()
        };
        MealSuggestion {
            id: Some(id),
            ..estimate::complete(draft, Source::Database, criteria)
        }
    }
}

/// Query contract consumed by the pagination engine.
#[async_trait]
pub trait MealStore: Send + Sync {
    /// Exact number of rows matching `query`.
    async fn count(&self, query: &StoreQuery) -> Result<usize, StoreError>;

    /// Up to `limit` matching rows starting at `offset`, ordered by name.
    async fn fetch(
        &self,
        query: &StoreQuery,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<MealRow>, StoreError>;
}
