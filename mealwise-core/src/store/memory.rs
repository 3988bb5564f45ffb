use std::path::Path;

use async_trait::async_trait;

use super::{MealRow, MealStore, StoreQuery};
use crate::error::StoreError;

/// In-process store with the same filter and ordering rules as
/// [`super::PgMealStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Vec<MealRow>,
}

impl MemoryStore {
    pub fn new(mut rows: Vec<MealRow>) -> Self {
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Self { rows }
    }

    /// Load rows from a JSON array file.
    pub fn from_json_file(path: &Path) -> Result<Self, StoreError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Connection(format!("{}: {}", path.display(), e)))?;
        let rows: Vec<MealRow> = serde_json::from_str(&text)
            .map_err(|e| StoreError::Query(format!("{}: {}", path.display(), e)))?;
        Ok(Self::new(rows))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn matching<'a>(&'a self, query: &'a StoreQuery) -> impl Iterator<Item = &'a MealRow> + 'a {
        self.rows.iter().filter(move |row| matches(row, query))
    }
}

fn matches(row: &MealRow, query: &StoreQuery) -> bool {
    if row.meal_type != query.meal_type || row.dietary_preference != query.dietary_preference {
        return false;
    }
    if query.ingredient_tokens.is_empty() {
        return true;
    }

    let ingredients = row.ingredients.join(" ").to_lowercase();
    let description = row.description.to_lowercase();
    query.ingredient_tokens.iter().any(|token| {
        let token = token.to_lowercase();
        ingredients.contains(&token) || description.contains(&token)
    })
}

#[async_trait]
impl MealStore for MemoryStore {
    async fn count(&self, query: &StoreQuery) -> Result<usize, StoreError> {
        Ok(self.matching(query).count())
    }

    async fn fetch(
        &self,
        query: &StoreQuery,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<MealRow>, StoreError> {
        Ok(self.matching(query).skip(offset).take(limit).cloned().collect())
    }
}
