use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel::sql_types::{Array, Bool, Text};

use super::schema::meals;
use super::{MealRow, MealStore, StoreQuery};
use crate::error::StoreError;

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

const CREATE_MEALS_TABLE: &str = r#"CREATE TABLE IF NOT EXISTS meals (
    id UUID PRIMARY KEY,
    name VARCHAR NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    meal_type VARCHAR NOT NULL,
    dietary_preference VARCHAR NOT NULL,
    cuisine VARCHAR,
    prep_time VARCHAR,
    ingredients TEXT[] NOT NULL DEFAULT '{}',
    instructions TEXT[] NOT NULL DEFAULT '{}',
    tags TEXT[] NOT NULL DEFAULT '{}'
)"#;

/// Postgres-backed store. Queries run on tokio's blocking pool.
#[derive(Clone)]
pub struct PgMealStore {
    pool: DbPool,
}

impl std::fmt::Debug for PgMealStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgMealStore").finish_non_exhaustive()
    }
}

impl PgMealStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Build a pool for `database_url` and make sure the `meals` table exists.
    pub fn connect(database_url: &str) -> Result<Self, StoreError> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = r2d2::Pool::builder()
            .build(manager)
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let mut conn = pool
            .get()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        diesel::sql_query(CREATE_MEALS_TABLE)
            .execute(&mut conn)
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(Self { pool })
    }

    async fn run<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> Result<T, diesel::result::Error> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| StoreError::Connection(e.to_string()))?;
            f(&mut conn).map_err(|e| StoreError::Query(e.to_string()))
        })
        .await
        .map_err(|e| StoreError::Join(e.to_string()))?
    }
}

/// Escape LIKE wildcards and wrap as a substring pattern.
fn like_pattern(token: &str) -> String {
    format!(
        "%{}%",
        token
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_")
    )
}

fn filtered(query: &StoreQuery) -> meals::BoxedQuery<'static, Pg> {
    let mut boxed = meals::table
        .filter(meals::meal_type.eq(query.meal_type.clone()))
        .filter(meals::dietary_preference.eq(query.dietary_preference.clone()))
        .into_boxed();

    // Any token in the ingredient list or the description
    if !query.ingredient_tokens.is_empty() {
        let patterns: Vec<String> = query.ingredient_tokens.iter().map(|t| like_pattern(t)).collect();
        boxed = boxed.filter(
            sql::<Bool>("(array_to_string(ingredients, ' ') ILIKE ANY(")
                .bind::<Array<Text>, _>(patterns.clone())
                .sql(") OR description ILIKE ANY(")
                .bind::<Array<Text>, _>(patterns)
                .sql("))"),
        );
    }

    boxed
}

#[async_trait]
impl MealStore for PgMealStore {
    async fn count(&self, query: &StoreQuery) -> Result<usize, StoreError> {
        let query = query.clone();
        let total: i64 = self
            .run(move |conn| filtered(&query).count().get_result(conn))
            .await?;
        tracing::debug!(total, "Counted meals");
        Ok(total.max(0) as usize)
    }

    async fn fetch(
        &self,
        query: &StoreQuery,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<MealRow>, StoreError> {
        let query = query.clone();
        self.run(move |conn| {
            filtered(&query)
                .order((meals::name.asc(), meals::id.asc()))
                .limit(limit as i64)
                .offset(offset as i64)
                .select(MealRow::as_select())
                .load(conn)
        })
        .await
    }
}
