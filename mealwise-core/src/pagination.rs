//! Per-criteria pagination over the meal store.
//!
//! Each distinct [`SuggestionCriteria`] is its own session with three pieces
//! of state: a cached row count, an offset into the name-ordered result set,
//! and the number of rows shown so far. The session is exhausted once shown
//! reaches the count; that is only a signal to the caller (usually to switch
//! to generation) and is cleared by [`PaginationEngine::reset_criteria`].
//!
//! "Get new" jumps the offset to a random position for variety but still
//! counts toward exhaustion.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::error::StoreError;
use crate::generate::fallback;
use crate::store::{MealStore, StoreQuery};
use crate::types::{SuggestionCriteria, SuggestionPage};

/// Snapshot of one criteria session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub offset: usize,
    pub shown: usize,
    /// Cached store count, if one has been taken.
    pub total: Option<usize>,
}

impl PaginationState {
    pub fn is_exhausted(&self) -> bool {
        matches!(self.total, Some(total) if self.shown >= total)
    }
}

#[derive(Default)]
struct Sessions {
    counts: HashMap<SuggestionCriteria, usize>,
    offsets: HashMap<SuggestionCriteria, usize>,
    shown: HashMap<SuggestionCriteria, usize>,
}

/// Tracks offsets and shown counts per criteria and serves store pages.
///
/// Safe to share through `Arc`; callers must not overlap
/// [`suggestions`](Self::suggestions) calls for the same criteria.
pub struct PaginationEngine {
    store: Arc<dyn MealStore>,
    sessions: Mutex<Sessions>,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl fmt::Debug for PaginationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sessions = self.sessions();
        f.debug_struct("PaginationEngine")
            .field("cached_counts", &sessions.counts.len())
            .field("active", &sessions.offsets.len())
            .finish_non_exhaustive()
    }
}

impl PaginationEngine {
    /// Engine with an OS-seeded random source.
    pub fn new(store: Arc<dyn MealStore>) -> Self {
        Self::with_rng(store, ChaCha8Rng::from_os_rng())
    }

    /// Engine with a deterministic random source.
    pub fn with_seed(store: Arc<dyn MealStore>, seed: u64) -> Self {
        Self::with_rng(store, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn with_rng(store: Arc<dyn MealStore>, rng: impl RngCore + Send + 'static) -> Self {
        Self {
            store,
            sessions: Mutex::new(Sessions::default()),
            rng: Mutex::new(Box::new(rng)),
        }
    }

    fn sessions(&self) -> MutexGuard<'_, Sessions> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of store rows matching `criteria`, cached until cleared.
    pub async fn total_available(&self, criteria: &SuggestionCriteria) -> Result<usize, StoreError> {
        if let Some(&total) = self.sessions().counts.get(criteria) {
            tracing::debug!(meal_type = %criteria.meal_type, total, "Count cache hit");
            return Ok(total);
        }

        let total = self.store.count(&StoreQuery::from_criteria(criteria)).await?;
        self.sessions().counts.insert(criteria.clone(), total);
        tracing::debug!(meal_type = %criteria.meal_type, total, "Counted store rows");
        Ok(total)
    }

    /// Serve the next page of store suggestions for `criteria`.
    ///
    /// With `get_new` the page starts at a random offset and the shown count
    /// restarts from this page. Store errors never escape: they yield a
    /// single fallback suggestion with `has_more == false`.
    pub async fn suggestions(
        &self,
        criteria: &SuggestionCriteria,
        count: usize,
        get_new: bool,
    ) -> SuggestionPage {
        match self.try_suggestions(criteria, count, get_new).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(
                    meal_type = %criteria.meal_type,
                    dietary_preference = %criteria.dietary_preference,
                    error = %e,
                    "Store query failed, serving fallback"
                );
                self.fallback_page(criteria, count)
            }
        }
    }

    async fn try_suggestions(
        &self,
        criteria: &SuggestionCriteria,
        count: usize,
        get_new: bool,
    ) -> Result<SuggestionPage, StoreError> {
        let total = self.total_available(criteria).await?;

        let (offset, prior_shown) = {
            let sessions = self.sessions();
            (
                sessions.offsets.get(criteria).copied().unwrap_or(0),
                sessions.shown.get(criteria).copied().unwrap_or(0),
            )
        };
        let offset = if get_new {
            self.random_offset(total, count)
        } else {
            offset
        };

        let actual = count.min(total.saturating_sub(offset));
        if actual == 0 {
            tracing::debug!(meal_type = %criteria.meal_type, total, offset, "Store exhausted for criteria");
            return Ok(SuggestionPage {
                suggestions: Vec::new(),
                has_more: false,
                total_available: total,
                requested: count,
                actual: 0,
                remaining: 0,
                total_shown: prior_shown,
            });
        }

        let rows = self
            .store
            .fetch(&StoreQuery::from_criteria(criteria), offset, actual)
            .await?;
        let suggestions: Vec<_> = rows
            .into_iter()
            .map(|row| row.into_suggestion(criteria))
            .collect();

        let shown = if get_new {
            actual
        } else {
            (prior_shown + actual).min(total)
        };
        {
            let mut sessions = self.sessions();
            sessions.offsets.insert(criteria.clone(), offset + actual);
            sessions.shown.insert(criteria.clone(), shown);
        }

        tracing::debug!(
            meal_type = %criteria.meal_type,
            offset,
            actual,
            shown,
            total,
            get_new,
            "Served store page"
        );

        Ok(SuggestionPage {
            suggestions,
            has_more: total > shown,
            total_available: total,
            requested: count,
            actual,
            remaining: total.saturating_sub(shown),
            total_shown: shown,
        })
    }

    fn random_offset(&self, total: usize, count: usize) -> usize {
        let upper = total.saturating_sub(count).max(1);
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .random_range(0..upper)
    }

    fn fallback_page(&self, criteria: &SuggestionCriteria, count: usize) -> SuggestionPage {
        let (total, shown) = {
            let sessions = self.sessions();
            (
                sessions.counts.get(criteria).copied().unwrap_or(0),
                sessions.shown.get(criteria).copied().unwrap_or(0),
            )
        };
        SuggestionPage {
            suggestions: vec![fallback::fallback_for(criteria)],
            has_more: false,
            total_available: total,
            requested: count,
            actual: 1,
            remaining: 0,
            total_shown: shown,
        }
    }

    /// Forget offset and shown count for `criteria`. The cached count stays.
    pub fn reset_criteria(&self, criteria: &SuggestionCriteria) {
        let mut sessions = self.sessions();
        sessions.offsets.remove(criteria);
        sessions.shown.remove(criteria);
    }

    /// Forget everything for every criteria.
    pub fn clear_all(&self) {
        let mut sessions = self.sessions();
        sessions.counts.clear();
        sessions.offsets.clear();
        sessions.shown.clear();
    }

    /// Current state for `criteria`, or `None` if nothing is recorded.
    pub fn state(&self, criteria: &SuggestionCriteria) -> Option<PaginationState> {
        let sessions = self.sessions();
        let offset = sessions.offsets.get(criteria).copied();
        let shown = sessions.shown.get(criteria).copied();
        let total = sessions.counts.get(criteria).copied();
        if offset.is_none() && shown.is_none() && total.is_none() {
            return None;
        }
        Some(PaginationState {
            offset: offset.unwrap_or(0),
            shown: shown.unwrap_or(0),
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MealRow, MemoryStore};
    use crate::types::Source;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    fn row(name: &str) -> MealRow {
        MealRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: format!("{} from the store", name),
            meal_type: "dinner".to_string(),
            dietary_preference: "none".to_string(),
            cuisine: None,
            prep_time: None,
            ingredients: vec!["Rice".to_string()],
            instructions: Vec::new(),
            tags: Vec::new(),
        }
    }

    fn engine(names: &[&str]) -> PaginationEngine {
        let store = MemoryStore::new(names.iter().map(|n| row(n)).collect());
        PaginationEngine::with_seed(Arc::new(store), 7)
    }

    fn criteria() -> SuggestionCriteria {
        SuggestionCriteria::new("dinner", "none")
    }

    fn names(page: &SuggestionPage) -> Vec<&str> {
        page.suggestions.iter().map(|s| s.name.as_str()).collect()
    }

    #[derive(Debug, Default)]
    struct CountingStore {
        inner: MemoryStore,
        counts: AtomicUsize,
    }

    #[async_trait]
    impl MealStore for CountingStore {
        async fn count(&self, query: &StoreQuery) -> Result<usize, StoreError> {
            self.counts.fetch_add(1, Ordering::SeqCst);
            self.inner.count(query).await
        }

        async fn fetch(
            &self,
            query: &StoreQuery,
            offset: usize,
            limit: usize,
        ) -> Result<Vec<MealRow>, StoreError> {
            self.inner.fetch(query, offset, limit).await
        }
    }

    #[derive(Debug)]
    struct FailingStore;

    #[async_trait]
    impl MealStore for FailingStore {
        async fn count(&self, _query: &StoreQuery) -> Result<usize, StoreError> {
            Err(StoreError::Connection("connection refused".to_string()))
        }

        async fn fetch(
            &self,
            _query: &StoreQuery,
            _offset: usize,
            _limit: usize,
        ) -> Result<Vec<MealRow>, StoreError> {
            Err(StoreError::Connection("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_sequential_pages_until_exhausted() {
        let engine = engine(&["C", "A", "B"]);
        let c = criteria();

        let expected = [("A", 1, true), ("B", 2, true), ("C", 3, false)];
        for (name, shown, has_more) in expected {
            let page = engine.suggestions(&c, 1, false).await;
            assert_eq!(names(&page), vec![name]);
            assert_eq!(page.total_shown, shown);
            assert_eq!(page.has_more, has_more);
            assert_eq!(page.total_available, 3);
            assert_eq!(page.remaining, 3 - shown);
        }

        let page = engine.suggestions(&c, 1, false).await;
        assert_eq!(page.actual, 0);
        assert!(!page.has_more);
        assert!(page.suggestions.is_empty());
        assert_eq!(page.remaining, 0);
        assert_eq!(page.total_shown, 3);
        assert!(engine.state(&c).unwrap().is_exhausted());
    }

    #[tokio::test]
    async fn test_partial_last_page() {
        let engine = engine(&["A", "B", "C"]);
        let c = criteria();

        let first = engine.suggestions(&c, 2, false).await;
        assert_eq!(names(&first), vec!["A", "B"]);
        let second = engine.suggestions(&c, 2, false).await;
        assert_eq!(names(&second), vec!["C"]);
        assert_eq!(second.requested, 2);
        assert_eq!(second.actual, 1);
        assert!(!second.has_more);
    }

    #[tokio::test]
    async fn test_get_new_resets_shown() {
        let engine = engine(&["A", "B", "C", "D", "E", "F"]);
        let c = criteria();

        engine.suggestions(&c, 2, false).await;
        engine.suggestions(&c, 2, false).await;
        assert_eq!(engine.state(&c).unwrap().shown, 4);

        let page = engine.suggestions(&c, 2, true).await;
        assert_eq!(page.actual, 2);
        assert_eq!(page.total_shown, 2);
        assert_eq!(page.remaining, 4);
        assert!(page.has_more);

        let state = engine.state(&c).unwrap();
        assert!(state.offset >= 2 && state.offset <= 6);
    }

    #[tokio::test]
    async fn test_get_new_offset_is_bounded() {
        let engine = engine(&["A", "B", "C", "D", "E"]);
        let c = criteria();

        for _ in 0..50 {
            engine.reset_criteria(&c);
            let page = engine.suggestions(&c, 2, true).await;
            assert_eq!(page.actual, 2);
            // Offsets are drawn from [0, 3)
            assert!(engine.state(&c).unwrap().offset <= 4);
        }
    }

    #[tokio::test]
    async fn test_get_new_with_count_over_total() {
        let engine = engine(&["A", "B"]);
        let c = criteria();

        let page = engine.suggestions(&c, 5, true).await;
        assert_eq!(names(&page), vec!["A", "B"]);
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn test_same_seed_same_offsets() {
        let rows = ["A", "B", "C", "D", "E", "F", "G", "H"];
        let first = engine(&rows);
        let second = engine(&rows);
        let c = criteria();

        for _ in 0..5 {
            let a = first.suggestions(&c, 2, true).await;
            let b = second.suggestions(&c, 2, true).await;
            assert_eq!(names(&a), names(&b));
        }
    }

    #[tokio::test]
    async fn test_reset_matches_first_call() {
        let engine = engine(&["A", "B", "C"]);
        let c = criteria();

        let first = engine.suggestions(&c, 1, false).await;
        engine.suggestions(&c, 1, false).await;
        engine.reset_criteria(&c);
        let again = engine.suggestions(&c, 1, false).await;

        assert_eq!(names(&first), names(&again));
        assert_eq!(first.total_shown, again.total_shown);
        assert_eq!(first.has_more, again.has_more);
        assert_eq!(first.remaining, again.remaining);
    }

    #[tokio::test]
    async fn test_reset_keeps_count_cache() {
        let store = Arc::new(CountingStore {
            inner: MemoryStore::new(vec![row("A"), row("B")]),
            ..Default::default()
        });
        let engine = PaginationEngine::with_seed(store.clone(), 1);
        let c = criteria();

        engine.suggestions(&c, 1, false).await;
        engine.suggestions(&c, 1, false).await;
        assert_eq!(store.counts.load(Ordering::SeqCst), 1);

        engine.reset_criteria(&c);
        assert_eq!(engine.state(&c).unwrap().total, Some(2));
        engine.suggestions(&c, 1, false).await;
        assert_eq!(store.counts.load(Ordering::SeqCst), 1);

        engine.clear_all();
        assert!(engine.state(&c).is_none());
        engine.suggestions(&c, 1, false).await;
        assert_eq!(store.counts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_criteria_are_independent() {
        let engine = engine(&["A", "B"]);
        let plain = criteria();
        let with_rice = criteria().with_ingredients("rice");

        engine.suggestions(&plain, 2, false).await;
        let page = engine.suggestions(&with_rice, 1, false).await;
        assert_eq!(names(&page), vec!["A"]);
        assert_eq!(page.total_shown, 1);
    }

    #[tokio::test]
    async fn test_store_error_serves_fallback() {
        let engine = PaginationEngine::with_seed(Arc::new(FailingStore), 3);
        let c = SuggestionCriteria::new("breakfast", "vegan");

        let page = engine.suggestions(&c, 4, false).await;
        assert_eq!(page.suggestions.len(), 1);
        assert_eq!(page.suggestions[0].source, Source::Fallback);
        assert_eq!(page.suggestions[0].name, "Akara");
        assert!(!page.has_more);
        assert_eq!(page.requested, 4);
        assert!(engine.state(&c).is_none());
        assert!(engine.total_available(&c).await.is_err());
    }

    #[tokio::test]
    async fn test_empty_store() {
        let engine = engine(&[]);
        let page = engine.suggestions(&criteria(), 3, true).await;
        assert_eq!(page.actual, 0);
        assert_eq!(page.total_available, 0);
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn test_store_rows_are_completed() {
        let engine = engine(&["A"]);
        let page = engine.suggestions(&criteria(), 1, false).await;
        let meal = &page.suggestions[0];
        assert_eq!(meal.source, Source::Database);
        assert!(meal.id.is_some());
        assert!(!meal.serving_size.is_empty());
    }
}
