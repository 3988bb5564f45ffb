use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How hard a meal is to prepare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Lenient parse used for generative replies ("easy", " HARD ", ...).
    pub fn parse_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "simple" | "beginner" => Some(Difficulty::Easy),
            "medium" | "moderate" | "intermediate" => Some(Difficulty::Medium),
            "hard" | "difficult" | "advanced" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Rough ingredient cost bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cost {
    Low,
    Moderate,
    High,
}

impl Cost {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cost::Low => "Low",
            Cost::Moderate => "Moderate",
            Cost::High => "High",
        }
    }

    pub fn parse_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" | "cheap" | "budget" | "inexpensive" => Some(Cost::Low),
            "moderate" | "medium" | "average" => Some(Cost::Moderate),
            "high" | "expensive" | "premium" => Some(Cost::High),
            _ => None,
        }
    }
}

/// Where a suggestion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    Database,
    #[serde(rename = "AI")]
    Ai,
    Fallback,
    Community,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Source::Database => "Database",
            Source::Ai => "AI",
            Source::Fallback => "Fallback",
            Source::Community => "Community",
        };
        f.write_str(s)
    }
}

/// Per-serving nutrition estimate. Values are free text ("350-450", "20g").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionInfo {
    pub calories: String,
    pub protein: String,
    pub carbs: String,
    pub fat: String,
}

/// A complete meal suggestion as handed to the rest of the application.
///
/// `name` is always non-empty and trimmed. Every other field carries a
/// deterministic default once the record leaves extraction or the store
/// transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealSuggestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub prep_time: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub nutrition_info: NutritionInfo,
    pub difficulty: Difficulty,
    pub cuisine: String,
    pub tags: Vec<String>,
    pub serving_size: String,
    pub estimated_cost: Cost,
    pub is_ai_generated: bool,
    pub source: Source,
}

impl MealSuggestion {
    /// Lowercased, trimmed name used for duplicate detection.
    pub fn dedup_key(&self) -> String {
        dedup_key(&self.name)
    }
}

pub(crate) fn dedup_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Partially filled nutrition recovered from a reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialNutrition {
    pub calories: Option<String>,
    pub protein: Option<String>,
    pub carbs: Option<String>,
    pub fat: Option<String>,
}

impl PartialNutrition {
    pub fn is_empty(&self) -> bool {
        self.calories.is_none() && self.protein.is_none() && self.carbs.is_none() && self.fat.is_none()
    }
}

/// A validated but possibly incomplete record produced by the extraction
/// cascade. Only `name` is guaranteed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealDraft {
    pub name: String,
    pub description: Option<String>,
    pub prep_time: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub nutrition: PartialNutrition,
    pub difficulty: Option<Difficulty>,
    pub cuisine: Option<String>,
    pub tags: Vec<String>,
    pub serving_size: Option<String>,
    pub estimated_cost: Option<Cost>,
}

impl MealDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Filter criteria identifying one pagination session.
///
/// Two requests with identical values share pagination state; any
/// difference is a separate session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionCriteria {
    pub meal_type: String,
    pub dietary_preference: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub ingredients_text: String,
}

impl SuggestionCriteria {
    pub fn new(meal_type: impl Into<String>, dietary_preference: impl Into<String>) -> Self {
        Self {
            meal_type: meal_type.into(),
            dietary_preference: dietary_preference.into(),
            ..Default::default()
        }
    }

    pub fn with_cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = cuisine.into();
        self
    }

    pub fn with_ingredients(mut self, ingredients_text: impl Into<String>) -> Self {
        self.ingredients_text = ingredients_text.into();
        self
    }

    /// Comma-separated ingredient tokens, trimmed, empties dropped.
    pub fn ingredient_tokens(&self) -> Vec<String> {
        self.ingredients_text
            .split(',')
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string())
            .collect()
    }
}

/// One page of store-backed suggestions plus the bookkeeping the caller
/// needs to decide whether to ask the generative service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionPage {
    pub suggestions: Vec<MealSuggestion>,
    pub has_more: bool,
    pub total_available: usize,
    pub requested: usize,
    pub actual: usize,
    pub remaining: usize,
    pub total_shown: usize,
}
