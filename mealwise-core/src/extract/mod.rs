//! Resilient extraction of meal records from generative replies.
//!
//! The generative service is asked for exactly one JSON object, but replies
//! arrive wrapped in prose, truncated, with trailing commas, or with the
//! doubled-quote defect (`"name": "" "Egusi Soup" ""`). Extraction runs an
//! ordered cascade of strategies and stops at the first one that produces a
//! record with a non-empty name:
//!
//! 1. direct parse of the JSON candidate
//! 2. one structural repair pass, skipped when the doubled-quote defect is
//!    present because repair mangles it further
//! 3. regex field recovery
//! 4. emergency reconstruction from the first title-like phrase

mod classify;
mod patterns;
mod repair;

pub use classify::{classify, json_candidate, ContentAnalysis};
pub use patterns::{clean_value, DEFAULT_PREP_TIME};
pub use repair::repair_json;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ExtractError;
use crate::estimate;
use crate::types::{
    Cost, Difficulty, MealDraft, MealSuggestion, PartialNutrition, Source, SuggestionCriteria,
};

/// Identifies which strategy produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    DirectParse,
    StructuralRepair,
    PatternFields,
    EmergencyReconstruction,
}

/// A validated draft plus how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub draft: MealDraft,
    pub strategy: ExtractionStrategy,
    pub analysis: ContentAnalysis,
}

type Strategy = fn(&str, &ContentAnalysis) -> Option<MealDraft>;

/// The cascade, in order.
const CASCADE: &[(ExtractionStrategy, Strategy)] = &[
    (ExtractionStrategy::DirectParse, direct_parse),
    (ExtractionStrategy::StructuralRepair, structural_repair),
    (ExtractionStrategy::PatternFields, pattern_fields),
    (ExtractionStrategy::EmergencyReconstruction, emergency_reconstruction),
];

/// Run the extraction cascade over a raw reply.
pub fn extract_draft(raw: &str) -> Result<Extraction, ExtractError> {
    let analysis = classify(raw);

    for (strategy, run) in CASCADE {
        if let Some(draft) = run(raw, &analysis).filter(is_valid) {
            tracing::debug!(
                strategy = ?strategy,
                name = %draft.name,
                quote_defect = analysis.has_known_quote_defect,
                "Extracted meal from reply"
            );
            return Ok(Extraction {
                draft,
                strategy: *strategy,
                analysis,
            });
        }
    }

    tracing::debug!(
        reply_len = raw.len(),
        has_name_field = analysis.has_name_field,
        "No strategy recovered a meal name"
    );
    Err(ExtractError::NoUsableName)
}

/// Extract and complete a generated meal in one call.
pub fn extract_meal(
    raw: &str,
    criteria: &SuggestionCriteria,
) -> Result<MealSuggestion, ExtractError> {
    let extraction = extract_draft(raw)?;
    Ok(estimate::complete(extraction.draft, Source::Ai, criteria))
}

fn is_valid(draft: &MealDraft) -> bool {
    !draft.name.trim().is_empty()
}

fn direct_parse(raw: &str, analysis: &ContentAnalysis) -> Option<MealDraft> {
    if !analysis.is_valid_json {
        return None;
    }
    let value: Value = serde_json::from_str(json_candidate(raw)).ok()?;
    draft_from_value(&value)
}

fn structural_repair(raw: &str, analysis: &ContentAnalysis) -> Option<MealDraft> {
    if analysis.has_known_quote_defect || !analysis.is_repairable {
        return None;
    }
    let repaired = repair_json(json_candidate(raw));
    let value: Value = serde_json::from_str(&repaired).ok()?;
    draft_from_value(&value)
}

fn pattern_fields(raw: &str, _analysis: &ContentAnalysis) -> Option<MealDraft> {
    patterns::extract_fields(raw)
}

fn emergency_reconstruction(raw: &str, _analysis: &ContentAnalysis) -> Option<MealDraft> {
    patterns::reconstruct(raw)
}

/// Keys a wrapped reply may nest the meal under.
const WRAPPER_KEYS: &[&str] = &["meal", "suggestion", "recipe", "result", "data"];

/// Find the object that holds the meal: the value itself, the first element
/// of an array, or a single level of wrapping.
fn find_meal_object(value: &Value) -> Option<&Map<String, Value>> {
    match value {
        Value::Object(obj) => {
            if get_str(obj, &["name"]).is_some() {
                return Some(obj);
            }
            WRAPPER_KEYS
                .iter()
                .filter_map(|k| obj.get(*k))
                .find_map(find_meal_object)
                .or(Some(obj))
        }
        Value::Array(items) => items.iter().find_map(find_meal_object),
        _ => None,
    }
}

fn get<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k)).filter(|v| !v.is_null())
}

fn get_str(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    match get(obj, keys)? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Render a list entry; objects like `{"amount": "2", "item": "onions"}`
/// are joined in a readable order.
fn item_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(obj) => {
            let parts: Vec<String> = ["amount", "quantity", "unit", "item", "name", "ingredient", "step", "text"]
                .iter()
                .filter_map(|k| get_str(obj, &[*k]))
                .collect();
            Some(parts.join(" ")).filter(|s| !s.is_empty())
        }
        _ => None,
    }
}

fn get_list(obj: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    match get(obj, keys) {
        Some(Value::Array(items)) => items.iter().filter_map(item_text).collect(),
        Some(Value::String(s)) => s
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(|l| l.to_string())
            .collect(),
        _ => Vec::new(),
    }
}

fn get_nutrition(obj: &Map<String, Value>) -> PartialNutrition {
    match get(obj, &["nutritionInfo", "nutrition_info", "nutrition"]) {
        Some(Value::Object(n)) => PartialNutrition {
            calories: get_str(n, &["calories"]),
            protein: get_str(n, &["protein"]),
            carbs: get_str(n, &["carbs", "carbohydrates"]),
            fat: get_str(n, &["fat"]),
        },
        _ => PartialNutrition::default(),
    }
}

/// Build a draft from parsed JSON. `None` when there is no usable name.
pub fn draft_from_value(value: &Value) -> Option<MealDraft> {
    let obj = find_meal_object(value)?;
    let name = get_str(obj, &["name", "title", "mealName", "meal_name"])?;

    Some(MealDraft {
        name,
        description: get_str(obj, &["description", "summary"]),
        prep_time: get_str(obj, &["prepTime", "prep_time", "cookTime", "totalTime"]),
        ingredients: get_list(obj, &["ingredients"]),
        instructions: get_list(obj, &["instructions", "steps", "directions"]),
        nutrition: get_nutrition(obj),
        difficulty: get_str(obj, &["difficulty"]).and_then(|d| Difficulty::parse_loose(&d)),
        cuisine: get_str(obj, &["cuisine"]),
        tags: get_list(obj, &["tags"]),
        serving_size: get_str(obj, &["servingSize", "serving_size", "servings"]),
        estimated_cost: get_str(obj, &["estimatedCost", "estimated_cost", "cost"])
            .and_then(|c| Cost::parse_loose(&c)),
    })
}
