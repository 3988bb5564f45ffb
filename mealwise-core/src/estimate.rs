//! Field estimation for incomplete meal records.
//!
//! Generative replies and curated store rows both tend to omit the
//! secondary fields (difficulty, cost, serving size, nutrition, tags). These
//! are derived from ingredient/instruction counts and keyword matching so
//! every suggestion leaves the core fully populated.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{
    Cost, Difficulty, MealDraft, MealSuggestion, NutritionInfo, PartialNutrition, Source,
    SuggestionCriteria,
};

/// Upper bound on tags per suggestion.
pub const MAX_TAGS: usize = 5;

pub const DEFAULT_DESCRIPTION: &str = "A satisfying home-cooked meal.";
pub const DEFAULT_CUISINE: &str = "International";

/// Keywords that mark an ingredient as a substantial protein source.
const PROTEIN_KEYWORDS: &[&str] = &[
    "chicken", "beef", "goat", "lamb", "pork", "turkey", "fish", "salmon", "tuna", "mackerel",
    "shrimp", "prawn", "crayfish", "egg", "tofu", "beans", "lentil", "chickpea", "black-eyed",
    "peanut", "egusi", "meat", "suya", "yogurt", "cheese",
];

/// Keywords that mark an ingredient as carbohydrate-heavy.
const CARB_KEYWORDS: &[&str] = &[
    "rice", "pasta", "noodle", "spaghetti", "bread", "flour", "potato", "yam", "plantain",
    "cassava", "garri", "semolina", "oat", "corn", "couscous", "tortilla", "fufu", "pap", "sugar",
];

/// Keywords that make a meal unsuitable for a vegetarian tag.
const MEAT_KEYWORDS: &[&str] = &[
    "chicken", "beef", "goat", "lamb", "pork", "turkey", "fish", "salmon", "tuna", "mackerel",
    "shrimp", "prawn", "crayfish", "meat", "suya", "bacon", "sausage", "stockfish",
];

/// Leading number of minutes in a free-text duration ("25 minutes", "1 hour").
static DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(min|hour|hr)").expect("Invalid duration regex")
});

/// Complexity bracket derived from recipe size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Complexity {
    Simple,
    Standard,
    Involved,
}

impl Complexity {
    /// ≤5 ingredients and ≤5 steps is simple; >10 of both is involved.
    pub fn from_counts(ingredients: usize, instructions: usize) -> Self {
        if ingredients <= 5 && instructions <= 5 {
            Complexity::Simple
        } else if ingredients > 10 && instructions > 10 {
            Complexity::Involved
        } else {
            Complexity::Standard
        }
    }

    pub fn difficulty(self) -> Difficulty {
        match self {
            Complexity::Simple => Difficulty::Easy,
            Complexity::Standard => Difficulty::Medium,
            Complexity::Involved => Difficulty::Hard,
        }
    }

    pub fn cost(self) -> Cost {
        match self {
            Complexity::Simple => Cost::Low,
            Complexity::Standard => Cost::Moderate,
            Complexity::Involved => Cost::High,
        }
    }

    pub fn serving_size(self) -> &'static str {
        match self {
            Complexity::Simple => "1-2 servings",
            Complexity::Standard => "3-4 servings",
            Complexity::Involved => "6-8 servings",
        }
    }

    pub fn prep_time(self) -> &'static str {
        match self {
            Complexity::Simple => "20 minutes",
            Complexity::Standard => "45 minutes",
            Complexity::Involved => "1 hour 30 minutes",
        }
    }
}

fn mentions_any(ingredients: &[String], keywords: &[&str]) -> bool {
    ingredients.iter().any(|item| {
        let lower = item.to_lowercase();
        keywords.iter().any(|k| lower.contains(k))
    })
}

/// Estimate per-serving nutrition from the ingredient list.
///
/// Starts from a fixed baseline and shifts the ranges upward when protein-
/// or carbohydrate-bearing ingredients are present.
pub fn estimate_nutrition(ingredients: &[String]) -> NutritionInfo {
    let has_protein = mentions_any(ingredients, PROTEIN_KEYWORDS);
    let has_carbs = mentions_any(ingredients, CARB_KEYWORDS);

    let (mut cal_lo, mut cal_hi) = (300, 400);
    let mut protein = "10-15g";
    let mut carbs = "30-40g";

    if has_protein {
        cal_lo += 100;
        cal_hi += 100;
        protein = "25-35g";
    }
    if has_carbs {
        cal_lo += 80;
        cal_hi += 120;
        carbs = "50-65g";
    }

    NutritionInfo {
        calories: format!("{}-{}", cal_lo, cal_hi),
        protein: protein.to_string(),
        carbs: carbs.to_string(),
        fat: "10-15g".to_string(),
    }
}

fn fill_nutrition(partial: PartialNutrition, ingredients: &[String]) -> NutritionInfo {
    let estimate = estimate_nutrition(ingredients);
    NutritionInfo {
        calories: partial.calories.unwrap_or(estimate.calories),
        protein: partial.protein.unwrap_or(estimate.protein),
        carbs: partial.carbs.unwrap_or(estimate.carbs),
        fat: partial.fat.unwrap_or(estimate.fat),
    }
}

/// Minutes in a free-text duration, if one can be read.
pub fn duration_minutes(text: &str) -> Option<u32> {
    let mut total = 0u32;
    let mut found = false;
    for cap in DURATION_REGEX.captures_iter(text) {
        let amount: u32 = cap[1].parse().ok()?;
        let unit = cap[2].to_lowercase();
        let minutes = if unit.starts_with('h') {
            amount.checked_mul(60)?
        } else {
            amount
        };
        total = total.checked_add(minutes)?;
        found = true;
    }
    found.then_some(total)
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}

/// Derive tags: the record's own tags first, then meal type, cuisine,
/// dietary preference and a few keyword tags, capped at [`MAX_TAGS`].
pub fn derive_tags(
    existing: &[String],
    criteria: &SuggestionCriteria,
    cuisine: &str,
    ingredients: &[String],
    prep_time: &str,
    difficulty: Difficulty,
) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(MAX_TAGS);
    let push = |tag: String, tags: &mut Vec<String>| {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !tags.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
            tags.push(tag);
        }
    };

    for tag in existing {
        push(tag.clone(), &mut tags);
    }
    if !criteria.meal_type.trim().is_empty() {
        push(title_case(criteria.meal_type.trim()), &mut tags);
    }
    if cuisine != DEFAULT_CUISINE {
        push(cuisine.to_string(), &mut tags);
    }
    let diet = criteria.dietary_preference.trim();
    if !diet.is_empty() && !diet.eq_ignore_ascii_case("none") {
        push(title_case(diet), &mut tags);
    }
    if duration_minutes(prep_time).is_some_and(|m| m <= 30) {
        push("Quick".to_string(), &mut tags);
    }
    if difficulty == Difficulty::Easy {
        push("Easy".to_string(), &mut tags);
    }
    if !ingredients.is_empty() && !mentions_any(ingredients, MEAT_KEYWORDS) {
        push("Vegetarian".to_string(), &mut tags);
    }
    if mentions_any(ingredients, PROTEIN_KEYWORDS) {
        push("High Protein".to_string(), &mut tags);
    }

    tags.truncate(MAX_TAGS);
    tags
}

/// Turn a draft into a complete suggestion, estimating whatever is missing.
///
/// Fields present in the draft are kept as they are; only absent ones are
/// derived. The name is trimmed.
pub fn complete(draft: MealDraft, source: Source, criteria: &SuggestionCriteria) -> MealSuggestion {
    let complexity = Complexity::from_counts(draft.ingredients.len(), draft.instructions.len());

    let difficulty = draft.difficulty.unwrap_or_else(|| complexity.difficulty());
    let prep_time = draft
        .prep_time
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| complexity.prep_time().to_string());
    let cuisine = draft
        .cuisine
        .filter(|c| !c.trim().is_empty())
        .or_else(|| Some(criteria.cuisine.trim().to_string()).filter(|c| !c.is_empty()))
        .unwrap_or_else(|| DEFAULT_CUISINE.to_string());
    let tags = derive_tags(
        &draft.tags,
        criteria,
        &cuisine,
        &draft.ingredients,
        &prep_time,
        difficulty,
    );

    MealSuggestion {
        id: None,
        name: draft.name.trim().to_string(),
        description: draft
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        prep_time,
        nutrition_info: fill_nutrition(draft.nutrition, &draft.ingredients),
        ingredients: draft.ingredients,
        instructions: draft.instructions,
        difficulty,
        cuisine,
        tags,
        serving_size: draft
            .serving_size
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| complexity.serving_size().to_string()),
        estimated_cost: draft.estimated_cost.unwrap_or_else(|| complexity.cost()),
        is_ai_generated: source == Source::Ai,
        source,
    }
}
