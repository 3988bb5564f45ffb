//! Prompts for meal generation.

use crate::types::SuggestionCriteria;

/// Prompt name used in log fields.
pub const MEAL_PROMPT_NAME: &str = "meal_suggestion";

/// Rotated per attempt so repeated calls drift toward different dishes.
pub const VARIETY_HINTS: &[&str] = &[
    "Favour a traditional, home-style dish.",
    "Favour something light and quick to prepare.",
    "Favour a hearty, filling dish.",
    "Favour a regional speciality that is less commonly cooked.",
    "Favour a dish built around vegetables or legumes.",
    "Favour a modern twist on a classic.",
];

/// System instruction describing the reply shape.
pub const SYSTEM_PROMPT: &str = r#"You are a meal planning assistant. Suggest exactly one meal.

Respond with a single JSON object and nothing else, no prose and no code fences:
{
  "name": "Dish name",
  "description": "One or two sentences",
  "prepTime": "45 minutes",
  "ingredients": ["quantity and ingredient", "..."],
  "instructions": ["step", "..."],
  "nutritionInfo": {"calories": "400-500", "protein": "20g", "carbs": "50g", "fat": "15g"},
  "difficulty": "Easy | Medium | Hard",
  "cuisine": "Cuisine name",
  "tags": ["tag", "..."],
  "servingSize": "4 servings",
  "estimatedCost": "Low | Moderate | High"
}

Never wrap string values in extra quotes."#;

/// Render the user prompt for one generation attempt.
///
/// `attempt` selects the variety hint; `exclude` lists names already
/// accepted in this invocation.
pub fn render_user_prompt(criteria: &SuggestionCriteria, attempt: usize, exclude: &[String]) -> String {
    let mut prompt = format!(
        "Suggest one {meal_type} meal.\nDietary preference: {diet}",
        meal_type = criteria.meal_type.trim(),
        diet = display_or(&criteria.dietary_preference, "none"),
    );

    let cuisine = criteria.cuisine.trim();
    if !cuisine.is_empty() {
        prompt.push_str(&format!("\nCuisine: {}", cuisine));
    }

    let ingredients = criteria.ingredient_tokens();
    if !ingredients.is_empty() {
        prompt.push_str(&format!(
            "\nUse some of these ingredients: {}",
            ingredients.join(", ")
        ));
    }

    prompt.push('\n');
    prompt.push_str(VARIETY_HINTS[attempt % VARIETY_HINTS.len()]);

    if !exclude.is_empty() {
        prompt.push_str(&format!(
            "\nDo not suggest any of these: {}",
            exclude.join(", ")
        ));
    }

    prompt
}

fn display_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prompt() {
        let criteria = SuggestionCriteria::new("dinner", "vegetarian")
            .with_cuisine("Nigerian")
            .with_ingredients("beans, plantain");
        let prompt = render_user_prompt(&criteria, 0, &["Moi Moi".to_string()]);

        assert!(prompt.contains("Suggest one dinner meal"));
        assert!(prompt.contains("Dietary preference: vegetarian"));
        assert!(prompt.contains("Cuisine: Nigerian"));
        assert!(prompt.contains("beans, plantain"));
        assert!(prompt.contains(VARIETY_HINTS[0]));
        assert!(prompt.contains("Do not suggest any of these: Moi Moi"));
    }

    #[test]
    fn test_hint_rotates() {
        let criteria = SuggestionCriteria::new("lunch", "");
        let first = render_user_prompt(&criteria, 1, &[]);
        let wrapped = render_user_prompt(&criteria, 1 + VARIETY_HINTS.len(), &[]);

        assert!(first.contains(VARIETY_HINTS[1]));
        assert_eq!(first, wrapped);
        assert!(first.contains("Dietary preference: none"));
        assert!(!first.contains("Cuisine:"));
        assert!(!first.contains("Do not suggest"));
    }

    #[test]
    fn test_system_prompt_shape() {
        assert!(SYSTEM_PROMPT.contains("\"name\""));
        assert!(SYSTEM_PROMPT.contains("single JSON object"));
    }
}
