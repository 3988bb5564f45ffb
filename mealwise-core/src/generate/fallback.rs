//! Static fallback catalog used when neither the store nor the generative
//! service can fill a request.

use std::collections::HashSet;

use crate::estimate;
use crate::types::{dedup_key, Cost, Difficulty, MealDraft, MealSuggestion, Source, SuggestionCriteria};

/// A curated meal that is always available.
#[derive(Debug, Clone, Copy)]
pub struct FallbackMeal {
    pub name: &'static str,
    pub meal_type: &'static str,
    pub description: &'static str,
    pub prep_time: &'static str,
    pub cuisine: &'static str,
    pub ingredients: &'static [&'static str],
    pub instructions: &'static [&'static str],
    pub difficulty: Difficulty,
    pub cost: Cost,
    /// Dietary preferences this meal satisfies.
    pub diets: &'static [&'static str],
}

impl FallbackMeal {
    pub fn suits_diet(&self, preference: &str) -> bool {
        is_unrestricted(preference) || self.diets.iter().any(|d| d.eq_ignore_ascii_case(preference.trim()))
    }

    pub fn to_suggestion(&self, criteria: &SuggestionCriteria) -> MealSuggestion {
        let draft = MealDraft {
            name: self.name.to_string(),
            description: Some(self.description.to_string()),
            prep_time: Some(self.prep_time.to_string()),
            ingredients: self.ingredients.iter().map(|s| s.to_string()).collect(),
            instructions: self.instructions.iter().map(|s| s.to_string()).collect(),
            difficulty: Some(self.difficulty),
            cuisine: Some(self.cuisine.to_string()),
            estimated_cost: Some(self.cost),
            ..Default::default()
        };
        estimate::complete(draft, Source::Fallback, criteria)
    }
}

fn is_unrestricted(preference: &str) -> bool {
    matches!(
        preference.trim().to_lowercase().as_str(),
        "" | "none" | "any" | "no preference" | "no-preference"
    )
}

const VEGETARIAN: &[&str] = &["vegetarian"];
const VEGAN: &[&str] = &["vegetarian", "vegan", "dairy-free"];
const VEGAN_GF: &[&str] = &["vegetarian", "vegan", "dairy-free", "gluten-free"];
const GLUTEN_FREE: &[&str] = &["gluten-free", "dairy-free"];
const PESCATARIAN_GF: &[&str] = &["pescatarian", "gluten-free", "dairy-free"];

pub static CATALOG: &[FallbackMeal] = &[
    FallbackMeal {
        name: "Akara",
        meal_type: "breakfast",
        description: "Crisp black-eyed pea fritters, a classic street breakfast.",
        prep_time: "40 minutes",
        cuisine: "Nigerian",
        ingredients: &["2 cups black-eyed peas", "1 onion", "1 scotch bonnet pepper", "Salt", "Vegetable oil for frying"],
        instructions: &["Soak and peel the beans.", "Blend with onion and pepper.", "Whisk with salt until fluffy.", "Fry spoonfuls until golden."],
        difficulty: Difficulty::Medium,
        cost: Cost::Low,
        diets: VEGAN_GF,
    },
    FallbackMeal {
        name: "Yam and Egg Sauce",
        meal_type: "breakfast",
        description: "Boiled yam with a tomato and pepper scrambled egg sauce.",
        prep_time: "30 minutes",
        cuisine: "Nigerian",
        ingredients: &["Half a tuber of yam", "4 eggs", "2 tomatoes", "1 onion", "Vegetable oil"],
        instructions: &["Peel, slice and boil the yam.", "Fry onion and tomatoes.", "Stir in beaten eggs.", "Serve with the yam."],
        difficulty: Difficulty::Easy,
        cost: Cost::Low,
        diets: &["vegetarian", "gluten-free"],
    },
    FallbackMeal {
        name: "Oatmeal with Banana and Groundnuts",
        meal_type: "breakfast",
        description: "Creamy oats topped with sliced banana and roasted groundnuts.",
        prep_time: "10 minutes",
        cuisine: "International",
        ingredients: &["1 cup rolled oats", "2 cups water or milk", "1 banana", "Roasted groundnuts", "Honey"],
        instructions: &["Simmer oats in water or milk.", "Top with banana and groundnuts.", "Drizzle with honey."],
        difficulty: Difficulty::Easy,
        cost: Cost::Low,
        diets: VEGETARIAN,
    },
    FallbackMeal {
        name: "Plantain Frittata",
        meal_type: "breakfast",
        description: "Fried ripe plantain folded into a peppery baked omelette.",
        prep_time: "25 minutes",
        cuisine: "West African",
        ingredients: &["2 ripe plantains", "5 eggs", "1 red bell pepper", "Spring onions", "Salt"],
        instructions: &["Fry the plantain slices.", "Beat eggs with peppers and onions.", "Pour over plantain and bake until set."],
        difficulty: Difficulty::Easy,
        cost: Cost::Low,
        diets: &["vegetarian", "gluten-free"],
    },
    FallbackMeal {
        name: "Moi Moi",
        meal_type: "lunch",
        description: "Steamed bean pudding with peppers and onions.",
        prep_time: "1 hour",
        cuisine: "Nigerian",
        ingredients: &["2 cups peeled beans", "2 red bell peppers", "1 onion", "Vegetable oil", "Stock cube"],
        instructions: &["Blend beans with peppers and onion.", "Season and stir in oil.", "Portion into containers.", "Steam for 45 minutes."],
        difficulty: Difficulty::Medium,
        cost: Cost::Low,
        diets: VEGAN_GF,
    },
    FallbackMeal {
        name: "Egusi Soup",
        meal_type: "lunch",
        description: "Melon seed soup with leafy greens, served with a swallow.",
        prep_time: "50 minutes",
        cuisine: "Nigerian",
        ingredients: &["1 cup ground egusi", "Spinach", "Palm oil", "Assorted meat", "Crayfish", "Stock cubes"],
        instructions: &["Cook the meat with seasoning.", "Fry egusi in palm oil.", "Add stock and meat and simmer.", "Stir in spinach."],
        difficulty: Difficulty::Medium,
        cost: Cost::Moderate,
        diets: GLUTEN_FREE,
    },
    FallbackMeal {
        name: "Vegetable Fried Rice",
        meal_type: "lunch",
        description: "Fried rice with mixed vegetables and curry.",
        prep_time: "35 minutes",
        cuisine: "Nigerian",
        ingredients: &["3 cups parboiled rice", "Carrots", "Green beans", "Sweet corn", "Curry powder", "Vegetable oil"],
        instructions: &["Fry the vegetables briefly.", "Add rice and curry.", "Stir fry until heated through."],
        difficulty: Difficulty::Easy,
        cost: Cost::Low,
        diets: VEGAN_GF,
    },
    FallbackMeal {
        name: "Grilled Tilapia with Plantain",
        meal_type: "lunch",
        description: "Pepper-rubbed grilled tilapia with fried plantain.",
        prep_time: "40 minutes",
        cuisine: "Ghanaian",
        ingredients: &["2 whole tilapia", "Ginger", "Garlic", "Scotch bonnet pepper", "2 ripe plantains"],
        instructions: &["Blend ginger, garlic and pepper into a rub.", "Score and season the fish.", "Grill until charred.", "Fry the plantain and serve."],
        difficulty: Difficulty::Medium,
        cost: Cost::Moderate,
        diets: PESCATARIAN_GF,
    },
    FallbackMeal {
        name: "Jollof Rice",
        meal_type: "dinner",
        description: "Smoky tomato and pepper rice, a West African favourite.",
        prep_time: "1 hour",
        cuisine: "West African",
        ingredients: &["3 cups long grain rice", "Tomato paste", "Red bell peppers", "Onions", "Vegetable stock", "Bay leaves", "Thyme"],
        instructions: &["Blend peppers and onions.", "Fry tomato paste in oil.", "Add the blend and simmer.", "Stir in rice and stock.", "Cover and steam until tender."],
        difficulty: Difficulty::Medium,
        cost: Cost::Low,
        diets: VEGAN_GF,
    },
    FallbackMeal {
        name: "Pepper Soup",
        meal_type: "dinner",
        description: "Light, fiery broth with goat meat and aromatic spices.",
        prep_time: "1 hour 15 minutes",
        cuisine: "Nigerian",
        ingredients: &["1kg goat meat", "Pepper soup spice", "Scotch bonnet pepper", "Scent leaves", "Onion"],
        instructions: &["Season and boil the meat.", "Add spice and pepper.", "Simmer until tender.", "Finish with scent leaves."],
        difficulty: Difficulty::Easy,
        cost: Cost::Moderate,
        diets: GLUTEN_FREE,
    },
    FallbackMeal {
        name: "Efo Riro with Semolina",
        meal_type: "dinner",
        description: "Rich spinach stew with peppers and locust beans.",
        prep_time: "45 minutes",
        cuisine: "Yoruba",
        ingredients: &["Spinach", "Red bell peppers", "Locust beans", "Palm oil", "Smoked fish", "Semolina"],
        instructions: &["Blend and reduce the peppers.", "Fry locust beans in palm oil.", "Add peppers and fish.", "Stir in spinach and serve with semolina."],
        difficulty: Difficulty::Medium,
        cost: Cost::Moderate,
        diets: &["pescatarian"],
    },
    FallbackMeal {
        name: "Bean and Plantain Porridge",
        meal_type: "dinner",
        description: "Soft honey beans simmered with ripe plantain in palm oil.",
        prep_time: "1 hour 10 minutes",
        cuisine: "Nigerian",
        ingredients: &["2 cups honey beans", "2 ripe plantains", "Palm oil", "Onion", "Dried pepper"],
        instructions: &["Boil the beans until soft.", "Add plantain and seasoning.", "Stir in palm oil and simmer."],
        difficulty: Difficulty::Easy,
        cost: Cost::Low,
        diets: VEGAN_GF,
    },
    FallbackMeal {
        name: "Puff Puff",
        meal_type: "snack",
        description: "Soft, sweet fried dough balls.",
        prep_time: "1 hour 30 minutes",
        cuisine: "West African",
        ingredients: &["3 cups flour", "Sugar", "Yeast", "Warm water", "Nutmeg", "Oil for frying"],
        instructions: &["Mix dry ingredients.", "Add water and rest until doubled.", "Fry small scoops until golden."],
        difficulty: Difficulty::Easy,
        cost: Cost::Low,
        diets: VEGAN,
    },
    FallbackMeal {
        name: "Kelewele",
        meal_type: "snack",
        description: "Spiced fried plantain cubes with ginger and pepper.",
        prep_time: "20 minutes",
        cuisine: "Ghanaian",
        ingredients: &["3 ripe plantains", "Ginger", "Cayenne pepper", "Salt", "Oil for frying"],
        instructions: &["Cube the plantain.", "Toss with ginger and spices.", "Fry until caramelised."],
        difficulty: Difficulty::Easy,
        cost: Cost::Low,
        diets: VEGAN_GF,
    },
    FallbackMeal {
        name: "Suya Skewers",
        meal_type: "snack",
        description: "Thin beef skewers coated in spicy groundnut yaji.",
        prep_time: "35 minutes",
        cuisine: "Hausa",
        ingredients: &["500g beef sirloin", "Yaji spice", "Onion", "Tomato", "Vegetable oil"],
        instructions: &["Slice beef thinly and thread onto skewers.", "Coat with oil and yaji.", "Grill until charred."],
        difficulty: Difficulty::Easy,
        cost: Cost::Moderate,
        diets: GLUTEN_FREE,
    },
];

/// Catalog entries for the meal type that suit the dietary preference, in
/// catalog order. Unknown meal types draw from the whole catalog.
pub fn catalog_for(criteria: &SuggestionCriteria) -> Vec<&'static FallbackMeal> {
    let meal_type = criteria.meal_type.trim();
    let known = CATALOG.iter().any(|m| m.meal_type.eq_ignore_ascii_case(meal_type));

    CATALOG
        .iter()
        .filter(|m| !known || m.meal_type.eq_ignore_ascii_case(meal_type))
        .filter(|m| m.suits_diet(&criteria.dietary_preference))
        .collect()
}

/// Append catalog meals to `meals` until it holds `count` entries or the
/// catalog runs out. `seen` holds the dedup keys already taken and is
/// updated with every meal added. Returns how many were added.
pub fn pad(
    criteria: &SuggestionCriteria,
    seen: &mut HashSet<String>,
    meals: &mut Vec<MealSuggestion>,
    count: usize,
) -> usize {
    let before = meals.len();
    for meal in catalog_for(criteria) {
        if meals.len() >= count {
            break;
        }
        if seen.insert(dedup_key(meal.name)) {
            meals.push(meal.to_suggestion(criteria));
        }
    }
    meals.len().saturating_sub(before)
}

/// The single suggestion served when the store is unreachable.
///
/// Prefers an entry matching both meal type and diet, then meal type
/// alone, then the first catalog entry.
pub fn fallback_for(criteria: &SuggestionCriteria) -> MealSuggestion {
    let meal_type = criteria.meal_type.trim();
    let meal = catalog_for(criteria)
        .into_iter()
        .next()
        .or_else(|| CATALOG.iter().find(|m| m.meal_type.eq_ignore_ascii_case(meal_type)))
        .unwrap_or(&CATALOG[0]);
    meal.to_suggestion(criteria)
}
