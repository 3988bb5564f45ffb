//! Regex-based field recovery for replies that will not parse.
//!
//! Each field has an ordered list of alternatives; the first one that
//! yields a non-empty cleaned value wins.

use std::sync::LazyLock;

use regex::Regex;

use crate::estimate::{DEFAULT_CUISINE, DEFAULT_DESCRIPTION};
use crate::types::{Cost, Difficulty, MealDraft, PartialNutrition};

/// Prep time used when a pattern-recovered reply has none.
pub const DEFAULT_PREP_TIME: &str = "30 minutes";

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// A quoted string inside an array body. Group 2 marks an object key.
static ARRAY_ITEM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""((?:[^"\\]|\\.)*)"\s*(:)?"#).expect("Invalid array item regex")
});

/// First capitalized multi-word phrase, allowing a few lowercase joiners.
static TITLE_PHRASE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b[A-Z][\p{L}'’-]*(?:[ \t]+(?:[A-Z][\p{L}'’-]*|and|with|of|in|on|de|du|au|la|con|e))*[ \t]+[A-Z][\p{L}'’-]*",
    )
    .expect("Invalid title phrase regex")
});

/// Leading words that belong to the surrounding prose, not the dish name.
const PROSE_OPENERS: &[&str] = &[
    "Here", "Sure", "Certainly", "Note", "Json", "JSON", "Recipe", "Ingredients", "Instructions",
    "Description", "The", "This", "I", "Enjoy", "Meal", "Name", "Try", "Please", "Consider",
    "Maybe", "Sorry", "Why", "How", "Make", "Cook",
];

fn string_field_patterns(keys: &str) -> Vec<Regex> {
    [
        // Doubled-quote defect: "key": "" "Value" ""
        format!(r#"(?i)"(?:{keys})"\s*:\s*""\s*"([^"]*)""#),
        // Quoted key and value
        format!(r#"(?i)"(?:{keys})"\s*:\s*"((?:[^"\\]|\\.)*)""#),
        // Bare key: value
        format!(r#"(?im)(?:^|[{{,\s])['"]?(?:{keys})['"]?\s*[:=]\s*['"]?([^,'"\n{{}}]+)"#),
        // Truncated: value runs to the end of the reply
        format!(r#"(?is)"(?:{keys})"\s*:\s*"+\s*([^"]+)$"#),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid field pattern"))
    .collect()
}

fn array_field_patterns(keys: &str) -> Vec<Regex> {
    [
        // Bracketed body, possibly truncated before the closing bracket
        format!(r#"(?is)["']?(?:{keys})["']?\s*:\s*\[(.*?)(?:\]|$)"#),
        // Bare comma-separated list on one line
        format!(r#"(?im)(?:^|[{{,\s])(?:{keys})\s*:\s*([^\[\n"][^\n]*)"#),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid array pattern"))
    .collect()
}

static NAME_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| string_field_patterns("name|title|meal_?name|dish_?name"));
static DESCRIPTION_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| string_field_patterns("description|summary"));
static PREP_TIME_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| string_field_patterns("prep_?time|cook_?time|total_?time"));
static CUISINE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| string_field_patterns("cuisine"));
static DIFFICULTY_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| string_field_patterns("difficulty"));
static SERVING_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| string_field_patterns("serving_?size|servings|serves"));
static COST_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| string_field_patterns("estimated_?cost|cost"));

static CALORIES_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| string_field_patterns("calories"));
static PROTEIN_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| string_field_patterns("protein"));
static CARBS_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| string_field_patterns("carbs|carbohydrates"));
static FAT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| string_field_patterns("fat"));

static INGREDIENTS_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| array_field_patterns("ingredients"));
static INSTRUCTIONS_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| array_field_patterns("instructions|steps|directions"));
static TAGS_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| array_field_patterns("tags"));

/// Clean an extracted value: unescape, strip doubled-quote artifacts from
/// the edges, trim, and collapse internal whitespace.
pub fn clean_value(raw: &str) -> String {
    let unescaped = raw
        .replace("\\\"", "\"")
        .replace("\\n", " ")
        .replace("\\t", " ")
        .replace("\\/", "/");
    let stripped = unescaped
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c.is_whitespace())
        .trim_end_matches(',');
    WHITESPACE_REGEX.replace_all(stripped.trim(), " ").into_owned()
}

/// First alternative with a non-empty cleaned capture.
fn first_match(text: &str, patterns: &[Regex]) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|cap| cap.get(1))
            .map(|m| clean_value(m.as_str()))
            .filter(|v| !v.is_empty())
    })
}

fn first_list(text: &str, patterns: &[Regex]) -> Vec<String> {
    for (i, re) in patterns.iter().enumerate() {
        let Some(body) = re.captures(text).and_then(|cap| cap.get(1)) else {
            continue;
        };
        let items: Vec<String> = if i == 0 {
            ARRAY_ITEM_REGEX
                .captures_iter(body.as_str())
                .filter(|cap| cap.get(2).is_none())
                .map(|cap| clean_value(&cap[1]))
                .filter(|v| !v.is_empty())
                .collect()
        } else {
            body.as_str()
                .split([',', ';'])
                .map(clean_value)
                .filter(|v| !v.is_empty())
                .collect()
        };
        if !items.is_empty() {
            return items;
        }
    }
    Vec::new()
}

/// Recover a draft field by field. Returns `None` without a usable name.
///
/// Missing description, prep time and cuisine get fixed defaults.
pub fn extract_fields(raw: &str) -> Option<MealDraft> {
    let name = first_match(raw, &NAME_PATTERNS)?;

    Some(MealDraft {
        name,
        description: Some(
            first_match(raw, &DESCRIPTION_PATTERNS)
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        ),
        prep_time: Some(
            first_match(raw, &PREP_TIME_PATTERNS).unwrap_or_else(|| DEFAULT_PREP_TIME.to_string()),
        ),
        ingredients: first_list(raw, &INGREDIENTS_PATTERNS),
        instructions: first_list(raw, &INSTRUCTIONS_PATTERNS),
        nutrition: PartialNutrition {
            calories: first_match(raw, &CALORIES_PATTERNS),
            protein: first_match(raw, &PROTEIN_PATTERNS),
            carbs: first_match(raw, &CARBS_PATTERNS),
            fat: first_match(raw, &FAT_PATTERNS),
        },
        difficulty: first_match(raw, &DIFFICULTY_PATTERNS).and_then(|d| Difficulty::parse_loose(&d)),
        cuisine: Some(first_match(raw, &CUISINE_PATTERNS).unwrap_or_else(|| DEFAULT_CUISINE.to_string())),
        tags: first_list(raw, &TAGS_PATTERNS),
        serving_size: first_match(raw, &SERVING_PATTERNS),
        estimated_cost: first_match(raw, &COST_PATTERNS).and_then(|c| Cost::parse_loose(&c)),
    })
}

/// First capitalized multi-word phrase that does not read as prose.
pub fn find_title_phrase(raw: &str) -> Option<String> {
    TITLE_PHRASE_REGEX
        .find_iter(raw)
        .find_map(|m| {
            let words: Vec<&str> = m
                .as_str()
                .split_whitespace()
                .skip_while(|w| PROSE_OPENERS.contains(w))
                .collect();
            (words.len() >= 2).then(|| clean_value(&words.join(" ")))
        })
}

/// Last-resort record: a name scraped from the text plus generic defaults.
pub fn reconstruct(raw: &str) -> Option<MealDraft> {
    let name = find_title_phrase(raw)?;

    Some(MealDraft {
        description: Some(format!("{} - a meal idea recovered from an incomplete reply.", name)),
        prep_time: Some(DEFAULT_PREP_TIME.to_string()),
        ingredients: vec!["Main ingredients as used in the traditional recipe".to_string()],
        instructions: vec!["Prepare following the traditional method for this dish".to_string()],
        difficulty: Some(Difficulty::Medium),
        cuisine: Some(DEFAULT_CUISINE.to_string()),
        serving_size: Some("2-4 servings".to_string()),
        estimated_cost: Some(Cost::Moderate),
        name,
        ..Default::default()
    })
}
