//! Structural classification of raw generative replies.

use std::sync::LazyLock;

use regex::Regex;

/// A string value written as `"" "Value" ""` (or `"""Value"""`). Specific
/// to one generative model; structural repair makes it worse.
static DOUBLED_QUOTE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#":\s*""\s*"[^"\s,}\]]"#).expect("Invalid doubled-quote regex")
});

static NAME_FIELD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)["']?\bname["']?\s*:"#).expect("Invalid name field regex"));

static DESCRIPTION_FIELD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)["']?\bdescription["']?\s*:"#).expect("Invalid description field regex")
});

/// Structural properties of one raw reply. Computed fresh per input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentAnalysis {
    /// The JSON candidate parses as an object or array as-is.
    pub is_valid_json: bool,
    /// The doubled-quote defect appears somewhere in the reply.
    pub has_known_quote_defect: bool,
    /// JSON-like with minor syntax defects and no doubled-quote defect.
    pub is_repairable: bool,
    pub has_name_field: bool,
    pub has_description_field: bool,
}

/// The part of a reply that should hold the JSON object: from the first
/// `{` to the last `}`, or the enclosing `[...]` when the reply is an array
/// of objects. Code fences and prose around it are dropped. A reply
/// truncated before its closer yields everything from the opener on.
pub fn json_candidate(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(brace) = trimmed.find('{') else {
        return trimmed;
    };

    let array_start = trimmed[..brace]
        .rfind('[')
        .filter(|&i| trimmed[i + 1..brace].trim().is_empty());
    let (start, close) = match array_start {
        Some(i) => (i, ']'),
        None => (brace, '}'),
    };

    match trimmed.rfind(close) {
        Some(end) if end > start => &trimmed[start..=end],
        _ => &trimmed[start..],
    }
}

/// Inspect a raw reply.
pub fn classify(raw: &str) -> ContentAnalysis {
    let candidate = json_candidate(raw);

    let is_valid_json = serde_json::from_str::<serde_json::Value>(candidate)
        .map(|v| v.is_object() || v.is_array())
        .unwrap_or(false);
    let has_known_quote_defect = DOUBLED_QUOTE_REGEX.is_match(raw);
    let has_name_field = NAME_FIELD_REGEX.is_match(raw);
    let has_description_field = DESCRIPTION_FIELD_REGEX.is_match(raw);

    let looks_like_json = (candidate.starts_with('{') || candidate.starts_with('[')) && candidate.contains(':');
    let is_repairable = !is_valid_json && !has_known_quote_defect && looks_like_json;

    ContentAnalysis {
        is_valid_json,
        has_known_quote_defect,
        is_repairable,
        has_name_field,
        has_description_field,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_json() {
        let analysis = classify(r#"{"name": "Jollof Rice", "description": "Smoky"}"#);
        assert!(analysis.is_valid_json);
        assert!(!analysis.has_known_quote_defect);
        assert!(!analysis.is_repairable);
        assert!(analysis.has_name_field);
        assert!(analysis.has_description_field);
    }

    #[test]
    fn test_doubled_quote_defect() {
        let analysis = classify(r#"{"name": "" "Egusi Soup" "", "description": "Tasty"}"#);
        assert!(!analysis.is_valid_json);
        assert!(analysis.has_known_quote_defect);
        assert!(!analysis.is_repairable);
    }

    #[test]
    fn test_tripled_quote_variant() {
        let analysis = classify(r#"{"name": """Egusi Soup"""}"#);
        assert!(analysis.has_known_quote_defect);
    }

    #[test]
    fn test_empty_string_value_is_not_the_defect() {
        let analysis = classify(r#"{"name": "Moi Moi", "cuisine": "", "tags": []}"#);
        assert!(analysis.is_valid_json);
        assert!(!analysis.has_known_quote_defect);
    }

    #[test]
    fn test_trailing_comma_is_repairable() {
        let analysis = classify(r#"{"name": "Suya", "tags": ["Spicy",],}"#);
        assert!(!analysis.is_valid_json);
        assert!(analysis.is_repairable);
    }

    #[test]
    fn test_plain_prose_is_not_repairable() {
        let analysis = classify("I recommend a bowl of Pepper Soup tonight.");
        assert!(!analysis.is_valid_json);
        assert!(!analysis.is_repairable);
        assert!(!analysis.has_name_field);
    }

    #[test]
    fn test_candidate_strips_fences_and_prose() {
        let raw = "Sure!\n```json\n{\"name\": \"Fufu\"}\n```\nEnjoy.";
        assert_eq!(json_candidate(raw), "{\"name\": \"Fufu\"}");
    }

    #[test]
    fn test_candidate_of_truncated_reply() {
        let raw = "{\"name\": \"Fufu\", \"description\": \"Pounded";
        assert_eq!(json_candidate(raw), raw);
    }

    #[test]
    fn test_candidate_of_array_reply() {
        let raw = "Options:\n[ {\"name\": \"Waakye\"}, {\"name\": \"Banku\"} ]\nThanks";
        assert_eq!(
            json_candidate(raw),
            "[ {\"name\": \"Waakye\"}, {\"name\": \"Banku\"} ]"
        );
        assert!(classify(raw).is_valid_json);

        let bracket_in_prose = "Meal [1]: {\"name\": \"Fufu\"}";
        assert_eq!(json_candidate(bracket_in_prose), "{\"name\": \"Fufu\"}");
    }
}
