//! Text extraction: reduce each input shape to one (uncleaned) string.

use serde_json::Value;
use tracing::warn;

use super::input::{is_truthy, stringify, FieldMap, RawInput};
use super::PreprocessError;

/// Fields holding the article body, in priority order.
pub const TEXT_FIELDS: &[&str] = &["text", "body", "content", "article", "story", "description"];

/// Fallback fields when no body field is populated.
pub const TITLE_FIELDS: &[&str] = &["title", "headline", "subject"];

/// A string value with more characters than this is treated as likely content.
pub const LONG_VALUE_MIN_CHARS: usize = 20;

type Strategy = fn(&FieldMap) -> Vec<String>;

/// Tried in order; the first strategy returning anything wins.
const STRATEGIES: &[Strategy] = &[text_fields, title_fields, long_values];

fn collect_named(fields: &FieldMap, names: &[&str]) -> Vec<String> {
    names
        .iter()
        .filter_map(|name| fields.get(*name))
        .filter(|value| is_truthy(value))
        .map(stringify)
        .collect()
}

fn text_fields(fields: &FieldMap) -> Vec<String> {
    collect_named(fields, TEXT_FIELDS)
}

fn title_fields(fields: &FieldMap) -> Vec<String> {
    collect_named(fields, TITLE_FIELDS)
}

fn long_values(fields: &FieldMap) -> Vec<String> {
    fields
        .values()
        .filter_map(Value::as_str)
        .filter(|s| s.chars().count() > LONG_VALUE_MIN_CHARS)
        .map(str::to_string)
        .collect()
}

/// Extract text from a field dictionary. Every populated field of the winning
/// pass is kept, space-joined. Returns an empty string when nothing matches.
pub fn extract_from_fields(fields: &FieldMap) -> String {
    STRATEGIES
        .iter()
        .map(|strategy| strategy(fields))
        .find(|parts| !parts.is_empty())
        .map(|parts| parts.join(" "))
        .unwrap_or_default()
}

/// Strings verbatim, mappings through field extraction, the rest stringified.
pub fn extract_from_sequence(items: &[Value]) -> String {
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            Value::Object(map) => extract_from_fields(map),
            other => stringify(other),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Plain text passes through; text that looks like JSON is parsed and
/// extracted. Unparseable JSON-looking text is kept as literal text.
pub fn extract_from_text(text: &str) -> String {
    let trimmed = text.trim_start();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return text.to_string();
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => extract_from_fields(&map),
        Ok(Value::Array(items)) if !items.is_empty() => {
            // Parsed article lists only keep strings and mappings.
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Object(map) => Some(extract_from_fields(map)),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(" ")
        }
        Ok(other) => stringify(&other),
        Err(e) => {
            warn!("Invalid JSON format, treating as plain text: {}", e);
            text.to_string()
        }
    }
}

/// Build a mapping from one tabular row.
pub fn row_to_fields(headers: &[String], values: &[Value]) -> Result<FieldMap, PreprocessError> {
    if headers.len() != values.len() {
        return Err(PreprocessError::InvalidInput(format!(
            "row has {} values but {} columns",
            values.len(),
            headers.len()
        )));
    }
    Ok(headers
        .iter()
        .cloned()
        .zip(values.iter().cloned())
        .collect())
}

/// Dispatch on the input shape.
pub fn extract_text(input: &RawInput) -> Result<String, PreprocessError> {
    let text = match input {
        RawInput::Text(s) => extract_from_text(s),
        RawInput::Bytes(bytes) => {
            let s = std::str::from_utf8(bytes).map_err(|e| {
                PreprocessError::InvalidInput(format!("input is not valid UTF-8: {}", e))
            })?;
            extract_from_text(s)
        }
        RawInput::Fields(fields) => extract_from_fields(fields),
        RawInput::Row { headers, values } => extract_from_fields(&row_to_fields(headers, values)?),
        RawInput::Sequence(items) => extract_from_sequence(items),
        RawInput::Other(value) => stringify(value),
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(v: Value) -> FieldMap {
        match v {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_text_field_beats_title() {
        let map = fields(json!({"title": "Ignored headline", "text": "Main body text"}));
        let out = extract_from_fields(&map);
        assert_eq!(out, "Main body text");
        assert!(!out.contains("Ignored headline"));
    }

    #[test]
    fn test_all_text_fields_concatenated_in_priority_order() {
        let map = fields(json!({"content": "C", "body": "B", "description": "D", "title": "T"}));
        assert_eq!(extract_from_fields(&map), "B C D");
    }

    #[test]
    fn test_title_fields_collected() {
        let map = fields(json!({"headline": "H", "title": "T", "author": "A"}));
        assert_eq!(extract_from_fields(&map), "T H");
    }

    #[test]
    fn test_empty_text_fields_fall_through() {
        let map = fields(json!({"text": "", "body": null, "subject": "Subject line"}));
        assert_eq!(extract_from_fields(&map), "Subject line");
    }

    #[test]
    fn test_long_values_in_mapping_order() {
        let map = fields(json!({
            "zeta": "This is a sufficiently long string value",
            "short": "x",
            "alpha": "Another value that is long enough",
            "count": 123456789012345678_u64
        }));
        assert_eq!(
            extract_from_fields(&map),
            "This is a sufficiently long string value Another value that is long enough"
        );
    }

    #[test]
    fn test_long_value_threshold_counts_chars() {
        // 20 chars exactly is not enough; 21 is.
        let map = fields(json!({"a": "ééééééééééééééééééé!", "b": "12345678901234567890"}));
        assert_eq!(extract_from_fields(&map), "");
        let map = fields(json!({"a": "ééééééééééééééééééééé"}));
        assert_eq!(extract_from_fields(&map), "ééééééééééééééééééééé");
    }

    #[test]
    fn test_non_string_field_values_stringified() {
        let map = fields(json!({"text": 42, "body": ["a", "b"]}));
        assert_eq!(extract_from_fields(&map), r#"42 ["a","b"]"#);
    }

    #[test]
    fn test_nothing_found_is_empty() {
        let map = fields(json!({"author": "Jane", "views": 10}));
        assert_eq!(extract_from_fields(&map), "");
    }

    #[test]
    fn test_json_string_object() {
        let out = extract_from_text(r#"  {"body": "Breaking news content here"}"#);
        assert_eq!(out, "Breaking news content here");
    }

    #[test]
    fn test_json_string_array_skips_other_values() {
        let out = extract_from_text(r#"[{"text": "First story"}, "Second story", 7, null]"#);
        assert_eq!(out, "First story Second story");
    }

    #[test]
    fn test_json_empty_array_stringified() {
        assert_eq!(extract_from_text("[]"), "[]");
    }

    #[test]
    fn test_malformed_json_kept_literal() {
        assert_eq!(extract_from_text("{not valid json"), "{not valid json");
        assert_eq!(extract_from_text("[1, 2"), "[1, 2");
    }

    #[test]
    fn test_sequence_input() {
        let items = vec![json!("lead"), json!({"title": "Headline"}), json!(3.5), json!([1])];
        assert_eq!(extract_from_sequence(&items), "lead Headline 3.5 [1]");
    }

    #[test]
    fn test_row_input() {
        let input = RawInput::row(["author", "body"], [json!("Jane"), json!("Row body text")]);
        assert_eq!(extract_text(&input).unwrap(), "Row body text");

        let bad = RawInput::row(["author", "body"], [json!("Jane")]);
        assert!(matches!(extract_text(&bad), Err(PreprocessError::InvalidInput(_))));
    }

    #[test]
    fn test_invalid_utf8_bytes() {
        let input = RawInput::Bytes(vec![0x66, 0x6f, 0xff, 0xfe]);
        assert!(matches!(extract_text(&input), Err(PreprocessError::InvalidInput(_))));
    }
}
