//! Input shapes accepted by the normalizer.

use serde_json::{Map, Value};

/// String-keyed mapping; iterates in insertion order.
pub type FieldMap = Map<String, Value>;

/// Anything a caller may hand to [`normalize`](super::normalize).
#[derive(Clone, Debug, PartialEq)]
pub enum RawInput {
    /// Plain text, or text that may turn out to be JSON.
    Text(String),
    /// Undecoded bytes (files, request bodies); must be valid UTF-8.
    Bytes(Vec<u8>),
    /// Structured input: JSON object, form fields.
    Fields(FieldMap),
    /// One tabular row; converted column by column into a [`FieldMap`].
    Row {
        headers: Vec<String>,
        values: Vec<Value>,
    },
    /// Mixed list of strings, mappings and other values.
    Sequence(Vec<Value>),
    /// Anything else; stringified.
    Other(Value),
}

impl RawInput {
    pub fn row<H, V>(headers: H, values: V) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<Value>,
    {
        RawInput::Row {
            headers: headers.into_iter().map(Into::into).collect(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&str> for RawInput {
    fn from(s: &str) -> Self {
        RawInput::Text(s.to_string())
    }
}

impl From<String> for RawInput {
    fn from(s: String) -> Self {
        RawInput::Text(s)
    }
}

impl From<Vec<u8>> for RawInput {
    fn from(bytes: Vec<u8>) -> Self {
        RawInput::Bytes(bytes)
    }
}

impl From<FieldMap> for RawInput {
    fn from(fields: FieldMap) -> Self {
        RawInput::Fields(fields)
    }
}

impl From<Vec<Value>> for RawInput {
    fn from(items: Vec<Value>) -> Self {
        RawInput::Sequence(items)
    }
}

impl From<Value> for RawInput {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => RawInput::Text(s),
            Value::Object(map) => RawInput::Fields(map),
            Value::Array(items) => RawInput::Sequence(items),
            other => RawInput::Other(other),
        }
    }
}

/// Python-style truthiness: `null`, `false`, `0`, `""`, `[]` and `{}` are empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Best-effort string form: strings verbatim, `null` empty, everything else as JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_dispatch() {
        assert_eq!(RawInput::from(json!("hi")), RawInput::Text("hi".into()));
        assert!(matches!(RawInput::from(json!({"a": 1})), RawInput::Fields(_)));
        assert!(matches!(RawInput::from(json!([1, 2])), RawInput::Sequence(_)));
        assert_eq!(RawInput::from(json!(42)), RawInput::Other(json!(42)));
    }

    #[test]
    fn test_truthiness() {
        for empty in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(!is_truthy(&empty), "{} should be empty", empty);
        }
        for full in [json!(true), json!(3), json!("x"), json!([0]), json!({"k": null})] {
            assert!(is_truthy(&full), "{} should be non-empty", full);
        }
    }

    #[test]
    fn test_stringify() {
        assert_eq!(stringify(&json!("plain")), "plain");
        assert_eq!(stringify(&json!(null)), "");
        assert_eq!(stringify(&json!(12.5)), "12.5");
        assert_eq!(stringify(&json!(true)), "true");
        assert_eq!(stringify(&json!(["a", "b"])), r#"["a","b"]"#);
    }

    #[test]
    fn test_row_builder() {
        let row = RawInput::row(["title", "views"], [json!("Headline"), json!(10)]);
        assert_eq!(
            row,
            RawInput::Row {
                headers: vec!["title".into(), "views".into()],
                values: vec![json!("Headline"), json!(10)],
            }
        );
    }
}
