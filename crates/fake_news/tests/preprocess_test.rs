use fake_news::preprocess::{clean_text, normalize, validate, validate_input, PreprocessError, RawInput};
use serde_json::json;

#[test]
fn test_text_wins_over_title() {
    let out = normalize(json!({"text": "The actual article", "title": "Headline only"})).unwrap();
    assert!(out.contains("The actual article"));
    assert!(!out.contains("Headline only"));
}

#[test]
fn test_titles_joined() {
    assert_eq!(normalize(json!({"title": "T", "headline": "H"})).unwrap(), "T H");
}

#[test]
fn test_long_values_fallback() {
    let out = normalize(json!({
        "summary": "a value well over twenty characters",
        "tag": "short value"
    }))
    .unwrap();
    assert_eq!(out, "a value well over twenty characters");
}

#[test]
fn test_clean_html_and_entities() {
    assert_eq!(clean_text("<p>Hello &nbsp; World!!</p>"), "Hello World!!");
}

#[test]
fn test_json_text_and_malformed_json() {
    assert_eq!(
        normalize(r#"{"body": "Breaking news content here"}"#).unwrap(),
        "Breaking news content here"
    );
    assert_eq!(normalize("{not valid json").unwrap(), "not valid json");
}

#[test]
fn test_bytes_input() {
    let bytes = br#"{"content": "<div>Story from a file</div>"}"#.to_vec();
    assert_eq!(normalize(bytes).unwrap(), "Story from a file");

    let err = normalize(vec![0xff_u8, 0xfe]).unwrap_err();
    assert!(matches!(err, PreprocessError::InvalidInput(_)));
    assert!(err.to_string().starts_with("Failed to preprocess input"));
}

#[test]
fn test_insufficient_text_everywhere() {
    for input in [
        RawInput::from("<p>tiny</p>"),
        RawInput::from(json!({"author": "Jane"})),
        RawInput::from(json!([])),
        RawInput::from("   !!!   ???   "),
    ] {
        assert!(!validate_input(input.clone()), "{:?} should be rejected", input);
        let text = normalize(input).unwrap();
        assert!(matches!(validate(&text), Err(PreprocessError::InsufficientText { .. })));
    }
}
