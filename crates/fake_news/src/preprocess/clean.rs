use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

static RE_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

// Word characters, whitespace and . , ! ? ; : - ( ) survive; everything else goes.
static RE_DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s.,!?;:\-()]").expect("valid punctuation regex"));

/// Remove markup and decode entities, keeping only text nodes.
pub fn strip_html(text: &str) -> String {
    // Nothing for the parser to do without tags or entities.
    if !text.contains('<') && !text.contains('&') {
        return text.to_string();
    }
    let fragment = Html::parse_fragment(text);
    fragment.root_element().text().collect()
}

/// Clean and normalize text.
/// 1. Remove HTML tags (entities decoded).
/// 2. Drop characters outside the safe punctuation set.
/// 3. Collapse whitespace runs to a single space and trim.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let no_html = strip_html(text);
    let filtered = RE_DISALLOWED.replace_all(&no_html, "");
    let normalized = RE_SPACE.replace_all(&filtered, " ");

    normalized.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clean_text_strips_tags_and_entities() {
        let cleaned = clean_text("<p>Hello &nbsp; World!!</p>");
        assert_eq!(cleaned, "Hello World!!");
        assert!(!cleaned.contains('<') && !cleaned.contains('>'));
    }

    #[test]
    fn test_clean_text_nested_markup() {
        let raw = "<div><h1>Title</h1>\n<p>First <b>bold</b> line.</p>\t<br/><p>Second</p></div>";
        assert_eq!(clean_text(raw), "Title First bold line. Second");
    }

    #[test]
    fn test_clean_text_keeps_safe_punctuation() {
        let raw = "Wait... really?! (yes); no: maybe - ok, fine.";
        assert_eq!(clean_text(raw), raw);
    }

    #[test]
    fn test_clean_text_removes_special_characters() {
        assert_eq!(clean_text("Price: $100 @ 50% off #deal"), "Price: 100 50 off deal");
        assert_eq!(clean_text("\"quoted\" 'text' * / \\"), "quoted text");
    }

    #[test]
    fn test_clean_text_unicode_letters_survive() {
        assert_eq!(clean_text("Café  naïve « résumé »"), "Café naïve résumé");
    }

    #[test]
    fn test_clean_text_empty_and_blank() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("   \n\t "), "");
        assert_eq!(clean_text("<br><hr/>"), "");
    }

    #[test]
    fn test_clean_text_malformed_json_is_literal() {
        assert_eq!(clean_text("{not valid json"), "not valid json");
    }

    proptest! {
        #[test]
        fn prop_clean_text_is_idempotent(s in "\\PC{0,200}") {
            let once = clean_text(&s);
            prop_assert_eq!(clean_text(&once), once.clone());
        }

        #[test]
        fn prop_clean_text_has_no_markup_or_double_space(s in "[a-zA-Z <>/&;!?\t\n]{0,120}") {
            let cleaned = clean_text(&s);
            prop_assert!(!cleaned.contains('<') && !cleaned.contains('>'));
            prop_assert!(!cleaned.contains("  "));
            prop_assert!(!cleaned.contains('\t') && !cleaned.contains('\n'));
            prop_assert_eq!(cleaned.trim(), cleaned.as_str());
        }
    }
}
