use news_engine::Label;
use serde_json::Value;

use crate::preprocess::{FieldMap, PreprocessError, RawInput};
use crate::service::{self, AnalyzeError, Analysis, UI_PREVIEW_CHARS};

#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum InputMode {
    #[default]
    PlainText,
    Json,
    MultipleFields,
}

impl InputMode {
    pub const ALL: [InputMode; 3] = [InputMode::PlainText, InputMode::Json, InputMode::MultipleFields];

    pub fn label(self) -> &'static str {
        match self {
            InputMode::PlainText => "Plain Text",
            InputMode::Json => "JSON Format",
            InputMode::MultipleFields => "Multiple Fields",
        }
    }
}

/// The multi-field article form.
#[derive(Clone, Debug, Default)]
pub struct ArticleForm {
    pub title: String,
    pub author: String,
    pub source: String,
    pub date: String,
    pub body: String,
}

impl ArticleForm {
    /// Field dictionary in form order; empty fields are dropped.
    pub fn to_fields(&self) -> FieldMap {
        [
            ("title", &self.title),
            ("author", &self.author),
            ("source", &self.source),
            ("date", &self.date),
            ("body", &self.body),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key.to_string(), Value::String(value.clone())))
        .collect()
    }
}

/// Everything the user typed, across all modes.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    pub mode: InputMode,
    pub plain_text: String,
    pub json_text: String,
    pub form: ArticleForm,
}

impl InputState {
    /// Input for the active mode, or `None` when nothing was entered.
    pub fn to_raw_input(&self) -> Option<RawInput> {
        match self.mode {
            InputMode::PlainText if !self.plain_text.is_empty() => {
                Some(RawInput::Text(self.plain_text.clone()))
            }
            InputMode::Json if !self.json_text.is_empty() => {
                Some(RawInput::Text(self.json_text.clone()))
            }
            InputMode::MultipleFields => {
                let fields = self.form.to_fields();
                (!fields.is_empty()).then_some(RawInput::Fields(fields))
            }
            _ => None,
        }
    }
}

/// What the result area shows after an analysis attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Result {
        label: Label,
        confidence_pct: String,
        preview: String,
    },
    Warning(String),
    Error(String),
}

pub const EMPTY_INPUT_WARNING: &str = "Please enter some text to analyze.";
pub const INSUFFICIENT_TEXT_ERROR: &str = "No meaningful text content found. Please provide more text.";
pub const ANALYSIS_FAILED_ERROR: &str = "An error occurred while analyzing the text. Please try again.";

impl Outcome {
    pub fn from_analysis(result: Result<Analysis, AnalyzeError>) -> Self {
        match result {
            Ok(analysis) => Outcome::Result {
                label: analysis.prediction.label,
                confidence_pct: format!("{:.2}%", analysis.prediction.confidence * 100.0),
                preview: service::preview(&analysis.processed_text, UI_PREVIEW_CHARS),
            },
            Err(AnalyzeError::Preprocess(PreprocessError::InsufficientText { .. })) => {
                Outcome::Error(INSUFFICIENT_TEXT_ERROR.to_string())
            }
            Err(e) => {
                tracing::error!("Prediction error: {}", e);
                Outcome::Error(ANALYSIS_FAILED_ERROR.to_string())
            }
        }
    }
}

/// Steps shown under "How to Use" in the About section.
pub const HOW_TO_USE: [&str; 4] = [
    "Choose your preferred input method",
    "Enter the news article content",
    "Click the \"Analyze\" button",
    "View the prediction and confidence score",
];

pub fn advisory(label: Label) -> &'static str {
    match label {
        Label::Fake => {
            "⚠ This article shows characteristics of potentially fake news. \
             Please verify the information from reliable sources."
        }
        Label::Real => {
            "✔ This article shows characteristics of potentially real news. \
             However, always verify information from multiple reliable sources."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use news_engine::{InferenceError, Prediction};

    #[test]
    fn test_form_drops_empty_fields() {
        let form = ArticleForm {
            title: "Headline".into(),
            body: "Body text".into(),
            ..Default::default()
        };
        let fields = form.to_fields();
        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["title", "body"]);
        assert!(ArticleForm::default().to_fields().is_empty());
    }

    #[test]
    fn test_raw_input_per_mode() {
        let mut state = InputState::default();
        assert_eq!(state.to_raw_input(), None);

        state.plain_text = "typed text".into();
        assert_eq!(state.to_raw_input(), Some(RawInput::Text("typed text".into())));

        // Only the active mode counts.
        state.mode = InputMode::Json;
        assert_eq!(state.to_raw_input(), None);

        state.mode = InputMode::MultipleFields;
        state.form.author = "Jane".into();
        assert!(matches!(state.to_raw_input(), Some(RawInput::Fields(f)) if f.len() == 1));
    }

    #[test]
    fn test_outcome_formatting() {
        let analysis = Analysis {
            prediction: Prediction {
                label: Label::Fake,
                confidence: 0.98765,
            },
            processed_text: "x".repeat(400),
        };
        match Outcome::from_analysis(Ok(analysis)) {
            Outcome::Result {
                label,
                confidence_pct,
                preview,
            } => {
                assert_eq!(label, Label::Fake);
                assert_eq!(confidence_pct, "98.77%");
                assert_eq!(preview.chars().count(), UI_PREVIEW_CHARS + 3);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_how_to_use_steps() {
        assert!(HOW_TO_USE[0].contains("input method"));
        assert!(HOW_TO_USE[2].contains("Analyze"));
        assert!(HOW_TO_USE[3].contains("confidence"));
    }

    #[test]
    fn test_outcome_errors() {
        let short = Outcome::from_analysis(Err(PreprocessError::InsufficientText { len: 4 }.into()));
        assert_eq!(short, Outcome::Error(INSUFFICIENT_TEXT_ERROR.to_string()));

        let failed = Outcome::from_analysis(Err(InferenceError::EmptyLogits.into()));
        assert_eq!(failed, Outcome::Error(ANALYSIS_FAILED_ERROR.to_string()));
    }
}
