//! The one inference path shared by the API, the GUI and the CLI.

use news_engine::{Classifier, InferenceError, Prediction};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::preprocess::{self, PreprocessError, RawInput};

/// Characters of processed text echoed back by the HTTP API.
pub const API_PREVIEW_CHARS: usize = 200;

/// Characters of processed text shown in the GUI.
pub const UI_PREVIEW_CHARS: usize = 300;

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error("Prediction failed: {0}")]
    Inference(#[from] InferenceError),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Analysis {
    pub prediction: Prediction,
    pub processed_text: String,
}

/// Normalize, reject insufficient text, classify.
pub fn analyze<I: Into<RawInput>>(
    classifier: &dyn Classifier,
    input: I,
) -> Result<Analysis, AnalyzeError> {
    let processed_text = preprocess::normalize(input)?;
    preprocess::validate(&processed_text)?;

    let prediction = classifier.predict(&processed_text)?;
    info!(
        "Prediction: {} ({:.2}%) for {} chars",
        prediction.label,
        prediction.confidence * 100.0,
        processed_text.chars().count()
    );

    Ok(Analysis {
        prediction,
        processed_text,
    })
}

/// First `max_chars` characters, with `...` appended when anything was cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use news_engine::{Classifier, InferenceError, Label, Prediction};

    /// Deterministic classifier: "Fake" when the text mentions "shocking".
    #[derive(Default)]
    pub struct KeywordClassifier {
        pub calls: AtomicUsize,
    }

    impl Classifier for KeywordClassifier {
        fn predict(&self, text: &str) -> Result<Prediction, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let fake = text.to_lowercase().contains("shocking");
            Ok(Prediction {
                label: if fake { Label::Fake } else { Label::Real },
                confidence: if fake { 0.9 } else { 0.8 },
            })
        }
    }

    pub struct FailingClassifier;

    impl Classifier for FailingClassifier {
        fn predict(&self, _text: &str) -> Result<Prediction, InferenceError> {
            Err(InferenceError::EmptyLogits)
        }
    }
}
