//! Prediction contract shared by every front-end.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::InferenceError;

/// Binary verdict of the classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Real,
    Fake,
}

impl Label {
    /// Default class layout of the fine-tuned checkpoints: 0 = Real, 1 = Fake.
    pub fn from_class_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Label::Real),
            1 => Some(Label::Fake),
            _ => None,
        }
    }

    /// Parse an `id2label` entry. Case-insensitive; unknown names give `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "real" | "true" => Some(Label::Real),
            "fake" | "false" => Some(Label::Fake),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Real => "Real",
            Label::Fake => "Fake",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of a single `predict` call. `confidence` is the probability of `label`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(rename = "prediction")]
    pub label: Label,
    pub confidence: f32,
}

/// Anything that can turn normalized text into a [`Prediction`].
///
/// Implementations are loaded once and shared read-only across requests.
pub trait Classifier: Send + Sync {
    fn predict(&self, text: &str) -> Result<Prediction, InferenceError>;
}

/// Index and value of the most probable class. Ties keep the lower index.
pub fn argmax(probs: &[f32]) -> Option<(usize, f32)> {
    probs
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, p)| match best {
            Some((_, bp)) if bp >= p => best,
            _ => Some((i, p)),
        })
}
