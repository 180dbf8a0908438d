//! News Engine
//!
//! Sequence classification for news text: a RoBERTa-compatible encoder on top of
//! candle, plus the tokenizer plumbing needed to turn a string into logits.
//! Front-ends only see the [`Classifier`] trait and its [`Prediction`].

pub mod device_utils;
pub mod error;
pub mod layers;
pub mod model;
pub mod prediction;
pub mod tokenizer;

pub use error::InferenceError;
pub use model::{ClassifierOptions, NewsClassifier, RobertaConfig, SequenceClassifier};
pub use prediction::{Classifier, Label, Prediction};
