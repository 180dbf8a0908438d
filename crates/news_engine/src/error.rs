use std::path::PathBuf;

use thiserror::Error;

/// Anything that can go wrong between "here is clean text" and "here is a label".
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("model error: {0}")]
    Candle(#[from] candle_core::Error),

    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid model config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to fetch tokenizer `{name}` from the hub: {message}")]
    Hub { name: String, message: String },

    #[error("no model.safetensors found in {0}")]
    MissingWeights(PathBuf),

    #[error("classifier produced no logits")]
    EmptyLogits,

    #[error("class index {0} has no Real/Fake label")]
    UnknownClass(usize),
}

impl InferenceError {
    pub(crate) fn tokenizer<E: std::fmt::Display>(e: E) -> Self {
        Self::Tokenizer(e.to_string())
    }
}
