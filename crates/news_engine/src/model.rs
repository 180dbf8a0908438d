//! Model Module - RoBERTa-style sequence classifier
//!
//! - EncoderLayer: self-attention + feed-forward with post-LayerNorm
//! - SequenceClassifier: embeddings, encoder stack and classification head
//! - RobertaConfig: HuggingFace `config.json` subset
//! - NewsClassifier: high-level API with tokenizer, implements `Classifier`

pub mod classifier;
pub mod config;
pub mod encoder;

pub use classifier::{ClassifierOptions, NewsClassifier, SequenceClassifier};
pub use config::RobertaConfig;
pub use encoder::EncoderLayer;
