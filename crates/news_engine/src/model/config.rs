//! RobertaConfig - Model configuration

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{InferenceError, Label};

fn default_max_position_embeddings() -> usize {
    514
}

fn default_type_vocab_size() -> usize {
    1
}

fn default_layer_norm_eps() -> f64 {
    1e-5
}

fn default_pad_token_id() -> u32 {
    1
}

/// The subset of a HuggingFace RoBERTa `config.json` needed for inference.
/// Unknown keys are ignored.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RobertaConfig {
    pub vocab_size: usize,
    pub hidden_size: usize,
    #[serde(alias = "n_layers")]
    pub num_hidden_layers: usize,
    pub num_attention_heads: usize,
    pub intermediate_size: usize,
    #[serde(default = "default_max_position_embeddings")]
    pub max_position_embeddings: usize,
    #[serde(default = "default_type_vocab_size")]
    pub type_vocab_size: usize,
    #[serde(default = "default_layer_norm_eps")]
    pub layer_norm_eps: f64,
    #[serde(default = "default_pad_token_id")]
    pub pad_token_id: u32,
    #[serde(default)]
    pub id2label: BTreeMap<String, String>,
}

impl RobertaConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| InferenceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn num_labels(&self) -> usize {
        self.id2label.len().max(2)
    }

    /// Longest token sequence the position table can hold.
    pub fn max_sequence_len(&self) -> usize {
        self.max_position_embeddings
            .saturating_sub(self.pad_token_id as usize + 1)
    }

    /// Map a class index to a label, honoring `id2label` when its names are
    /// recognizable and falling back to 0 = Real, 1 = Fake otherwise.
    pub fn label_for(&self, class: usize) -> Result<Label, InferenceError> {
        self.id2label
            .get(&class.to_string())
            .and_then(|name| Label::from_name(name))
            .or_else(|| Label::from_class_index(class))
            .ok_or(InferenceError::UnknownClass(class))
    }
}
