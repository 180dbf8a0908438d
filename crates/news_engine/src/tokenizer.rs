//! Tokenizer loading and fixed-length encoding.

use std::path::Path;

use candle_core::{Device, Tensor};
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};
use tracing::info;

use crate::InferenceError;

const PAD_TOKEN: &str = "<pad>";

/// Load `tokenizer.json` from `dir`, or fetch it from the HuggingFace hub by
/// repository name when the directory has none.
pub fn load_tokenizer(dir: &Path, hub_name: &str) -> Result<Tokenizer, InferenceError> {
    let local = dir.join("tokenizer.json");
    let path = if local.exists() {
        local
    } else {
        info!("No tokenizer.json in {:?}, fetching `{}` from the hub", dir, hub_name);
        let hub_err = |e: hf_hub::api::sync::ApiError| InferenceError::Hub {
            name: hub_name.to_string(),
            message: e.to_string(),
        };
        let api = hf_hub::api::sync::Api::new().map_err(hub_err)?;
        api.model(hub_name.to_string())
            .get("tokenizer.json")
            .map_err(hub_err)?
    };

    Tokenizer::from_file(&path).map_err(InferenceError::tokenizer)
}

/// Truncate and pad every encoding to exactly `max_length` tokens.
pub fn configure_fixed_length(
    tokenizer: &mut Tokenizer,
    max_length: usize,
    pad_id: u32,
) -> Result<(), InferenceError> {
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length,
            ..Default::default()
        }))
        .map_err(InferenceError::tokenizer)?;
    tokenizer.with_padding(Some(PaddingParams {
        strategy: PaddingStrategy::Fixed(max_length),
        pad_id,
        pad_token: PAD_TOKEN.to_string(),
        ..Default::default()
    }));
    Ok(())
}

/// Encode one text into `(input_ids, attention_mask)`, both [1, max_length] u32.
pub fn encode(
    tokenizer: &Tokenizer,
    text: &str,
    device: &Device,
) -> Result<(Tensor, Tensor), InferenceError> {
    let encoding = tokenizer
        .encode(text, true)
        .map_err(InferenceError::tokenizer)?;

    let ids = encoding.get_ids().to_vec();
    let mask = encoding.get_attention_mask().to_vec();
    let len = ids.len();

    let input_ids = Tensor::from_vec(ids, (1, len), device)?;
    let attention_mask = Tensor::from_vec(mask, (1, len), device)?;
    Ok((input_ids, attention_mask))
}
