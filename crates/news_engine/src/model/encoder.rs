//! EncoderLayer - Transformer encoder block

use candle_core::{Result, Tensor};
use candle_nn::VarBuilder;

use crate::layers::{FeedForward, SelfAttention};
use crate::model::RobertaConfig;

/// Single encoder block: attention + MLP, each with residual and post-LayerNorm
pub struct EncoderLayer {
    pub attention: SelfAttention,
    pub mlp: FeedForward,
}

impl EncoderLayer {
    pub fn load(cfg: &RobertaConfig, vb: VarBuilder) -> Result<Self> {
        let attention = SelfAttention::load(
            cfg.hidden_size,
            cfg.num_attention_heads,
            cfg.layer_norm_eps,
            vb.pp("attention"),
        )?;
        let mlp = FeedForward::load(
            cfg.hidden_size,
            cfg.intermediate_size,
            cfg.layer_norm_eps,
            vb,
        )?;
        Ok(Self { attention, mlp })
    }

    pub fn forward(&self, x: &Tensor, mask_bias: &Tensor) -> Result<Tensor> {
        let x_mid = self.attention.forward(x, mask_bias)?;
        self.mlp.forward(&x_mid)
    }
}
