//! FeedForward - GELU MLP with residual connection

use candle_core::{Module, Result, Tensor};
use candle_nn::{Linear, VarBuilder};

use super::LayerNorm;

/// Intermediate (up) projection, GELU, output (down) projection, then
/// post-LayerNorm over the residual sum.
pub struct FeedForward {
    pub intermediate: Linear,
    pub output: Linear,
    pub norm: LayerNorm,
}

impl FeedForward {
    /// `vb` points at one encoder layer (`...layer.{i}`).
    pub fn load(
        hidden_dim: usize,
        intermediate_dim: usize,
        eps: f64,
        vb: VarBuilder,
    ) -> Result<Self> {
        let intermediate =
            candle_nn::linear(hidden_dim, intermediate_dim, vb.pp("intermediate").pp("dense"))?;
        let output = candle_nn::linear(intermediate_dim, hidden_dim, vb.pp("output").pp("dense"))?;
        let norm = LayerNorm::load(hidden_dim, eps, vb.pp("output").pp("LayerNorm"))?;
        Ok(Self {
            intermediate,
            output,
            norm,
        })
    }

    pub fn forward(&self, x: &Tensor) -> Result<Tensor> {
        let hidden = self.intermediate.forward(x)?.gelu_erf()?;
        let out = self.output.forward(&hidden)?;
        self.norm.forward(&(out + x)?)
    }
}
