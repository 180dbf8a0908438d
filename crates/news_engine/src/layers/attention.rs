use candle_core::{DType, Module, Result, Tensor};
use candle_nn::{ops::softmax, Linear, VarBuilder};

use super::LayerNorm;

/// Additive bias applied to padded key positions before softmax.
const MASK_FILL: f64 = -1e9;

/// Bidirectional multi-head self-attention (encoder style, no causal mask).
pub struct SelfAttention {
    pub query: Linear,
    pub key: Linear,
    pub value: Linear,
    pub output: Linear,
    pub norm: LayerNorm,
    pub n_heads: usize,
    pub head_dim: usize,
    pub scaling: f64,
}

impl SelfAttention {
    /// `vb` points at `...layer.{i}.attention`.
    pub fn load(hidden_dim: usize, n_heads: usize, eps: f64, vb: VarBuilder) -> Result<Self> {
        if n_heads == 0 || hidden_dim % n_heads != 0 {
            candle_core::bail!(
                "hidden_size {} is not divisible by num_attention_heads {}",
                hidden_dim,
                n_heads
            );
        }
        let head_dim = hidden_dim / n_heads;
        let scaling = 1.0 / (head_dim as f64).sqrt();

        // HF Keys: attention.self.{query,key,value}, attention.output.{dense,LayerNorm}
        let vb_self = vb.pp("self");
        let query = candle_nn::linear(hidden_dim, hidden_dim, vb_self.pp("query"))?;
        let key = candle_nn::linear(hidden_dim, hidden_dim, vb_self.pp("key"))?;
        let value = candle_nn::linear(hidden_dim, hidden_dim, vb_self.pp("value"))?;
        let output = candle_nn::linear(hidden_dim, hidden_dim, vb.pp("output").pp("dense"))?;
        let norm = LayerNorm::load(hidden_dim, eps, vb.pp("output").pp("LayerNorm"))?;

        Ok(Self {
            query,
            key,
            value,
            output,
            norm,
            n_heads,
            head_dim,
            scaling,
        })
    }

    /// `x`: [batch, seq, hidden]. `mask_bias`: [batch, 1, 1, seq] from [`padding_mask_bias`].
    pub fn forward(&self, x: &Tensor, mask_bias: &Tensor) -> Result<Tensor> {
        let (b_sz, seq_len, hidden) = x.dims3()?;

        // Shape: [Batch, Seq, Heads * Dim] -> [Batch, Heads, Seq, Dim]
        let split = |t: Tensor| -> Result<Tensor> {
            t.reshape((b_sz, seq_len, self.n_heads, self.head_dim))?
                .transpose(1, 2)?
                .contiguous()
        };
        let q = split(self.query.forward(x)?)?;
        let k = split(self.key.forward(x)?)?;
        let v = split(self.value.forward(x)?)?;

        let att = (q.matmul(&k.t()?.contiguous()?)? * self.scaling)?;
        let att = att.broadcast_add(mask_bias)?;
        let att = softmax(&att, candle_core::D::Minus1)?;

        // Reassemble: [Batch, Heads, Seq, Dim] -> [Batch, Seq, Hidden]
        let y = att
            .matmul(&v)?
            .transpose(1, 2)?
            .contiguous()?
            .reshape((b_sz, seq_len, hidden))?;

        let y = self.output.forward(&y)?;
        self.norm.forward(&(y + x)?)
    }
}

/// Turn a 0/1 attention mask [batch, seq] into an additive bias [batch, 1, 1, seq]:
/// 0 where the token is real, a large negative value where it is padding.
pub fn padding_mask_bias(attention_mask: &Tensor) -> Result<Tensor> {
    let (b_sz, seq_len) = attention_mask.dims2()?;
    attention_mask
        .to_dtype(DType::F32)?
        .affine(-MASK_FILL, MASK_FILL)?
        .reshape((b_sz, 1, 1, seq_len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;
    use candle_nn::VarMap;

    #[test]
    fn test_padding_mask_bias() -> anyhow::Result<()> {
        let device = Device::Cpu;
        let mask = Tensor::new(&[[1u32, 1, 0]], &device)?;
        let bias = padding_mask_bias(&mask)?;
        assert_eq!(bias.dims(), &[1, 1, 1, 3]);

        let v: Vec<f32> = bias.flatten_all()?.to_vec1()?;
        assert_eq!(v[0], 0.0);
        assert_eq!(v[1], 0.0);
        assert!(v[2] < -1e8);
        Ok(())
    }

    #[test]
    fn test_attention_shape_and_padding_invariance() -> anyhow::Result<()> {
        let device = Device::Cpu;
        let varmap = VarMap::new();
        let vb = candle_nn::VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let attn = SelfAttention::load(8, 2, 1e-5, vb)?;

        // Same first two tokens, different padded third token.
        let a = Tensor::new(&[[[0.1f32; 8], [0.2; 8], [0.3; 8]]], &device)?;
        let b = Tensor::new(&[[[0.1f32; 8], [0.2; 8], [9.0; 8]]], &device)?;
        let mask = padding_mask_bias(&Tensor::new(&[[1u32, 1, 0]], &device)?)?;

        let ya = attn.forward(&a, &mask)?;
        let yb = attn.forward(&b, &mask)?;
        assert_eq!(ya.dims(), &[1, 3, 8]);

        // Real positions must not see the padded token.
        let ya0: Vec<f32> = ya.narrow(1, 0, 2)?.flatten_all()?.to_vec1()?;
        let yb0: Vec<f32> = yb.narrow(1, 0, 2)?.flatten_all()?.to_vec1()?;
        for (x, y) in ya0.iter().zip(yb0.iter()) {
            assert!((x - y).abs() < 1e-4, "{} vs {}", x, y);
        }
        Ok(())
    }

    #[test]
    fn test_rejects_indivisible_heads() {
        let varmap = VarMap::new();
        let vb = candle_nn::VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        assert!(SelfAttention::load(10, 3, 1e-5, vb).is_err());
    }
}
