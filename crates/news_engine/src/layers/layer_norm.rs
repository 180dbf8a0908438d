//! LayerNorm - Normalization over the hidden dimension

use candle_core::{DType, Result, Tensor, D};
use candle_nn::{Init, VarBuilder};

/// Layer normalization with learned scale and shift
pub struct LayerNorm {
    pub weight: Tensor,
    pub bias: Tensor,
    pub eps: f64,
}

impl LayerNorm {
    pub fn load(dim: usize, eps: f64, vb: VarBuilder) -> Result<Self> {
        let weight = vb.get_with_hints((dim,), "weight", Init::Const(1.0))?;
        let bias = vb.get_with_hints((dim,), "bias", Init::Const(0.0))?;
        Ok(Self { weight, bias, eps })
    }

    pub fn forward(&self, x: &Tensor) -> Result<Tensor> {
        let x_dtype = x.dtype();
        let internal_dtype = DType::F32;
        let x_f32 = x.to_dtype(internal_dtype)?;

        let mean = x_f32.mean_keepdim(D::Minus1)?;
        let centered = x_f32.broadcast_sub(&mean)?;
        let var = centered.sqr()?.mean_keepdim(D::Minus1)?;
        let x_normed = centered.broadcast_div(&(var + self.eps)?.sqrt()?)?;

        let weight = self.weight.to_dtype(internal_dtype)?;
        let bias = self.bias.to_dtype(internal_dtype)?;
        let result = x_normed.broadcast_mul(&weight)?.broadcast_add(&bias)?;

        result.to_dtype(x_dtype)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    #[test]
    fn test_layer_norm_zero_mean_unit_var() -> anyhow::Result<()> {
        let device = Device::Cpu;
        let norm = LayerNorm {
            weight: Tensor::ones(4, DType::F32, &device)?,
            bias: Tensor::zeros(4, DType::F32, &device)?,
            eps: 1e-5,
        };

        let x = Tensor::new(&[[1.0f32, 2.0, 3.0, 4.0]], &device)?;
        let y: Vec<f32> = norm.forward(&x)?.flatten_all()?.to_vec1()?;

        let mean: f32 = y.iter().sum::<f32>() / 4.0;
        let var: f32 = y.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / 4.0;
        assert!(mean.abs() < 1e-5);
        assert!((var - 1.0).abs() < 1e-3);
        Ok(())
    }
}
