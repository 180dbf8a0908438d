//! Embeddings - word + position + token-type, followed by LayerNorm

use candle_core::{Module, Result, Tensor};
use candle_nn::{Embedding, VarBuilder};

use super::LayerNorm;

pub struct Embeddings {
    pub word: Embedding,
    pub position: Embedding,
    pub token_type: Embedding,
    pub norm: LayerNorm,
    pub pad_token_id: u32,
}

impl Embeddings {
    /// `vb` points at `roberta.embeddings`.
    pub fn load(
        vocab_size: usize,
        hidden_dim: usize,
        max_position_embeddings: usize,
        type_vocab_size: usize,
        pad_token_id: u32,
        eps: f64,
        vb: VarBuilder,
    ) -> Result<Self> {
        let word = candle_nn::embedding(vocab_size, hidden_dim, vb.pp("word_embeddings"))?;
        let position =
            candle_nn::embedding(max_position_embeddings, hidden_dim, vb.pp("position_embeddings"))?;
        let token_type =
            candle_nn::embedding(type_vocab_size, hidden_dim, vb.pp("token_type_embeddings"))?;
        let norm = LayerNorm::load(hidden_dim, eps, vb.pp("LayerNorm"))?;
        Ok(Self {
            word,
            position,
            token_type,
            norm,
            pad_token_id,
        })
    }

    /// `input_ids`: [batch, seq] (u32) -> [batch, seq, hidden]
    pub fn forward(&self, input_ids: &Tensor) -> Result<Tensor> {
        let position_ids = self.position_ids(input_ids)?;
        let token_type_ids = input_ids.zeros_like()?;

        let x = self.word.forward(input_ids)?;
        let x = (x + self.position.forward(&position_ids)?)?;
        let x = (x + self.token_type.forward(&token_type_ids)?)?;
        self.norm.forward(&x)
    }

    /// RoBERTa position ids: real tokens count up from `pad + 1`, padding stays at `pad`.
    pub fn position_ids(&self, input_ids: &Tensor) -> Result<Tensor> {
        let (b_sz, seq_len) = input_ids.dims2()?;
        let rows: Vec<Vec<u32>> = input_ids.to_vec2()?;
        let pad = self.pad_token_id;

        let mut positions = Vec::with_capacity(b_sz * seq_len);
        for row in rows {
            let mut next = pad;
            for id in row {
                if id == pad {
                    positions.push(pad);
                } else {
                    next += 1;
                    positions.push(next);
                }
            }
        }
        Tensor::from_vec(positions, (b_sz, seq_len), input_ids.device())
    }
}
