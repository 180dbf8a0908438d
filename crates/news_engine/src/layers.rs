//! Layers Module - Encoder building blocks
//!
//! - LayerNorm: mean/variance normalization with affine weight and bias
//! - Embeddings: word + position + token-type embeddings
//! - SelfAttention: bidirectional multi-head attention with padding mask
//! - FeedForward: GELU MLP with residual + LayerNorm

pub mod attention;
pub mod embeddings;
pub mod feed_forward;
pub mod layer_norm;

pub use attention::SelfAttention;
pub use embeddings::Embeddings;
pub use feed_forward::FeedForward;
pub use layer_norm::LayerNorm;
