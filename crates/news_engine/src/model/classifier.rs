//! SequenceClassifier and NewsClassifier - Full model implementation

use std::path::{Path, PathBuf};

use candle_core::{DType, Device, Module, Result, Tensor, D};
use candle_nn::{Linear, VarBuilder};
use tokenizers::Tokenizer;
use tracing::info;

use crate::layers::attention::padding_mask_bias;
use crate::layers::Embeddings;
use crate::model::{EncoderLayer, RobertaConfig};
use crate::prediction::argmax;
use crate::{tokenizer, Classifier, InferenceError, Prediction};

/// Dense + tanh + out projection over the first (`<s>`) token.
pub struct ClassificationHead {
    pub dense: Linear,
    pub out_proj: Linear,
}

impl ClassificationHead {
    pub fn load(hidden_dim: usize, num_labels: usize, vb: VarBuilder) -> Result<Self> {
        let dense = candle_nn::linear(hidden_dim, hidden_dim, vb.pp("dense"))?;
        let out_proj = candle_nn::linear(hidden_dim, num_labels, vb.pp("out_proj"))?;
        Ok(Self { dense, out_proj })
    }

    pub fn forward(&self, hidden: &Tensor) -> Result<Tensor> {
        let cls = hidden.narrow(1, 0, 1)?.squeeze(1)?;
        let x = self.dense.forward(&cls)?.tanh()?;
        self.out_proj.forward(&x)
    }
}

/// Encoder with a sequence classification head
pub struct SequenceClassifier {
    pub embeddings: Embeddings,
    pub layers: Vec<EncoderLayer>,
    pub head: ClassificationHead,
    pub config: RobertaConfig,
}

impl SequenceClassifier {
    pub fn load(cfg: RobertaConfig, vb: VarBuilder) -> Result<Self> {
        let vb_roberta = vb.pp("roberta");
        let embeddings = Embeddings::load(
            cfg.vocab_size,
            cfg.hidden_size,
            cfg.max_position_embeddings,
            cfg.type_vocab_size,
            cfg.pad_token_id,
            cfg.layer_norm_eps,
            vb_roberta.pp("embeddings"),
        )?;

        let vb_layers = vb_roberta.pp("encoder").pp("layer");
        let layers = (0..cfg.num_hidden_layers)
            .map(|i| EncoderLayer::load(&cfg, vb_layers.pp(i)))
            .collect::<Result<Vec<_>>>()?;

        let head = ClassificationHead::load(cfg.hidden_size, cfg.num_labels(), vb.pp("classifier"))?;

        Ok(Self {
            embeddings,
            layers,
            head,
            config: cfg,
        })
    }

    /// `input_ids`, `attention_mask`: [batch, seq] u32 -> logits [batch, num_labels]
    pub fn forward(&self, input_ids: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
        let mask_bias = padding_mask_bias(attention_mask)?;
        let mut h = self.embeddings.forward(input_ids)?;
        for layer in &self.layers {
            h = layer.forward(&h, &mask_bias)?;
        }
        self.head.forward(&h)
    }

    /// Softmax over the logits of a single-row batch.
    pub fn probabilities(&self, input_ids: &Tensor, attention_mask: &Tensor) -> Result<Vec<f32>> {
        let logits = self.forward(input_ids, attention_mask)?;
        let probs = candle_nn::ops::softmax(&logits.to_dtype(DType::F32)?, D::Minus1)?;
        probs.squeeze(0)?.to_vec1()
    }
}

/// Load-time settings for [`NewsClassifier`].
#[derive(Clone, Debug)]
pub struct ClassifierOptions {
    /// Hub repository used when the model directory has no `tokenizer.json`.
    pub tokenizer_name: String,
    pub max_length: usize,
    pub use_gpu: bool,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            tokenizer_name: "roberta-base".to_string(),
            max_length: 512,
            use_gpu: true,
        }
    }
}

/// High-level classifier API with tokenizer
pub struct NewsClassifier {
    pub model: SequenceClassifier,
    pub tokenizer: Tokenizer,
    pub device: Device,
    pub max_length: usize,
}

impl NewsClassifier {
    /// Assemble from parts. Configures the tokenizer for fixed-length encoding,
    /// clamping `max_length` to what the position table supports.
    pub fn new(
        model: SequenceClassifier,
        mut tokenizer: Tokenizer,
        device: Device,
        max_length: usize,
    ) -> std::result::Result<Self, InferenceError> {
        let max_length = max_length.min(model.config.max_sequence_len()).max(1);
        tokenizer::configure_fixed_length(&mut tokenizer, max_length, model.config.pad_token_id)?;
        Ok(Self {
            model,
            tokenizer,
            device,
            max_length,
        })
    }

    /// Load from a directory holding `config.json`, `model.safetensors` and
    /// optionally `tokenizer.json`.
    pub fn load_dir<P: AsRef<Path>>(
        model_dir: P,
        opts: &ClassifierOptions,
    ) -> std::result::Result<Self, InferenceError> {
        let dir = model_dir.as_ref();
        let device = crate::device_utils::select_device(opts.use_gpu);

        let config = RobertaConfig::from_file(dir.join("config.json"))?;
        let weights = find_weights(dir)?;
        let tokenizer = tokenizer::load_tokenizer(dir, &opts.tokenizer_name)?;

        info!("Loading classifier weights from {:?} on {:?}", weights, device);
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights], DType::F32, &device)? };
        let model = SequenceClassifier::load(config, vb)?;

        let classifier = Self::new(model, tokenizer, device, opts.max_length)?;
        info!(
            "Classifier ready: {} layers, hidden {}, max_length {}",
            classifier.model.layers.len(),
            classifier.model.config.hidden_size,
            classifier.max_length
        );
        Ok(classifier)
    }
}

fn find_weights(dir: &Path) -> std::result::Result<PathBuf, InferenceError> {
    ["model.safetensors", "weight.safetensors"]
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
        .ok_or_else(|| InferenceError::MissingWeights(dir.to_path_buf()))
}

impl Classifier for NewsClassifier {
    fn predict(&self, text: &str) -> std::result::Result<Prediction, InferenceError> {
        let (input_ids, attention_mask) = tokenizer::encode(&self.tokenizer, text, &self.device)?;
        let probs = self.model.probabilities(&input_ids, &attention_mask)?;

        let (class, confidence) = argmax(&probs).ok_or(InferenceError::EmptyLogits)?;
        let label = self.model.config.label_for(class)?;
        tracing::debug!("Predicted {} ({:.4}) over {} classes", label, confidence, probs.len());

        Ok(Prediction { label, confidence })
    }
}
