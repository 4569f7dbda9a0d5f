//! Local sentence-transformer inference with Candle.

use std::path::{Path, PathBuf};
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};

use super::Embedder;
use crate::error::{Error, Result};

/// Texts per forward pass.
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Token limit per text; longer inputs are truncated.
pub const DEFAULT_MAX_TOKENS: usize = 256;

/// MiniLM-style BERT encoder loaded from a local model directory.
///
/// The directory must contain `config.json`, `tokenizer.json` and either
/// `model.safetensors` or `pytorch_model.bin`. Embeddings are mean-pooled
/// over the attention mask and L2-normalised.
pub struct MiniLmEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    hidden_size: usize,
    batch_size: usize,
}

impl MiniLmEmbedder {
    /// Load a model from `dir` onto the CPU.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let start = Instant::now();
        log::info!("Loading embedding model from {}", dir.display());

        let device = Device::Cpu;

        let config_json = std::fs::read_to_string(dir.join("config.json"))?;
        let config: Config = serde_json::from_str(&config_json)?;
        let hidden_size = config.hidden_size;

        let mut tokenizer = Tokenizer::from_file(dir.join("tokenizer.json"))
            .map_err(|e| Error::Embedding(format!("tokenizer: {}", e)))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: DEFAULT_MAX_TOKENS,
                ..Default::default()
            }))
            .map_err(|e| Error::Embedding(format!("tokenizer truncation: {}", e)))?;
        tokenizer.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::BatchLongest,
            ..Default::default()
        }));

        let weights = weights_path(dir)?;
        let vb = if weights.extension().is_some_and(|e| e == "safetensors") {
            // SAFETY: the weights file is not modified while mapped.
            unsafe { VarBuilder::from_mmaped_safetensors(&[&weights], DType::F32, &device)? }
        } else {
            VarBuilder::from_pth(&weights, DType::F32, &device)?
        };
        let model = BertModel::load(vb, &config)?;

        log::info!("Model loaded in {:.2}s", start.elapsed().as_secs_f32());

        Ok(Self {
            model,
            tokenizer,
            device,
            hidden_size,
            batch_size: DEFAULT_BATCH_SIZE,
        })
    }

    /// Change the number of texts per forward pass.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    fn forward(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| Error::Embedding(format!("tokenize: {}", e)))?;

        let ids = encodings
            .iter()
            .map(|e| Tensor::new(e.get_ids(), &self.device))
            .collect::<candle_core::Result<Vec<_>>>()?;
        let type_ids = encodings
            .iter()
            .map(|e| Tensor::new(e.get_type_ids(), &self.device))
            .collect::<candle_core::Result<Vec<_>>>()?;
        let mask = encodings
            .iter()
            .map(|e| Tensor::new(e.get_attention_mask(), &self.device))
            .collect::<candle_core::Result<Vec<_>>>()?;

        let ids = Tensor::stack(&ids, 0)?;
        let type_ids = Tensor::stack(&type_ids, 0)?;
        let mask = Tensor::stack(&mask, 0)?.to_dtype(DType::F32)?;

        let hidden = self.model.forward(&ids, &type_ids, Some(&mask))?;
        let pooled = mean_pool(&hidden, &mask)?;
        let normalized = l2_normalize(&pooled)?;

        Ok(normalized.to_vec2::<f32>()?)
    }
}

impl Embedder for MiniLmEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.batch_size) {
            embeddings.extend(self.forward(chunk)?);
        }
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.hidden_size
    }
}

fn weights_path(dir: &Path) -> Result<PathBuf> {
    ["model.safetensors", "pytorch_model.bin"]
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| {
            Error::Embedding(format!("no model weights found in {}", dir.display()))
        })
}

/// Mean over non-padding tokens: (batch, seq, hidden) -> (batch, hidden).
fn mean_pool(hidden: &Tensor, mask: &Tensor) -> candle_core::Result<Tensor> {
    let mask_expanded = mask.unsqueeze(2)?.expand(hidden.shape())?;
    let summed = (hidden * &mask_expanded)?.sum(1)?;
    let counts = mask.unsqueeze(2)?.sum(1)?.clamp(1e-9f32, f32::MAX)?;
    summed.broadcast_div(&counts)
}

fn l2_normalize(embeddings: &Tensor) -> candle_core::Result<Tensor> {
    let norms = embeddings.sqr()?.sum_keepdim(1)?.sqrt()?;
    embeddings.broadcast_div(&norms.clamp(1e-9f32, f32::MAX)?)
}
