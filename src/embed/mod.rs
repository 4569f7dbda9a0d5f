//! Sentence embedding providers.
//!
//! The ranking pipeline only needs two things from a model: a vector per
//! input text, and a way to compare two vectors. [`Embedder`] is the seam;
//! [`cosine_similarity`] is the comparison.

#[cfg(feature = "candle")]
mod candle;

#[cfg(feature = "candle")]
pub use self::candle::{MiniLmEmbedder, DEFAULT_BATCH_SIZE, DEFAULT_MAX_TOKENS};

use crate::error::{Error, Result};

/// A text embedding backend.
///
/// Implementations are loaded once and called sequentially for the whole
/// run; they must not carry state that changes results between calls.
pub trait Embedder {
    /// Embed a batch of texts, returning one vector per input text (in order).
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("no embedding produced".to_string()))
    }

    /// The dimensionality of the output vectors.
    fn dimensions(&self) -> usize;
}

impl<E: Embedder + ?Sized> Embedder for &E {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        (**self).embed_batch(texts)
    }

    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }
}

impl<E: Embedder + ?Sized> Embedder for Box<E> {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        (**self).embed_batch(texts)
    }

    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }
}

/// Cosine similarity of two vectors.
///
/// Returns 0.0 for vectors of different length or with a zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant;

    impl Embedder for Constant {
        fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    struct Silent;

    impl Embedder for Silent {
        fn embed_batch(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            Ok(Vec::new())
        }

        fn dimensions(&self) -> usize {
            0
        }
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_degenerate() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_default_embed_uses_batch() {
        assert_eq!(Constant.embed("abc").unwrap(), vec![3.0, 1.0]);
        assert!(matches!(Silent.embed("abc"), Err(Error::Embedding(_))));
    }

    #[test]
    fn test_boxed_embedder() {
        let boxed: Box<dyn Embedder> = Box::new(Constant);
        assert_eq!(boxed.dimensions(), 2);
        assert_eq!(boxed.embed_batch(&["a", "bb"]).unwrap().len(), 2);
    }
}
