//! Selection of the single most query-relevant sentence of a section.

use std::sync::OnceLock;

use regex::Regex;

use crate::embed::{cosine_similarity, Embedder};
use crate::error::{Error, Result};
use crate::outline::clean;

fn sentence_end() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]\s+").unwrap())
}

/// Split text after `.`, `!` or `?` followed by whitespace.
///
/// The terminator stays with its sentence; the whitespace is dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in sentence_end().find_iter(text) {
        // terminators are single-byte ASCII
        sentences.push(&text[start..m.start() + 1]);
        start = m.end();
    }
    sentences.push(&text[start..]);
    sentences
}

/// Picks a representative snippet for a section.
#[derive(Debug, Clone)]
pub struct SnippetSelector {
    /// Minimum whitespace-separated token count for a candidate sentence
    pub min_tokens: usize,
    /// Characters kept when no sentence qualifies
    pub fallback_chars: usize,
}

impl Default for SnippetSelector {
    fn default() -> Self {
        Self {
            min_tokens: 8,
            fallback_chars: 500,
        }
    }
}

impl SnippetSelector {
    /// Create a selector with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sentences long enough to be considered, trimmed.
    pub fn candidates<'a>(&self, content: &'a str) -> Vec<&'a str> {
        split_sentences(content)
            .into_iter()
            .filter(|s| s.split_whitespace().count() >= self.min_tokens)
            .map(str::trim)
            .collect()
    }

    /// The candidate sentence most similar to the query, cleaned.
    ///
    /// Ties go to the earliest sentence. Without candidates the first
    /// `fallback_chars` characters of the content are used instead.
    pub fn select(
        &self,
        content: &str,
        embedder: &dyn Embedder,
        query_embedding: &[f32],
    ) -> Result<String> {
        let candidates = self.candidates(content);
        if candidates.is_empty() {
            let prefix: String = content.chars().take(self.fallback_chars).collect();
            return Ok(clean(&prefix));
        }

        let embeddings = embedder.embed_batch(&candidates)?;
        if embeddings.len() != candidates.len() {
            return Err(Error::Embedding(format!(
                "expected {} sentence embeddings, got {}",
                candidates.len(),
                embeddings.len()
            )));
        }

        let mut best = 0;
        let mut best_score = f32::NEG_INFINITY;
        for (i, embedding) in embeddings.iter().enumerate() {
            let score = cosine_similarity(query_embedding, embedding);
            if score > best_score {
                best = i;
                best_score = score;
            }
        }

        Ok(clean(candidates[best]))
    }
}
