//! Relevance scoring: embedding similarity adjusted by title keywords.

use crate::embed::cosine_similarity;
use crate::model::Section;

/// Title substrings that promote a section.
pub const POSITIVE_KEYWORDS: &[&str] = &[
    "method",
    "dataset",
    "benchmark",
    "result",
    "evaluation",
    "experiment",
    "model",
    "algorithm",
    "analysis",
    "kinetic",
    "mechanism",
    "concept",
    "rate law",
    "reaction",
];

/// Title substrings that demote a section.
pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "reference",
    "declaration",
    "funding",
    "appendix",
    "acknowledgment",
    "competing interest",
    "further reading",
    "conclusion",
];

/// Keyword lists and the multipliers applied per matching keyword.
#[derive(Debug, Clone)]
pub struct KeywordTable {
    pub positive: Vec<String>,
    pub boost: f64,
    pub negative: Vec<String>,
    pub penalty: f64,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self {
            positive: POSITIVE_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            boost: 1.5,
            negative: NEGATIVE_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            penalty: 0.2,
        }
    }
}

/// Scores sections against a query embedding.
#[derive(Debug, Clone, Default)]
pub struct RelevanceScorer {
    keywords: KeywordTable,
}

impl RelevanceScorer {
    /// Create a scorer with the default keyword table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom keyword table.
    pub fn with_keywords(keywords: KeywordTable) -> Self {
        Self { keywords }
    }

    /// Cosine similarity, multiplied once per keyword found in the title.
    ///
    /// Multipliers compound: a title matching two positive keywords gets
    /// the boost twice. A negative similarity stays negative.
    pub fn score(&self, title: &str, section_embedding: &[f32], query_embedding: &[f32]) -> f64 {
        let mut score = f64::from(cosine_similarity(query_embedding, section_embedding));
        let title = title.to_lowercase();

        for keyword in &self.keywords.positive {
            if title.contains(keyword.as_str()) {
                score *= self.keywords.boost;
            }
        }
        for keyword in &self.keywords.negative {
            if title.contains(keyword.as_str()) {
                score *= self.keywords.penalty;
            }
        }

        score
    }
}

/// Stable sort by descending score; equal scores keep their input order.
pub fn rank_sections(sections: &mut [Section]) {
    sections.sort_by(|a, b| b.rank_score().total_cmp(&a.rank_score()));
}
