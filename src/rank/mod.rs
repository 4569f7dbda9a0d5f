//! Persona-driven section ranking.
//!
//! Sections are the page ranges between consecutive outline headings. Each
//! is scored by the cosine similarity of its text to the persona query,
//! adjusted by keywords in its title; the best sections then get a
//! one-sentence snippet.

mod pipeline;
mod scorer;
mod sections;
mod snippet;

pub use pipeline::{RankOptions, Ranker};
pub use scorer::{rank_sections, KeywordTable, RelevanceScorer, NEGATIVE_KEYWORDS, POSITIVE_KEYWORDS};
pub use sections::extract_sections;
pub use snippet::{split_sentences, SnippetSelector};
