//! Section types produced from an outline and consumed by ranking.

use serde::{Deserialize, Serialize};

/// Contiguous page range of a document bounded by two consecutive headings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// File name of the originating document
    pub document: String,

    /// Text of the heading that opens the section
    pub title: String,

    /// First page of the section (1-indexed)
    pub start_page: u32,

    /// One past the last page of the section (1-indexed, exclusive)
    pub end_page: u32,

    /// Concatenated raw text of the pages in range
    pub content: String,

    /// Relevance score, assigned by the ranker
    pub score: Option<f64>,
}

impl Section {
    /// Create an unscored section.
    pub fn new(
        document: impl Into<String>,
        title: impl Into<String>,
        start_page: u32,
        end_page: u32,
        content: impl Into<String>,
    ) -> Self {
        Self {
            document: document.into(),
            title: title.into(),
            start_page,
            end_page,
            content: content.into(),
            score: None,
        }
    }

    /// Score used for ordering; unscored sections sort last.
    pub fn rank_score(&self) -> f64 {
        self.score.unwrap_or(f64::NEG_INFINITY)
    }
}
