//! Reconstructed outline types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse heading level inferred from relative font size and weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        };
        f.write_str(s)
    }
}

/// A heading line accepted into the outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingCandidate {
    /// Heading level
    pub level: HeadingLevel,
    /// Normalized heading text
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
}

impl HeadingCandidate {
    /// Create a new heading candidate.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// Document title plus its ordered, deduplicated headings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    /// Document title
    pub title: String,

    /// Headings ordered by page, then by top-to-bottom position
    #[serde(rename = "outline")]
    pub entries: Vec<HeadingCandidate>,
}

impl Outline {
    /// Create an outline with no headings.
    pub fn empty(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
        }
    }

    /// Check if the outline has no headings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of headings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
