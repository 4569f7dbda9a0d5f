//! Document-level layout types.

use super::{PageLayout, Span};
use serde::{Deserialize, Serialize};

/// A PDF document reduced to its page layouts and metadata title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    /// Title from the document information dictionary, if any
    pub title: Option<String>,

    /// Pages in the document, in page order
    pub pages: Vec<PageLayout>,
}

impl LayoutDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the metadata title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&PageLayout> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: PageLayout) {
        self.pages.push(page);
    }

    /// Iterate over every span in page order.
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.pages.iter().flat_map(PageLayout::spans)
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
