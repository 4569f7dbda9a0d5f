//! Outline reconstruction from page layout.

use std::collections::HashSet;

use crate::model::{Block, HeadingCandidate, LayoutDocument, Outline};

use super::classify::classify;
use super::histogram::StyleHistogram;
use super::normalize::clean;
use super::validate::HeadingRules;

/// Title used when neither metadata nor headings provide one.
pub const UNTITLED: &str = "Untitled";

/// Builds a title and heading outline from layout signals alone.
#[derive(Debug, Clone, Default)]
pub struct OutlineBuilder {
    rules: HeadingRules,
}

impl OutlineBuilder {
    /// Create a builder with the default heading rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom heading rules.
    pub fn with_rules(mut self, rules: HeadingRules) -> Self {
        self.rules = rules;
        self
    }

    /// Reconstruct the outline of a document.
    pub fn build(&self, doc: &LayoutDocument) -> Outline {
        let metadata_title = doc.title.as_deref().map(clean).unwrap_or_default();

        let histogram = StyleHistogram::from_spans(doc.spans());
        let Some(body_size) = histogram.body_size() else {
            log::debug!("No text spans found; outline is empty");
            return Outline::empty(non_empty_or(metadata_title, UNTITLED));
        };
        log::debug!("Body size: {}pt", body_size);

        let mut entries = Vec::new();
        let mut seen = HashSet::new();

        for page in &doc.pages {
            let mut blocks: Vec<&Block> = page.blocks.iter().collect();
            blocks.sort_by(|a, b| a.top.total_cmp(&b.top));

            for line in blocks.iter().flat_map(|b| b.lines.iter()) {
                if !line.has_uniform_style() {
                    continue;
                }

                let text = clean(&line.text());
                if !self.rules.accepts(&text) {
                    continue;
                }

                let key = text.to_lowercase();
                if seen.contains(&key) {
                    continue;
                }

                let style = &line.spans[0];
                let Some(level) = classify(
                    f64::from(style.rounded_size()),
                    &style.font,
                    f64::from(body_size),
                ) else {
                    continue;
                };

                log::debug!("{} on page {}: {}", level, page.number, text);
                seen.insert(key);
                entries.push(HeadingCandidate::new(level, text, page.number));
            }
        }

        let title = if !metadata_title.is_empty() {
            metadata_title
        } else {
            entries
                .first()
                .map(|e| e.text.clone())
                .unwrap_or_else(|| UNTITLED.to_string())
        };

        Outline { title, entries }
    }
}

/// Reconstruct an outline with the default rules.
pub fn build_outline(doc: &LayoutDocument) -> Outline {
    OutlineBuilder::new().build(doc)
}

fn non_empty_or(text: String, fallback: &str) -> String {
    if text.is_empty() {
        fallback.to_string()
    } else {
        text
    }
}
