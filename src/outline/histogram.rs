//! Character counts per text style, used to infer the body text size.

use std::collections::HashMap;

use crate::model::Span;

/// Histogram key: rounded font size and font name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyleKey {
    /// Font size rounded to a whole point
    pub size: i32,
    /// Font name
    pub font: String,
}

/// Accumulated character count per [`StyleKey`].
///
/// Built as a fold over every span of a document. Keys remember their
/// first-seen order so ties on the maximum resolve deterministically.
#[derive(Debug, Clone, Default)]
pub struct StyleHistogram {
    order: Vec<StyleKey>,
    counts: HashMap<StyleKey, usize>,
}

impl StyleHistogram {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold every span into a fresh histogram.
    pub fn from_spans<'a, I>(spans: I) -> Self
    where
        I: IntoIterator<Item = &'a Span>,
    {
        spans.into_iter().fold(Self::new(), Self::accumulate)
    }

    /// Add one span's character count and return the updated histogram.
    pub fn accumulate(mut self, span: &Span) -> Self {
        let key = StyleKey {
            size: span.rounded_size(),
            font: span.font.clone(),
        };
        let chars = span.text.chars().count();
        match self.counts.get_mut(&key) {
            Some(count) => *count += chars,
            None => {
                self.order.push(key.clone());
                self.counts.insert(key, chars);
            }
        }
        self
    }

    /// Accumulated count for a key.
    pub fn count(&self, size: i32, font: &str) -> usize {
        self.counts
            .get(&StyleKey {
                size,
                font: font.to_string(),
            })
            .copied()
            .unwrap_or(0)
    }

    /// Number of distinct styles seen.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if no span has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The style with the largest total; the first-seen key wins ties.
    pub fn dominant_style(&self) -> Option<&StyleKey> {
        let mut best: Option<(&StyleKey, usize)> = None;
        for key in &self.order {
            let count = self.counts[key];
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((key, count));
            }
        }
        best.map(|(key, _)| key)
    }

    /// Body text size, or `None` for a document without spans.
    pub fn body_size(&self) -> Option<i32> {
        self.dominant_style().map(|key| key.size)
    }
}
