//! Heuristic filter rejecting strings that do not look like headings.

use std::sync::OnceLock;

use regex::Regex;

/// Bibliographic and boilerplate markers that disqualify a heading.
pub const DEFAULT_DENYLIST: &[&str] = &[
    "et al",
    "copyright",
    "journal of",
    "figure",
    "table",
    "supplementary",
    "author",
    "university",
    "abstract",
    "keywords",
    "references",
    "acknowledgements",
    "appendix",
    "open access",
];

const MONTHS: &str = "jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec|january|february|march|april|june|july|august|september|october|november|december";

fn date_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"(?i)\b\d{{1,4}}[\s,./-]*\b(?:{m})\b|\b(?:{m})\b[\s,./-]*\d{{1,4}}\b",
            m = MONTHS
        ))
        .unwrap()
    })
}

fn word_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[a-zA-Z]{4,}\b").unwrap())
}

/// Rules a cleaned line must satisfy to count as a heading.
///
/// Every check is a necessary condition; the denylist is swappable.
#[derive(Debug, Clone)]
pub struct HeadingRules {
    /// Minimum length in characters
    pub min_len: usize,
    /// Maximum length in characters
    pub max_len: usize,
    /// Lowercase substrings that reject a candidate
    pub denylist: Vec<String>,
}

impl Default for HeadingRules {
    fn default() -> Self {
        Self {
            min_len: 4,
            max_len: 150,
            denylist: DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl HeadingRules {
    /// Replace the denylist.
    pub fn with_denylist<I, S>(mut self, denylist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.denylist = denylist.into_iter().map(Into::into).collect();
        self
    }

    /// Check whether `text` passes every heading rule.
    pub fn accepts(&self, text: &str) -> bool {
        let len = text.chars().count();
        if len < self.min_len || len > self.max_len {
            return false;
        }
        if text.ends_with(['.', ':', ',']) {
            return false;
        }
        if !text.chars().next().is_some_and(char::is_alphanumeric) {
            return false;
        }
        if date_pattern().is_match(text) {
            return false;
        }
        if !word_pattern().is_match(text) {
            return false;
        }

        let lower = text.to_lowercase();
        !self.denylist.iter().any(|marker| lower.contains(marker.as_str()))
    }
}

/// Check a string against the default heading rules.
pub fn is_heading(text: &str) -> bool {
    HeadingRules::default().accepts(text)
}
