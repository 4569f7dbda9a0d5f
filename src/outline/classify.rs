//! Heading level classification from font size and weight.

use crate::model::HeadingLevel;

/// Font-name fragments that mark a heavy (or slanted) face.
pub const BOLD_MARKERS: &[&str] = &["bold", "black", "heavy", "oblique"];

/// One classification threshold: `size > ratio * body` (and bold, if required).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeRule {
    pub ratio: f64,
    pub requires_bold: bool,
    pub level: HeadingLevel,
}

/// Thresholds in evaluation order; the first match wins.
///
/// The ranges overlap, so the order is part of the contract.
pub const SIZE_RULES: [SizeRule; 5] = [
    SizeRule {
        ratio: 1.30,
        requires_bold: false,
        level: HeadingLevel::H1,
    },
    SizeRule {
        ratio: 1.20,
        requires_bold: true,
        level: HeadingLevel::H1,
    },
    SizeRule {
        ratio: 1.15,
        requires_bold: false,
        level: HeadingLevel::H2,
    },
    SizeRule {
        ratio: 1.05,
        requires_bold: true,
        level: HeadingLevel::H2,
    },
    SizeRule {
        ratio: 1.0,
        requires_bold: true,
        level: HeadingLevel::H3,
    },
];

/// Case-insensitive check of a font name against [`BOLD_MARKERS`].
pub fn is_bold(font: &str) -> bool {
    let font = font.to_lowercase();
    BOLD_MARKERS.iter().any(|marker| font.contains(marker))
}

/// Map a text style to a heading level, or `None` for body-like text.
pub fn classify(size: f64, font: &str, body_size: f64) -> Option<HeadingLevel> {
    let bold = is_bold(font);
    SIZE_RULES
        .iter()
        .find(|rule| size > body_size * rule.ratio && (bold || !rule.requires_bold))
        .map(|rule| rule.level)
}
