//! Page-level layout types: spans, lines and blocks.

use serde::{Deserialize, Serialize};

/// Round a font size the way the style histogram keys it.
///
/// Halves round to the nearest even integer, so 10.5 and 11.5 land on
/// 10 and 12 respectively.
pub fn round_size(size: f32) -> i32 {
    size.round_ties_even() as i32
}

/// Gap between runs, as a fraction of the average character width, above
/// which a word space is assumed.
pub const SPACE_GAP_RATIO: f32 = 0.2;

/// A maximal run of text sharing one font and size within a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// The text content
    pub text: String,
    /// Font name (e.g., "Helvetica-Bold")
    pub font: String,
    /// Nominal font size in points
    pub size: f32,
    /// Top edge of the bounding box, measured down from the top of the page
    pub top: f32,
    /// Left edge in points
    #[serde(default)]
    pub x: f32,
    /// Advance width in points (0 when unknown)
    #[serde(default)]
    pub width: f32,
}

impl Span {
    /// Create a new span.
    pub fn new(text: impl Into<String>, font: impl Into<String>, size: f32, top: f32) -> Self {
        Self {
            text: text.into(),
            font: font.into(),
            size,
            top,
            x: 0.0,
            width: 0.0,
        }
    }

    /// Set the horizontal extent.
    pub fn with_extent(mut self, x: f32, width: f32) -> Self {
        self.x = x;
        self.width = width;
        self
    }

    /// Font size rounded to a whole point.
    pub fn rounded_size(&self) -> i32 {
        round_size(self.size)
    }

    /// Right edge in points.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Average character width, estimated from the font size when the
    /// advance width is unknown.
    pub fn avg_char_width(&self) -> f32 {
        let chars = self.text.chars().count();
        if chars > 0 && self.width > 0.0 {
            self.width / chars as f32
        } else {
            self.size * 0.5
        }
    }

    /// True when `next` starts far enough past this span's end to imply a
    /// word break. Spans without a known extent are always separated.
    pub fn needs_space_before(&self, next: &Span) -> bool {
        if self.text.ends_with(char::is_whitespace) || next.text.starts_with(char::is_whitespace) {
            return false;
        }
        if self.width <= 0.0 || next.width <= 0.0 {
            return true;
        }
        next.x - self.right() > next.avg_char_width() * SPACE_GAP_RATIO
    }
}

/// Spans sharing a visual baseline, in left-to-right order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// The spans in this line
    pub spans: Vec<Span>,
}

impl Line {
    /// Create a line from spans.
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    /// Span texts, with a space wherever the gap between spans implies one.
    pub fn text(&self) -> String {
        let mut result = String::new();
        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 && self.spans[i - 1].needs_space_before(span) {
                result.push(' ');
            }
            result.push_str(&span.text);
        }
        result
    }

    /// True when every span has the same font name and rounded size.
    ///
    /// An empty line is not uniform.
    pub fn has_uniform_style(&self) -> bool {
        let Some(first) = self.spans.first() else {
            return false;
        };
        self.spans
            .iter()
            .all(|s| s.font == first.font && s.rounded_size() == first.rounded_size())
    }

    /// Topmost span edge of the line.
    pub fn top(&self) -> f32 {
        self.spans
            .iter()
            .map(|s| s.top)
            .fold(f32::INFINITY, f32::min)
    }
}

/// A group of vertically adjacent lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// The lines in this block
    pub lines: Vec<Line>,
    /// Top edge of the block's bounding box
    pub top: f32,
}

impl Block {
    /// Create a block, deriving its top edge from its lines.
    pub fn new(lines: Vec<Line>) -> Self {
        let top = lines.iter().map(Line::top).fold(f32::INFINITY, f32::min);
        let top = if top.is_finite() { top } else { 0.0 };
        Self { lines, top }
    }

    /// Create a block with an explicit top edge.
    pub fn with_top(lines: Vec<Line>, top: f32) -> Self {
        Self { lines, top }
    }

    /// Lines joined with newlines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Layout and raw text of a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Text blocks on the page, in the order the reader produced them
    pub blocks: Vec<Block>,

    /// Raw extracted text of the page
    pub text: String,
}

impl PageLayout {
    /// Create an empty page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            blocks: Vec::new(),
            text: String::new(),
        }
    }

    /// Create an empty page with standard Letter size (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Add a block to the page.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Set the raw page text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Text rebuilt from the layout, one line per row, blocks separated by blank lines.
    pub fn layout_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Iterate over every span on the page.
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.blocks
            .iter()
            .flat_map(|b| b.lines.iter())
            .flat_map(|l| l.spans.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_size_ties_even() {
        assert_eq!(round_size(10.4), 10);
        assert_eq!(round_size(10.5), 10);
        assert_eq!(round_size(11.5), 12);
        assert_eq!(round_size(13.98), 14);
    }

    #[test]
    fn test_line_text_joins_with_spaces() {
        let line = Line::new(vec![
            Span::new("Data", "Arial", 12.0, 10.0),
            Span::new("Set", "Arial", 12.0, 10.0),
        ]);
        assert_eq!(line.text(), "Data Set");
    }

    #[test]
    fn test_line_text_uses_gaps_when_extent_known() {
        let touching = Line::new(vec![
            Span::new("Bold", "Arial-Bold", 10.0, 0.0).with_extent(72.0, 20.0),
            Span::new("face", "Arial", 10.0, 0.0).with_extent(92.0, 20.0),
        ]);
        assert_eq!(touching.text(), "Boldface");

        let apart = Line::new(vec![
            Span::new("Bold", "Arial-Bold", 10.0, 0.0).with_extent(72.0, 20.0),
            Span::new("face", "Arial", 10.0, 0.0).with_extent(95.0, 20.0),
        ]);
        assert_eq!(apart.text(), "Bold face");
    }

    #[test]
    fn test_uniform_style() {
        let uniform = Line::new(vec![
            Span::new("A", "Arial-Bold", 14.2, 0.0),
            Span::new("B", "Arial-Bold", 13.8, 0.0),
        ]);
        assert!(uniform.has_uniform_style());

        let mixed_font = Line::new(vec![
            Span::new("A", "Arial-Bold", 14.0, 0.0),
            Span::new("B", "Arial", 14.0, 0.0),
        ]);
        assert!(!mixed_font.has_uniform_style());

        let mixed_size = Line::new(vec![
            Span::new("A", "Arial", 14.0, 0.0),
            Span::new("B", "Arial", 10.0, 0.0),
        ]);
        assert!(!mixed_size.has_uniform_style());

        assert!(!Line::default().has_uniform_style());
    }

    #[test]
    fn test_block_top_from_lines() {
        let block = Block::new(vec![
            Line::new(vec![Span::new("second", "F", 10.0, 120.0)]),
            Line::new(vec![Span::new("first", "F", 10.0, 100.0)]),
        ]);
        assert_eq!(block.top, 100.0);
        assert_eq!(Block::new(vec![]).top, 0.0);
    }

    #[test]
    fn test_page_spans_and_layout_text() {
        let mut page = PageLayout::letter(1);
        page.add_block(Block::new(vec![
            Line::new(vec![Span::new("Hello", "F", 10.0, 50.0)]),
            Line::new(vec![Span::new("world", "F", 10.0, 62.0)]),
        ]));
        page.add_block(Block::new(vec![Line::new(vec![Span::new(
            "Again", "F", 10.0, 90.0,
        )])]));

        assert_eq!(page.spans().count(), 3);
        assert_eq!(page.layout_text(), "Hello\nworld\n\nAgain");
    }
}
