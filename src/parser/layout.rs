//! Layout analysis for PDF pages.
//!
//! Decodes a page's content stream into positioned text runs, groups runs
//! sharing a baseline into lines, and groups vertically adjacent lines into
//! blocks. Reading order is plain top-to-bottom; columns are not detected.

use std::collections::{BTreeMap, HashMap};

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{Block, Line, PageLayout, Span};

/// Fraction of the font size above the baseline treated as the ascender.
const ASCENT_RATIO: f32 = 0.8;

/// Advance of a glyph, in em, when the font carries no widths.
const DEFAULT_GLYPH_WIDTH: f32 = 0.5;

/// A decoded text run in PDF user space (origin bottom-left).
#[derive(Debug, Clone)]
struct RawSpan {
    text: String,
    x: f32,
    /// Baseline
    y: f32,
    /// Horizontal advance of the shown string
    width: f32,
    size: f32,
    font: String,
}

/// Positioned line, kept until blocks are formed.
#[derive(Debug, Clone)]
struct RawLine {
    spans: Vec<RawSpan>,
    y: f32,
    x: f32,
    size: f32,
}

impl RawLine {
    fn from_spans(mut spans: Vec<RawSpan>) -> Self {
        spans.sort_by(|a, b| a.x.total_cmp(&b.x));

        // Dominant size weighted by text length
        let total_chars: usize = spans.iter().map(|s| s.text.len()).sum();
        let weighted: f32 = spans.iter().map(|s| s.size * s.text.len() as f32).sum();
        let size = if total_chars > 0 {
            weighted / total_chars as f32
        } else {
            spans.first().map(|s| s.size).unwrap_or(0.0)
        };

        let y = spans.first().map(|s| s.y).unwrap_or(0.0);
        let x = spans.first().map(|s| s.x).unwrap_or(0.0);
        Self { spans, y, x, size }
    }
}

/// Page layout analyzer over a loaded `lopdf` document.
pub struct PageAnalyzer<'a> {
    doc: &'a LopdfDocument,
}

impl<'a> PageAnalyzer<'a> {
    /// Create a new analyzer.
    pub fn new(doc: &'a LopdfDocument) -> Self {
        Self { doc }
    }

    /// Build the layout of one page. The raw `text` field is left empty.
    pub fn analyze_page(
        &self,
        page_num: u32,
        page_id: ObjectId,
        width: f32,
        height: f32,
    ) -> Result<PageLayout> {
        let spans = self.extract_spans(page_id)?;
        let lines = group_spans_into_lines(spans);
        let blocks = group_lines_into_blocks(lines, height);

        let mut page = PageLayout::new(page_num, width, height);
        page.blocks = blocks;
        Ok(page)
    }

    /// Decode the positioned text runs of a page.
    fn extract_spans(&self, page_id: ObjectId) -> Result<Vec<RawSpan>> {
        let lopdf_fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut base_fonts = HashMap::new();
        let mut metrics = HashMap::new();
        for (name, font) in &lopdf_fonts {
            let base_font = font
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            base_fonts.insert(name.clone(), base_font);
            if let Some(m) = FontMetrics::from_font(self.doc, font) {
                metrics.insert(name.clone(), m);
            }
        }

        let content = self.page_content(page_id)?;
        let fonts = PageFonts {
            base_fonts: &base_fonts,
            metrics: &metrics,
            dicts: &lopdf_fonts,
        };
        self.decode_spans(&content, &fonts)
    }

    /// Get the decompressed page content stream.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            // A page without a content stream is blank
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    return s
                        .decompressed_content()
                        .or_else(|_| Ok(s.content.clone()));
                }
                Err(Error::PdfParse("Invalid content stream".to_string()))
            }
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            if let Ok(data) = s.decompressed_content() {
                                content.extend_from_slice(&data);
                                content.push(b' ');
                            }
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    /// Walk the content stream operators, emitting one run per shown string.
    ///
    /// The text matrix advances by each string's width, so consecutive
    /// show operators land side by side.
    fn decode_spans(&self, content: &[u8], fonts: &PageFonts) -> Result<Vec<RawSpan>> {
        if content.is_empty() {
            return Ok(Vec::new());
        }
        let content =
            lopdf::content::Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut spans = Vec::new();
        let mut state = TextState::default();

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    state.in_text = true;
                    state.matrix = TextMatrix::default();
                    state.line_matrix = TextMatrix::default();
                }
                "ET" => {
                    state.in_text = false;
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(font_name) = &op.operands[0] {
                            state.font_key = font_name.clone();
                            state.font = fonts
                                .base_fonts
                                .get(font_name.as_slice())
                                .cloned()
                                .unwrap_or_else(|| String::from_utf8_lossy(font_name).to_string());
                        }
                        state.font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(leading) = op.operands.first().and_then(get_number) {
                        state.leading = leading;
                    }
                }
                "Tc" => {
                    if let Some(spacing) = op.operands.first().and_then(get_number) {
                        state.char_spacing = spacing;
                    }
                }
                "Tw" => {
                    if let Some(spacing) = op.operands.first().and_then(get_number) {
                        state.word_spacing = spacing;
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                        if op.operator == "TD" {
                            state.leading = -ty;
                        }
                        state.line_matrix.translate(tx, ty);
                        state.matrix = state.line_matrix.clone();
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        state.line_matrix.set(
                            get_number(&op.operands[0]).unwrap_or(1.0),
                            get_number(&op.operands[1]).unwrap_or(0.0),
                            get_number(&op.operands[2]).unwrap_or(0.0),
                            get_number(&op.operands[3]).unwrap_or(1.0),
                            get_number(&op.operands[4]).unwrap_or(0.0),
                            get_number(&op.operands[5]).unwrap_or(0.0),
                        );
                        state.matrix = state.line_matrix.clone();
                    }
                }
                "T*" => {
                    state.next_line();
                }
                "Tj" | "TJ" | "'" | "\"" => {
                    if op.operator == "\"" && op.operands.len() >= 3 {
                        state.word_spacing = get_number(&op.operands[0]).unwrap_or(0.0);
                        state.char_spacing = get_number(&op.operands[1]).unwrap_or(0.0);
                    }
                    if matches!(op.operator.as_str(), "'" | "\"") {
                        state.next_line();
                    }
                    if !state.in_text {
                        continue;
                    }

                    let operand = match op.operator.as_str() {
                        "\"" => op.operands.get(2),
                        _ => op.operands.first(),
                    };
                    let (text, advance) = match operand {
                        Some(Object::Array(items)) => self.decode_array(items, &state, fonts),
                        Some(Object::String(bytes, _)) => self.show_string(bytes, &state, fonts),
                        _ => (String::new(), 0.0),
                    };

                    let (x, y) = state.matrix.position();
                    state.matrix.translate(advance, 0.0);
                    if !text.trim().is_empty() {
                        let width = (state.matrix.position().0 - x).max(0.0);
                        spans.push(RawSpan {
                            text,
                            x,
                            y,
                            width,
                            size: state.font_size * state.matrix.scale(),
                            font: state.font.clone(),
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }

    /// Decode a `TJ` array, turning large negative kerning into word spaces.
    ///
    /// Returns the text and its advance in unscaled text space.
    fn decode_array(&self, items: &[Object], state: &TextState, fonts: &PageFonts) -> (String, f32) {
        // Adjustments are in 1/1000 text space units; ~200 marks a word gap
        const SPACE_THRESHOLD: f32 = 200.0;

        let mut combined = String::new();
        let mut advance = 0.0;
        for item in items {
            match item {
                Object::String(bytes, _) => {
                    let (text, width) = self.show_string(bytes, state, fonts);
                    combined.push_str(&text);
                    advance += width;
                }
                Object::Integer(_) | Object::Real(_) => {
                    let adjustment = -get_number(item).unwrap_or(0.0);
                    advance += adjustment / 1000.0 * state.font_size;
                    if adjustment > SPACE_THRESHOLD
                        && !combined.is_empty()
                        && !combined.ends_with(' ')
                    {
                        combined.push(' ');
                    }
                }
                _ => {}
            }
        }
        (combined, advance)
    }

    /// Decode a shown string and measure its advance in unscaled text space.
    fn show_string(&self, bytes: &[u8], state: &TextState, fonts: &PageFonts) -> (String, f32) {
        let text = self.decode_bytes(bytes, state, fonts);

        let (glyphs, glyph_count) = match fonts.metrics.get(&state.font_key) {
            Some(metrics) => (metrics.advance(bytes), bytes.len()),
            None => {
                let count = text.chars().count();
                (count as f32 * DEFAULT_GLYPH_WIDTH, count)
            }
        };
        let spaces = bytes.iter().filter(|&&b| b == b' ').count();

        let advance = glyphs * state.font_size
            + state.char_spacing * glyph_count as f32
            + state.word_spacing * spaces as f32;
        (text, advance)
    }

    /// Decode a shown string with the current font's encoding.
    fn decode_bytes(&self, bytes: &[u8], state: &TextState, fonts: &PageFonts) -> String {
        let encoding = fonts
            .dicts
            .get(&state.font_key)
            .and_then(|f| f.get_font_encoding(self.doc).ok());

        match encoding {
            Some(enc) => LopdfDocument::decode_text(&enc, bytes)
                .unwrap_or_else(|_| decode_text_simple(bytes)),
            None => decode_text_simple(bytes),
        }
    }
}

/// Font lookups for one page, keyed by resource name.
struct PageFonts<'a> {
    base_fonts: &'a HashMap<Vec<u8>, String>,
    metrics: &'a HashMap<Vec<u8>, FontMetrics>,
    dicts: &'a BTreeMap<Vec<u8>, &'a lopdf::Dictionary>,
}

/// Glyph widths of a simple (single-byte) font.
#[derive(Debug, Clone)]
struct FontMetrics {
    first_char: u32,
    /// Widths in 1/1000 em, indexed from `first_char`
    widths: Vec<f32>,
    missing_width: f32,
}

impl FontMetrics {
    /// Read `FirstChar`/`Widths`. Composite and width-less fonts yield `None`.
    fn from_font(doc: &LopdfDocument, font: &lopdf::Dictionary) -> Option<Self> {
        let subtype = font.get(b"Subtype").ok().and_then(|o| o.as_name().ok());
        if subtype == Some(b"Type0".as_slice()) {
            return None;
        }
        let first_char = font.get(b"FirstChar").ok().and_then(get_number)? as u32;
        let widths = match font.get(b"Widths").ok()? {
            Object::Reference(r) => doc.get_object(*r).ok()?,
            other => other,
        };
        let widths: Vec<f32> = widths
            .as_array()
            .ok()?
            .iter()
            .map(|w| get_number(w).unwrap_or(0.0))
            .collect();

        let missing_width = font
            .get(b"FontDescriptor")
            .ok()
            .and_then(|d| match d {
                Object::Reference(r) => doc.get_dictionary(*r).ok(),
                Object::Dictionary(d) => Some(d),
                _ => None,
            })
            .and_then(|d| d.get(b"MissingWidth").ok())
            .and_then(get_number)
            .unwrap_or(DEFAULT_GLYPH_WIDTH * 1000.0);

        Some(Self {
            first_char,
            widths,
            missing_width,
        })
    }

    /// Total advance of the codes in `bytes`, in em.
    fn advance(&self, bytes: &[u8]) -> f32 {
        bytes
            .iter()
            .map(|&code| {
                (code as u32)
                    .checked_sub(self.first_char)
                    .and_then(|i| self.widths.get(i as usize))
                    .copied()
                    .filter(|w| *w > 0.0)
                    .unwrap_or(self.missing_width)
            })
            .sum::<f32>()
            / 1000.0
    }
}

/// Group spans into lines by baseline, top to bottom.
fn group_spans_into_lines(mut spans: Vec<RawSpan>) -> Vec<RawLine> {
    if spans.is_empty() {
        return vec![];
    }

    // PDF Y grows upward: sort by Y descending, then X
    spans.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut lines = Vec::new();
    let mut current: Vec<RawSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.size * 0.3;
        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(RawLine::from_spans(std::mem::take(&mut current)));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }
    if !current.is_empty() {
        lines.push(RawLine::from_spans(current));
    }

    lines
}

/// Group lines into blocks based on spacing, size and indentation changes.
fn group_lines_into_blocks(lines: Vec<RawLine>, page_height: f32) -> Vec<Block> {
    if lines.is_empty() {
        return vec![];
    }

    let avg_spacing = average_line_spacing(&lines);
    let mut blocks = Vec::new();
    let mut current: Vec<RawLine> = Vec::new();

    for line in lines {
        if let Some(prev) = current.last() {
            if should_break_block(prev, &line, avg_spacing) {
                blocks.push(to_block(std::mem::take(&mut current), page_height));
            }
        }
        current.push(line);
    }
    if !current.is_empty() {
        blocks.push(to_block(current, page_height));
    }

    blocks
}

fn average_line_spacing(lines: &[RawLine]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[0].y - w[1].y).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return 12.0;
    }
    spacings.iter().sum::<f32>() / spacings.len() as f32
}

fn should_break_block(prev: &RawLine, curr: &RawLine, avg_spacing: f32) -> bool {
    let spacing = (prev.y - curr.y).abs();
    spacing > avg_spacing * 1.5
        || (prev.size - curr.size).abs() > 1.0
        || (prev.x - curr.x).abs() > 20.0
}

/// Convert positioned lines into model lines with top-relative coordinates.
fn to_block(lines: Vec<RawLine>, page_height: f32) -> Block {
    let lines = lines
        .into_iter()
        .map(|line| {
            let spans = line
                .spans
                .into_iter()
                .map(|s| {
                    let top = page_height - (s.y + s.size * ASCENT_RATIO);
                    Span::new(s.text, s.font, s.size, top).with_extent(s.x, s.width)
                })
                .collect();
            Line::new(merge_runs(spans))
        })
        .collect();
    Block::new(lines)
}

/// Merge adjacent spans of one line that share font and rounded size into
/// a single run, inserting a space only where the gap implies a word break.
///
/// Spans must be in left-to-right order.
fn merge_runs(spans: Vec<Span>) -> Vec<Span> {
    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        let Some(prev) = merged.last_mut() else {
            merged.push(span);
            continue;
        };
        if prev.font != span.font || prev.rounded_size() != span.rounded_size() {
            merged.push(span);
            continue;
        }

        // Overprinted duplicate (fake bold, shadow text)
        if prev.text == span.text && (span.x - prev.x).abs() < prev.avg_char_width() {
            continue;
        }

        if prev.needs_space_before(&span) {
            prev.text.push(' ');
        }
        prev.text.push_str(&span.text);
        prev.width = (span.right() - prev.x).max(prev.width);
        prev.top = prev.top.min(span.top);
    }
    merged
}

/// Text state carried across content stream operators.
#[derive(Debug, Clone)]
struct TextState {
    in_text: bool,
    font_key: Vec<u8>,
    font: String,
    font_size: f32,
    leading: f32,
    char_spacing: f32,
    word_spacing: f32,
    /// Current position, advanced by shown text
    matrix: TextMatrix,
    /// Start of the current line
    line_matrix: TextMatrix,
}

impl TextState {
    fn next_line(&mut self) {
        self.line_matrix.next_line(self.leading);
        self.matrix = self.line_matrix.clone();
    }
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            in_text: false,
            font_key: Vec::new(),
            font: String::new(),
            font_size: 12.0,
            leading: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            matrix: TextMatrix::default(),
            line_matrix: TextMatrix::default(),
        }
    }
}

/// Text matrix for tracking position in content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32, // X translation
    f: f32, // Y translation
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self, leading: f32) {
        self.translate(0.0, -leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Helper to extract number from PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Simple text decoding fallback when no encoding is available.
pub(crate) fn decode_text_simple(bytes: &[u8]) -> String {
    // Try UTF-16BE first (BOM marker)
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Fallback: Latin-1
    bytes.iter().map(|&b| b as char).collect()
}
