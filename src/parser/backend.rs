//! Layout reader abstraction.
//!
//! Provides a trait-based interface for the page-layout capabilities the
//! outline builder needs, isolating the concrete PDF library (lopdf) from
//! outline reconstruction and ranking.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Document as LopdfDocument, ObjectId};

use crate::detect::pdf_version_from_bytes;
use crate::error::{Error, Result};
use crate::model::{LayoutDocument, PageLayout};

use super::layout::{decode_text_simple, PageAnalyzer};
use super::options::ParseOptions;

/// Abstract interface for reading a document's page layout.
///
/// A reader is a scoped resource: open one per document and drop it before
/// moving to the next.
pub trait LayoutReader {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Title from the document metadata, if present.
    fn title(&self) -> Option<String>;

    /// Blocks, lines and spans of a page (1-indexed).
    fn page_layout(&self, page_num: u32) -> Result<PageLayout>;

    /// Raw extracted text of a page (1-indexed).
    fn page_text(&self, page_num: u32) -> Result<String>;
}

/// Read every page of a document into a [`LayoutDocument`].
///
/// In lenient mode a page that fails to decode is logged and kept as an
/// empty page so page numbering stays intact.
pub fn read_layout<R: LayoutReader + ?Sized>(
    reader: &R,
    options: &ParseOptions,
) -> Result<LayoutDocument> {
    let mut document = LayoutDocument::new();
    document.title = reader.title();

    for page_num in 1..=reader.page_count() {
        let page = match reader.page_layout(page_num).and_then(|layout| {
            let text = reader.page_text(page_num)?;
            Ok(layout.with_text(text))
        }) {
            Ok(page) => page,
            Err(e) if options.is_lenient() => {
                log::warn!("Failed to read page {}: {}", page_num, e);
                PageLayout::letter(page_num)
            }
            Err(e) => return Err(e),
        };
        document.add_page(page);
    }

    Ok(document)
}

// ---------------------------------------------------------------------------
// LopdfReader: layout reader backed by lopdf
// ---------------------------------------------------------------------------

/// Concrete [`LayoutReader`] backed by `lopdf::Document`.
pub struct LopdfReader {
    doc: LopdfDocument,
    /// Page number to page object, resolved once at load
    pages: BTreeMap<u32, ObjectId>,
}

impl LopdfReader {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes(&data)
    }

    /// Load from an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        pdf_version_from_bytes(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        let pages = doc.get_pages();
        Ok(Self { doc, pages })
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    fn page_id(&self, page_num: u32) -> Result<ObjectId> {
        self.pages
            .get(&page_num)
            .copied()
            .ok_or(Error::PageOutOfRange(page_num, self.page_count()))
    }

    /// Get page dimensions from the MediaBox, defaulting to Letter.
    fn page_dimensions(&self, page_id: ObjectId) -> (f32, f32) {
        self.doc
            .get_dictionary(page_id)
            .ok()
            .and_then(|dict| dict.get(b"MediaBox").ok())
            .and_then(|media_box| media_box.as_array().ok())
            .filter(|array| array.len() >= 4)
            .map(|array| {
                let width = number(&array[2]).unwrap_or(612.0) - number(&array[0]).unwrap_or(0.0);
                let height = number(&array[3]).unwrap_or(792.0) - number(&array[1]).unwrap_or(0.0);
                (width, height)
            })
            .unwrap_or((612.0, 792.0))
    }
}

impl LayoutReader for LopdfReader {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn title(&self) -> Option<String> {
        let info_ref = self.doc.trailer.get(b"Info").ok()?.as_reference().ok()?;
        let info = self.doc.get_dictionary(info_ref).ok()?;
        get_string_from_dict(info, b"Title")
    }

    fn page_layout(&self, page_num: u32) -> Result<PageLayout> {
        let page_id = self.page_id(page_num)?;
        let (width, height) = self.page_dimensions(page_id);
        PageAnalyzer::new(&self.doc).analyze_page(page_num, page_id, width, height)
    }

    fn page_text(&self, page_num: u32) -> Result<String> {
        self.page_id(page_num)?;
        match self.doc.extract_text(&[page_num]) {
            Ok(text) => Ok(text),
            Err(e) => {
                log::debug!("lopdf text extraction failed on page {}: {}", page_num, e);
                self.page_layout(page_num)
                    .map(|layout| layout.layout_text())
                    .map_err(|_| Error::TextExtract(format!("Page {}: {}", page_num, e)))
            }
        }
    }
}

fn number(obj: &lopdf::Object) -> Option<f32> {
    match obj {
        lopdf::Object::Integer(i) => Some(*i as f32),
        lopdf::Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Helper to get a string from a PDF dictionary.
fn get_string_from_dict(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        lopdf::Object::String(bytes, _) => Some(decode_text_simple(bytes)),
        lopdf::Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, Line, Span};

    /// Reader over fixed pages; page 2 fails to decode.
    struct FlakyReader;

    impl LayoutReader for FlakyReader {
        fn page_count(&self) -> u32 {
            3
        }

        fn title(&self) -> Option<String> {
            Some("Flaky".to_string())
        }

        fn page_layout(&self, page_num: u32) -> Result<PageLayout> {
            if page_num == 2 {
                return Err(Error::PdfParse("bad stream".to_string()));
            }
            let mut page = PageLayout::letter(page_num);
            page.add_block(Block::new(vec![Line::new(vec![Span::new(
                "text", "F", 10.0, 0.0,
            )])]));
            Ok(page)
        }

        fn page_text(&self, page_num: u32) -> Result<String> {
            Ok(format!("page {}", page_num))
        }
    }

    #[test]
    fn test_read_layout_strict_propagates() {
        let result = read_layout(&FlakyReader, &ParseOptions::default());
        assert!(matches!(result, Err(Error::PdfParse(_))));
    }

    #[test]
    fn test_read_layout_lenient_keeps_numbering() {
        let doc = read_layout(&FlakyReader, &ParseOptions::new().lenient()).unwrap();
        assert_eq!(doc.page_count(), 3);
        assert_eq!(doc.title.as_deref(), Some("Flaky"));
        assert_eq!(doc.pages[1].number, 2);
        assert!(doc.pages[1].blocks.is_empty());
        assert_eq!(doc.pages[2].text, "page 3");
    }

    fn blank_pdf(pages: usize) -> Vec<u8> {
        use lopdf::{dictionary, Object};

        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let kids: Vec<Object> = (0..pages)
            .map(|_| {
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![0.into(), 0.into(), 300.into(), 400.into()],
                })
                .into()
            })
            .collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_page_map_resolved_at_load() {
        let reader = LopdfReader::from_bytes(&blank_pdf(3)).unwrap();
        assert_eq!(reader.pages.len(), 3);
        assert_eq!(reader.page_count(), 3);
        assert_eq!(reader.page_id(2).unwrap(), reader.pages[&2]);
        assert!(matches!(reader.page_id(0), Err(Error::PageOutOfRange(0, 3))));
        assert!(matches!(reader.page_id(4), Err(Error::PageOutOfRange(4, 3))));

        let layout = reader.page_layout(3).unwrap();
        assert_eq!(layout.number, 3);
        assert_eq!((layout.width, layout.height), (300.0, 400.0));
        assert!(layout.blocks.is_empty());
    }

    #[test]
    fn test_from_bytes_rejects_non_pdf() {
        let result = LopdfReader::from_bytes(b"not a pdf at all");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_get_string_from_dict_utf16() {
        let mut dict = lopdf::Dictionary::new();
        dict.set(
            "Title",
            lopdf::Object::String(
                vec![0xFE, 0xFF, 0x00, 0x4F, 0x00, 0x4B],
                lopdf::StringFormat::Literal,
            ),
        );
        assert_eq!(get_string_from_dict(&dict, b"Title"), Some("OK".to_string()));
        assert_eq!(get_string_from_dict(&dict, b"Author"), None);
    }
}
