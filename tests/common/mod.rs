//! Shared fixtures for integration tests.

#![allow(dead_code)]

use docrank::{Embedder, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Regular body font resource name.
pub const BODY: &str = "F1";
/// Bold heading font resource name.
pub const BOLD: &str = "F2";

/// One line of text: font resource, size in points, text.
pub type LineSpec<'a> = (&'a str, i64, &'a str);

/// Assemble a PDF in memory. Each page is a list of lines laid out top to
/// bottom on an A4 page, each line in its own text object.
pub fn build_pdf(title: Option<&str>, pages: &[Vec<LineSpec>]) -> Vec<u8> {
    let pages: Vec<Vec<Operation>> = pages.iter().map(|lines| line_operations(lines)).collect();
    build_pdf_from_operations(title, &pages)
}

/// One text object per line, starting near the top of the page.
pub fn line_operations(lines: &[LineSpec]) -> Vec<Operation> {
    let mut operations = Vec::new();
    let mut y = 780;
    for (font, size, text) in lines {
        y -= size * 2;
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec![(*font).into(), (*size).into()]));
        operations.push(Operation::new("Td", vec![72.into(), y.into()]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
        operations.push(Operation::new("ET", vec![]));
    }
    operations
}

/// Assemble a PDF in memory from raw content stream operations, one list
/// per page.
pub fn build_pdf_from_operations(title: Option<&str>, pages: &[Vec<Operation>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let body_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            BODY => body_id,
            BOLD => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in pages {
        let content = Content {
            operations: operations.clone(),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if let Some(title) = title {
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
        });
        doc.trailer.set("Info", info_id);
    }

    doc.compress();
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// A two-page chemistry handout with one heading per page.
pub fn kinetics_pdf() -> Vec<u8> {
    build_pdf(
        Some("Kinetics Handbook"),
        &[
            vec![
                (BOLD, 14, "Introduction"),
                (BODY, 10, "Chemical kinetics studies how fast reactions proceed"),
                (BODY, 10, "and which factors change the speed of a transformation"),
                (BODY, 10, "such as temperature, pressure and the catalyst used here"),
            ],
            vec![
                (BOLD, 12, "Reaction Mechanisms"),
                (BODY, 10, "A mechanism is the sequence of elementary steps that"),
                (BODY, 10, "together explain the overall rate law observed in the lab"),
                (BODY, 10, "and the intermediates detected along the reaction path"),
            ],
        ],
    )
}

/// Embeds text as counts of a fixed vocabulary of marker words.
pub struct MarkerEmbedder {
    pub vocabulary: Vec<&'static str>,
}

impl MarkerEmbedder {
    pub fn new(vocabulary: &[&'static str]) -> Self {
        Self {
            vocabulary: vocabulary.to_vec(),
        }
    }
}

impl Embedder for MarkerEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| {
                let t = t.to_lowercase();
                let mut v: Vec<f32> = self
                    .vocabulary
                    .iter()
                    .map(|w| t.matches(w).count() as f32)
                    .collect();
                // keeps every vector non-zero
                v.push(0.01);
                v
            })
            .collect())
    }

    fn dimensions(&self) -> usize {
        self.vocabulary.len() + 1
    }
}
