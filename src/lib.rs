//! # docrank
//!
//! Persona-driven section ranking for PDF collections.
//!
//! This library reconstructs a heading outline for each PDF from layout
//! signals alone (font size, weight and position), splits documents into
//! sections along that outline, and ranks every section of the collection
//! against a persona's task with sentence embeddings.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docrank::{outline_file, render, JsonFormat};
//!
//! fn main() -> docrank::Result<()> {
//!     // Reconstruct the outline of a PDF file
//!     let outline = outline_file("document.pdf")?;
//!     println!("{}", render::to_json(&outline, JsonFormat::Pretty)?);
//!
//!     Ok(())
//! }
//! ```
//!
//! Ranking needs an [`Embedder`]; enable the `candle` feature for a local
//! MiniLM model, or bring your own implementation.
//!
//! ## Features
//!
//! - **Outline reconstruction**: title and H1/H2/H3 headings without a PDF table of contents
//! - **Section extraction**: page ranges between consecutive headings
//! - **Relevance ranking**: embedding similarity plus title keyword weighting
//! - **Snippets**: the most query-relevant sentence of each top section
//! - **Deterministic output**: sorted inputs and stable ordering

pub mod detect;
pub mod embed;
pub mod error;
pub mod model;
pub mod outline;
pub mod parser;
pub mod persona;
pub mod rank;
pub mod render;

// Re-export commonly used types
pub use detect::{collect_pdfs, is_pdf_bytes, pdf_version_from_bytes, pdf_version_from_path};
pub use embed::{cosine_similarity, Embedder};
pub use error::{Error, Result};
pub use model::{
    Block, HeadingCandidate, HeadingLevel, LayoutDocument, Line, Outline, PageLayout, Section,
    Span,
};
pub use outline::{build_outline, clean, HeadingRules, OutlineBuilder};
pub use parser::{ErrorMode, LayoutReader, LopdfReader, ParseOptions};
pub use persona::{JobToBeDone, Persona, PersonaInput};
pub use rank::{KeywordTable, RankOptions, Ranker, RelevanceScorer, SnippetSelector};
pub use render::{AnalysisOutput, JsonFormat};

#[cfg(feature = "candle")]
pub use embed::MiniLmEmbedder;

use std::path::Path;

/// Read the page layout of a PDF file.
///
/// # Example
///
/// ```no_run
/// use docrank::read_file;
///
/// let doc = read_file("document.pdf").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<LayoutDocument> {
    read_file_with_options(path, &ParseOptions::default())
}

/// Read the page layout of a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use docrank::{read_file_with_options, ParseOptions};
///
/// let options = ParseOptions::new().lenient();
/// let doc = read_file_with_options("document.pdf", &options).unwrap();
/// ```
pub fn read_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &ParseOptions,
) -> Result<LayoutDocument> {
    let reader = LopdfReader::open(path)?;
    parser::read_layout(&reader, options)
}

/// Read the page layout of a PDF held in memory.
pub fn read_bytes(data: &[u8]) -> Result<LayoutDocument> {
    let reader = LopdfReader::from_bytes(data)?;
    parser::read_layout(&reader, &ParseOptions::default())
}

/// Reconstruct the outline of a PDF file.
///
/// # Example
///
/// ```no_run
/// use docrank::outline_file;
///
/// let outline = outline_file("document.pdf").unwrap();
/// for entry in &outline.entries {
///     println!("{} {} (p. {})", entry.level, entry.text, entry.page);
/// }
/// ```
pub fn outline_file<P: AsRef<Path>>(path: P) -> Result<Outline> {
    let doc = read_file(path)?;
    Ok(build_outline(&doc))
}

/// Reconstruct the outline of a PDF held in memory.
pub fn outline_bytes(data: &[u8]) -> Result<Outline> {
    let doc = read_bytes(data)?;
    Ok(build_outline(&doc))
}

/// Rank every PDF in a directory for a persona.
///
/// Files are discovered with [`collect_pdfs`] and processed in file-name
/// order.
///
/// # Example
///
/// ```no_run
/// use docrank::{rank_directory, Embedder, PersonaInput, RankOptions};
///
/// fn run(embedder: &dyn Embedder) -> docrank::Result<()> {
///     let input = PersonaInput::from_path("input/persona.json")?;
///     let output = rank_directory("input", &input, embedder, RankOptions::default())?;
///     println!("{} sections ranked", output.extracted_section.len());
///     Ok(())
/// }
/// ```
pub fn rank_directory<P: AsRef<Path>>(
    dir: P,
    input: &PersonaInput,
    embedder: &dyn Embedder,
    options: RankOptions,
) -> Result<AnalysisOutput> {
    let paths = collect_pdfs(dir)?;
    log::info!("Found {} PDF files", paths.len());
    Ranker::with_options(embedder, options).rank_paths(&paths, input)
}
