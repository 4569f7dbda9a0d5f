//! Document model types.
//!
//! Layout types (`Span`, `Line`, `Block`, `PageLayout`, `LayoutDocument`)
//! are what a layout reader produces; `Outline` and `Section` are what the
//! outline builder and section extractor derive from them.

mod document;
mod outline;
mod page;
mod section;

pub use document::LayoutDocument;
pub use outline::{HeadingCandidate, HeadingLevel, Outline};
pub use page::{round_size, Block, Line, PageLayout, Span};
pub use section::Section;
