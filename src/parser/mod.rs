//! PDF layout reading module.

mod backend;
mod layout;
mod options;

pub use backend::{read_layout, LayoutReader, LopdfReader};
pub use layout::PageAnalyzer;
pub use options::{ErrorMode, ParseOptions};
