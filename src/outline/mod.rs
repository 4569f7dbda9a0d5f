//! Outline reconstruction from page-layout signals.
//!
//! The pipeline is: a style histogram over every span yields the body text
//! size; each uniformly styled line is cleaned, validated and classified
//! against that size; accepted lines become outline entries.

mod builder;
mod classify;
mod histogram;
mod normalize;
mod validate;

pub use builder::{build_outline, OutlineBuilder, UNTITLED};
pub use classify::{classify, is_bold, SizeRule, BOLD_MARKERS, SIZE_RULES};
pub use histogram::{StyleHistogram, StyleKey};
pub use normalize::{clean, LIGATURES};
pub use validate::{is_heading, HeadingRules, DEFAULT_DENYLIST};
