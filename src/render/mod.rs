//! Rendering of outlines and analysis results.

mod json;
mod output;

pub use json::{to_json, JsonFormat};
pub use output::{
    timestamp_now, AnalysisOutput, ExtractedSection, OutputMetadata, SubsectionAnalysis,
    TIMESTAMP_FORMAT,
};
