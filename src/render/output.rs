//! Analysis output document.

use serde::{Deserialize, Serialize};

use crate::model::Section;
use crate::persona::{JobToBeDone, Persona, PersonaInput};

/// Timestamp format: `YYYY-MM-DDTHH:MM:SS.ffffffZ`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Current UTC time in [`TIMESTAMP_FORMAT`].
pub fn timestamp_now() -> String {
    chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Run metadata echoed into the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputMetadata {
    /// Every document considered, including those that contributed nothing
    pub input_documents: Vec<String>,
    pub persona: Persona,
    pub job_to_be_done: JobToBeDone,
    pub processing_timestamp: String,
}

/// One ranked section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSection {
    pub document: String,
    pub page_number: u32,
    pub section_title: String,
    /// 1-based position in the global ranking
    pub importance_rank: usize,
}

/// Refined snippet for one of the top sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsectionAnalysis {
    pub document: String,
    pub page_number: u32,
    pub refined_text: String,
}

/// Result of ranking a document collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutput {
    pub metadata: OutputMetadata,
    pub extracted_section: Vec<ExtractedSection>,
    #[serde(rename = "sub-section_analysis")]
    pub subsection_analysis: Vec<SubsectionAnalysis>,
}

impl AnalysisOutput {
    /// Output with metadata and no sections yet.
    pub fn new(input_documents: Vec<String>, input: &PersonaInput) -> Self {
        Self {
            metadata: OutputMetadata {
                input_documents,
                persona: input.persona.clone(),
                job_to_be_done: input.job_to_be_done.clone(),
                processing_timestamp: timestamp_now(),
            },
            extracted_section: Vec::new(),
            subsection_analysis: Vec::new(),
        }
    }

    /// Append ranked sections; ranks continue from the current length.
    pub fn push_ranked(&mut self, sections: &[Section]) {
        let offset = self.extracted_section.len();
        self.extracted_section
            .extend(sections.iter().enumerate().map(|(i, s)| ExtractedSection {
                document: s.document.clone(),
                page_number: s.start_page,
                section_title: s.title.clone(),
                importance_rank: offset + i + 1,
            }));
    }

    /// Append the snippet of a section.
    pub fn push_snippet(&mut self, section: &Section, refined_text: impl Into<String>) {
        self.subsection_analysis.push(SubsectionAnalysis {
            document: section.document.clone(),
            page_number: section.start_page,
            refined_text: refined_text.into(),
        });
    }
}
