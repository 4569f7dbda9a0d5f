//! Batch ranking over a document collection.

use std::path::{Path, PathBuf};

use crate::detect::file_name;
use crate::embed::Embedder;
use crate::error::{Error, Result};
use crate::model::{LayoutDocument, Section};
use crate::outline::{HeadingRules, OutlineBuilder};
use crate::parser::{read_layout, LopdfReader, ParseOptions};
use crate::persona::PersonaInput;
use crate::render::AnalysisOutput;

use super::scorer::{rank_sections, KeywordTable, RelevanceScorer};
use super::sections::extract_sections;
use super::snippet::SnippetSelector;

/// Options for a ranking run.
#[derive(Debug, Clone)]
pub struct RankOptions {
    /// Number of top sections that receive a refined snippet
    pub top_k: usize,
    /// Document reading options, including the error mode
    pub parse: ParseOptions,
    /// Title keywords that adjust scores
    pub keywords: KeywordTable,
    /// Heading validation rules for outline reconstruction
    pub heading_rules: HeadingRules,
    /// Snippet selection thresholds
    pub snippet: SnippetSelector,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            top_k: 10,
            parse: ParseOptions::default(),
            keywords: KeywordTable::default(),
            heading_rules: HeadingRules::default(),
            snippet: SnippetSelector::default(),
        }
    }
}

impl RankOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of sections that get a snippet.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set document reading options.
    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    /// Skip unreadable documents instead of aborting.
    pub fn lenient(mut self) -> Self {
        self.parse = self.parse.lenient();
        self
    }

    /// Set the scoring keyword table.
    pub fn with_keywords(mut self, keywords: KeywordTable) -> Self {
        self.keywords = keywords;
        self
    }

    /// Set heading validation rules.
    pub fn with_heading_rules(mut self, rules: HeadingRules) -> Self {
        self.heading_rules = rules;
        self
    }

    /// Set snippet selection thresholds.
    pub fn with_snippet(mut self, snippet: SnippetSelector) -> Self {
        self.snippet = snippet;
        self
    }
}

/// Ranks the sections of a document collection for a persona.
///
/// Documents are processed one at a time in the given order. The embedder
/// is borrowed for the whole run and called sequentially.
pub struct Ranker<'e> {
    embedder: &'e dyn Embedder,
    options: RankOptions,
    outline: OutlineBuilder,
    scorer: RelevanceScorer,
}

impl<'e> Ranker<'e> {
    /// Create a ranker with default options.
    pub fn new(embedder: &'e dyn Embedder) -> Self {
        Self::with_options(embedder, RankOptions::default())
    }

    /// Create a ranker with custom options.
    pub fn with_options(embedder: &'e dyn Embedder, options: RankOptions) -> Self {
        Self {
            embedder,
            outline: OutlineBuilder::new().with_rules(options.heading_rules.clone()),
            scorer: RelevanceScorer::with_keywords(options.keywords.clone()),
            options,
        }
    }

    /// Get the options.
    pub fn options(&self) -> &RankOptions {
        &self.options
    }

    /// Rank PDF files on disk.
    ///
    /// Each file is opened, read and closed before the next one. In strict
    /// mode the first unreadable file aborts the run; in lenient mode it is
    /// logged and contributes no sections.
    pub fn rank_paths(&self, paths: &[PathBuf], input: &PersonaInput) -> Result<AnalysisOutput> {
        let names: Vec<String> = paths.iter().map(|p| file_name(p)).collect();
        let query = self.embed_query(input)?;

        let mut sections = Vec::new();
        for (path, name) in paths.iter().zip(&names) {
            let layout = match self.load(path) {
                Ok(layout) => layout,
                Err(e) if self.options.parse.is_lenient() => {
                    log::warn!("Skipping {}: {}", name, e);
                    continue;
                }
                Err(e) => return Err(e),
            };
            sections.extend(self.score_document(name, &layout, &query)?);
        }

        self.finish(names, sections, input, &query)
    }

    /// Rank documents whose layout is already in memory.
    pub fn rank_layouts(
        &self,
        documents: &[(String, LayoutDocument)],
        input: &PersonaInput,
    ) -> Result<AnalysisOutput> {
        let names: Vec<String> = documents.iter().map(|(name, _)| name.clone()).collect();
        let query = self.embed_query(input)?;

        let mut sections = Vec::new();
        for (name, layout) in documents {
            sections.extend(self.score_document(name, layout, &query)?);
        }

        self.finish(names, sections, input, &query)
    }

    fn load(&self, path: &Path) -> Result<LayoutDocument> {
        let reader = LopdfReader::open(path)?;
        read_layout(&reader, &self.options.parse)
    }

    fn embed_query(&self, input: &PersonaInput) -> Result<Vec<f32>> {
        let query = input.query();
        log::debug!("Query: {}", query);
        self.embedder.embed(&query)
    }

    /// Outline, sections and scores for one document.
    fn score_document(
        &self,
        name: &str,
        layout: &LayoutDocument,
        query: &[f32],
    ) -> Result<Vec<Section>> {
        let outline = self.outline.build(layout);
        log::info!("Found {} headings in {}", outline.len(), name);

        let mut sections = extract_sections(name, layout, &outline);
        if sections.is_empty() {
            log::warn!("No sections were extracted from {}", name);
            return Ok(sections);
        }

        let contents: Vec<&str> = sections.iter().map(|s| s.content.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&contents)?;
        if embeddings.len() != sections.len() {
            return Err(Error::Embedding(format!(
                "expected {} section embeddings, got {}",
                sections.len(),
                embeddings.len()
            )));
        }

        for (section, embedding) in sections.iter_mut().zip(&embeddings) {
            section.score = Some(self.scorer.score(&section.title, embedding, query));
        }

        Ok(sections)
    }

    fn finish(
        &self,
        names: Vec<String>,
        mut sections: Vec<Section>,
        input: &PersonaInput,
        query: &[f32],
    ) -> Result<AnalysisOutput> {
        rank_sections(&mut sections);

        let mut output = AnalysisOutput::new(names, input);
        output.push_ranked(&sections);

        for section in sections.iter().take(self.options.top_k) {
            let snippet = self.options.snippet.select(&section.content, self.embedder, query)?;
            output.push_snippet(section, snippet);
        }

        log::info!(
            "Ranked {} sections from {} documents",
            output.extracted_section.len(),
            output.metadata.input_documents.len()
        );
        Ok(output)
    }
}
