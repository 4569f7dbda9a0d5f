//! Integration tests for ranking PDF collections end to end.

mod common;

use std::fs;
use std::path::Path;

use common::{build_pdf, kinetics_pdf, MarkerEmbedder, BODY, BOLD};
use docrank::render::to_json;
use docrank::{rank_directory, Error, JsonFormat, PersonaInput, RankOptions};

const PERSONA: &str = r#"{
    "persona": {"role": "Chemistry student", "level": "undergraduate"},
    "job_to_be_done": {"task": "Understand the reaction mechanism and rate law"}
}"#;

fn travel_pdf() -> Vec<u8> {
    build_pdf(
        Some("Weekend Trips"),
        &[vec![
            (BOLD, 16, "Travel Tips"),
            (BODY, 10, "Pack light and book the travel pass before the weekend"),
            (BODY, 10, "because trains fill up quickly during the summer season"),
        ]],
    )
}

fn embedder() -> MarkerEmbedder {
    MarkerEmbedder::new(&["rate law", "mechanism", "travel"])
}

fn write_collection(dir: &Path) {
    fs::write(dir.join("trips.pdf"), travel_pdf()).unwrap();
    fs::write(dir.join("handbook.pdf"), kinetics_pdf()).unwrap();
    fs::write(dir.join("persona.json"), PERSONA).unwrap();
    fs::write(dir.join("notes.txt"), "not a pdf").unwrap();
}

#[test]
fn test_rank_directory_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write_collection(dir.path());
    let input = PersonaInput::from_path(dir.path().join("persona.json")).unwrap();

    let output = rank_directory(dir.path(), &input, &embedder(), RankOptions::default()).unwrap();

    // sorted by file name, non-PDF files ignored
    assert_eq!(
        output.metadata.input_documents,
        vec!["handbook.pdf", "trips.pdf"]
    );
    assert_eq!(output.metadata.persona.role, "Chemistry student");

    let ranked: Vec<(&str, &str, u32, usize)> = output
        .extracted_section
        .iter()
        .map(|s| {
            (
                s.document.as_str(),
                s.section_title.as_str(),
                s.page_number,
                s.importance_rank,
            )
        })
        .collect();
    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0], ("handbook.pdf", "Reaction Mechanisms", 2, 1));
    assert_eq!(
        ranked.iter().map(|r| r.3).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );

    assert_eq!(output.subsection_analysis.len(), 3);
    let top = &output.subsection_analysis[0];
    assert_eq!(top.document, "handbook.pdf");
    assert_eq!(top.page_number, 2);
    assert!(top.refined_text.contains("elementary steps"));
    assert!(!top.refined_text.contains('\n'));
}

#[test]
fn test_top_k_limits_subsection_analysis() {
    let dir = tempfile::tempdir().unwrap();
    write_collection(dir.path());
    let input = PersonaInput::from_json_str(PERSONA).unwrap();

    let options = RankOptions::new().with_top_k(1);
    let output = rank_directory(dir.path(), &input, &embedder(), options).unwrap();

    assert_eq!(output.extracted_section.len(), 3);
    assert_eq!(output.subsection_analysis.len(), 1);
}

#[test]
fn test_output_json_matches_contract() {
    let dir = tempfile::tempdir().unwrap();
    write_collection(dir.path());
    let input = PersonaInput::from_json_str(PERSONA).unwrap();
    let output = rank_directory(dir.path(), &input, &embedder(), RankOptions::default()).unwrap();

    let json = to_json(&output, JsonFormat::Pretty).unwrap();
    assert!(json.starts_with("{\n    \"metadata\": {\n        \"input_documents\""));
    assert!(json.contains("\"sub-section_analysis\""));

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["metadata"]["persona"]["level"], "undergraduate");
    assert_eq!(
        value["metadata"]["job_to_be_done"]["task"],
        "Understand the reaction mechanism and rate law"
    );
    assert!(value["metadata"]["processing_timestamp"]
        .as_str()
        .unwrap()
        .ends_with('Z'));
    assert_eq!(value["extracted_section"][0]["importance_rank"], 1);
}

#[test]
fn test_corrupt_pdf_strict_vs_lenient() {
    let dir = tempfile::tempdir().unwrap();
    write_collection(dir.path());
    fs::write(dir.path().join("broken.pdf"), "%PDF-1.4\ngarbage").unwrap();
    let input = PersonaInput::from_json_str(PERSONA).unwrap();

    let strict = rank_directory(dir.path(), &input, &embedder(), RankOptions::default());
    assert!(strict.is_err());

    let lenient =
        rank_directory(dir.path(), &input, &embedder(), RankOptions::new().lenient()).unwrap();
    assert_eq!(
        lenient.metadata.input_documents,
        vec!["broken.pdf", "handbook.pdf", "trips.pdf"]
    );
    assert_eq!(lenient.extracted_section.len(), 3);
    assert!(lenient
        .extracted_section
        .iter()
        .all(|s| s.document != "broken.pdf"));
}

#[test]
fn test_document_without_headings_contributes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let plain = build_pdf(
        None,
        &[vec![
            (BODY, 10, "A memo with nothing but evenly sized body text inside"),
            (BODY, 10, "so no line can ever be promoted to a section heading"),
        ]],
    );
    fs::write(dir.path().join("memo.pdf"), plain).unwrap();
    let input = PersonaInput::from_json_str(PERSONA).unwrap();

    let output = rank_directory(dir.path(), &input, &embedder(), RankOptions::default()).unwrap();
    assert_eq!(output.metadata.input_documents, vec!["memo.pdf"]);
    assert!(output.extracted_section.is_empty());
    assert!(output.subsection_analysis.is_empty());
}

#[test]
fn test_invalid_persona_is_rejected() {
    let err = PersonaInput::from_json_str(r#"{"persona": {}, "job_to_be_done": "x"}"#).unwrap_err();
    assert!(matches!(err, Error::InvalidPersona(_)));
}
