//! Error types for docrank library.

use std::io;
use thiserror::Error;

/// Result type alias for docrank operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading documents and ranking sections.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error extracting text content.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// The persona/task description is missing or malformed.
    #[error("Invalid persona input: {0}")]
    InvalidPersona(String),

    /// The embedding provider failed.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error while rendering output.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(feature = "candle")]
impl From<candle_core::Error> for Error {
    fn from(err: candle_core::Error) -> Self {
        Error::Embedding(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );

        let err = Error::InvalidPersona("missing role".to_string());
        assert_eq!(err.to_string(), "Invalid persona input: missing role");
    }

    #[test]
    fn test_every_variant_has_a_message() {
        let errors = vec![
            Error::Io(io::Error::new(io::ErrorKind::NotFound, "disk")),
            Error::UnknownFormat,
            Error::UnsupportedVersion("3.0".to_string()),
            Error::PdfParse("xref".to_string()),
            Error::Encrypted,
            Error::TextExtract("page 1".to_string()),
            Error::PageOutOfRange(2, 1),
            Error::InvalidPersona("role".to_string()),
            Error::Embedding("model".to_string()),
            Error::Json(serde_json::from_str::<serde_json::Value>("[").unwrap_err()),
            Error::Render("json".to_string()),
        ];
        for err in &errors {
            // Exhaustive over the variants
            match err {
                Error::Io(_)
                | Error::UnknownFormat
                | Error::UnsupportedVersion(_)
                | Error::PdfParse(_)
                | Error::Encrypted
                | Error::TextExtract(_)
                | Error::PageOutOfRange(..)
                | Error::InvalidPersona(_)
                | Error::Embedding(_)
                | Error::Json(_)
                | Error::Render(_) => assert!(!err.to_string().is_empty()),
            }
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
