//! PDF header validation and input discovery.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Read the header of a file and return its PDF version (e.g., "1.7").
pub fn pdf_version_from_path<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut header = [0u8; 16];
    let mut file = File::open(path)?;
    let read = file.read(&mut header)?;
    pdf_version_from_bytes(&header[..read])
}

/// Validate a PDF header and return its version string.
///
/// Only the first `%PDF-x.y` bytes are inspected; the body is left to the
/// layout reader.
pub fn pdf_version_from_bytes(data: &[u8]) -> Result<String> {
    let Some(rest) = data.strip_prefix(PDF_MAGIC) else {
        return Err(Error::UnknownFormat);
    };
    let Some(version) = rest.get(..VERSION_LEN) else {
        return Err(Error::UnknownFormat);
    };

    let valid = version[0].is_ascii_digit() && version[1] == b'.' && version[2].is_ascii_digit();
    let version = String::from_utf8_lossy(version).to_string();
    if !valid {
        return Err(Error::UnsupportedVersion(version));
    }
    Ok(version)
}

/// Check if bytes start with a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    pdf_version_from_bytes(data).is_ok()
}

/// List the `*.pdf` files directly inside `dir`, sorted by file name.
///
/// The extension match is case-insensitive. Sorting makes the discovery
/// order, and therefore tie-breaking in the ranking, identical on every
/// platform.
pub fn collect_pdfs<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut pdfs = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            pdfs.push(path);
        }
    }
    pdfs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(pdfs)
}

/// File name of a path as a display string.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
