//! JSON rendering for outlines and analysis output.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{Error, Result};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with 4-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize any output value to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let bytes = match format {
        JsonFormat::Pretty => {
            let mut buf = Vec::new();
            let formatter = PrettyFormatter::with_indent(b"    ");
            let mut ser = Serializer::with_formatter(&mut buf, formatter);
            value
                .serialize(&mut ser)
                .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))?;
            buf
        }
        JsonFormat::Compact => serde_json::to_vec(value)
            .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))?,
    };

    String::from_utf8(bytes).map_err(|e| Error::Render(format!("invalid UTF-8 in JSON: {}", e)))
}
