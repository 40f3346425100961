//! Typed deserialization of response content.

use serde::de::DeserializeOwned;
use tracing::{debug, error};

/// Maximum number of payload characters quoted in diagnostics.
pub const PREVIEW_CHARS: usize = 100;

/// Content did not match the requested shape.
///
/// The message quotes at most the first [`PREVIEW_CHARS`] characters of the
/// payload. The underlying `serde_json` error is available via `source()`.
#[derive(Debug, thiserror::Error)]
#[error("Failed to deserialize {target} ({category} error at line {line} column {column}); payload: {preview}")]
pub struct DeserializeError {
    target: &'static str,
    category: &'static str,
    line: usize,
    column: usize,
    preview: String,
    #[source]
    source: serde_json::Error,
}

impl DeserializeError {
    fn new(target: &'static str, payload: &str, source: serde_json::Error) -> Self {
        let category = match source.classify() {
            serde_json::error::Category::Io => "io",
            serde_json::error::Category::Syntax => "syntax",
            serde_json::error::Category::Data => "data",
            serde_json::error::Category::Eof => "eof",
        };
        Self {
            target,
            category,
            line: source.line(),
            column: source.column(),
            preview: preview(payload),
            source,
        }
    }

    /// Name of the type that was requested.
    pub fn target(&self) -> &str {
        self.target
    }

    /// The truncated payload quoted in the message.
    pub fn preview(&self) -> &str {
        &self.preview
    }

    /// The underlying parse error.
    pub fn json_error(&self) -> &serde_json::Error {
        &self.source
    }
}

/// Deserialize `json` into `T`.
///
/// Pick `serde_json::Value` as `T` to inspect arbitrary JSON.
pub fn parse<T: DeserializeOwned>(json: &str) -> Result<T, DeserializeError> {
    let target = std::any::type_name::<T>();
    match serde_json::from_str(json) {
        Ok(value) => {
            debug!(target_type = target, "Deserialized response content");
            Ok(value)
        }
        Err(err) => {
            let err = DeserializeError::new(target, json, err);
            error!(target_type = target, payload = %err.preview, error = %err.source, "Deserialization failed");
            Err(err)
        }
    }
}

/// First [`PREVIEW_CHARS`] characters of `payload`, with `...` appended when cut.
fn preview(payload: &str) -> String {
    match payload.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &payload[..cut]),
        None => payload.to_string(),
    }
}
