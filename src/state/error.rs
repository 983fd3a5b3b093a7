use thiserror::Error;

/// Errors produced while decoding raw bytes into a canonical state document.
///
/// Decode failures are deterministic for a given input and are never retried.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not a valid JSON document at all.
    #[error("state document is not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    /// The document parsed, but its root is not a JSON object.
    #[error("state document root must be a JSON object")]
    NotAnObject,

    /// A field the schema generation requires is absent.
    #[error("missing required field '{field}' in {context}")]
    MissingField {
        field: &'static str,
        context: String,
    },

    /// A required field is present but has the wrong shape.
    #[error("invalid field '{field}' in {context}: expected {expected}")]
    InvalidField {
        field: &'static str,
        context: String,
        expected: &'static str,
    },

    /// The document declares a schema version no adapter is registered for.
    #[error("unsupported state schema version {version}")]
    UnsupportedVersion { version: u64 },
}
