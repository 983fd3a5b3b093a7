//! Per-schema-version normalization into the canonical document tree.
//!
//! Each supported schema generation gets its own adapter; the decoder picks
//! one from the top-level `version` discriminant. Adapters never assume a
//! required field is present and report structural violations as
//! [`DecodeError`](super::DecodeError) instead of panicking.

pub(crate) mod legacy;
pub(crate) mod modern;

use super::error::DecodeError;

pub(crate) type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Fetch a required field from a JSON object.
fn require<'a>(
    object: &'a JsonMap,
    field: &'static str,
    context: &str,
) -> Result<&'a serde_json::Value, DecodeError> {
    object.get(field).ok_or_else(|| DecodeError::MissingField {
        field,
        context: context.to_string(),
    })
}

fn as_object<'a>(
    value: &'a serde_json::Value,
    field: &'static str,
    context: &str,
) -> Result<&'a JsonMap, DecodeError> {
    value.as_object().ok_or_else(|| DecodeError::InvalidField {
        field,
        context: context.to_string(),
        expected: "an object",
    })
}

fn as_array<'a>(
    value: &'a serde_json::Value,
    field: &'static str,
    context: &str,
) -> Result<&'a Vec<serde_json::Value>, DecodeError> {
    value.as_array().ok_or_else(|| DecodeError::InvalidField {
        field,
        context: context.to_string(),
        expected: "an array",
    })
}

fn as_str<'a>(
    value: &'a serde_json::Value,
    field: &'static str,
    context: &str,
) -> Result<&'a str, DecodeError> {
    value.as_str().ok_or_else(|| DecodeError::InvalidField {
        field,
        context: context.to_string(),
        expected: "a string",
    })
}

/// Common top-level metadata shared by every schema generation.
fn document_header(root: &JsonMap) -> (Option<String>, u64, Option<String>) {
    let tool_version = root
        .get("terraform_version")
        .and_then(|v| v.as_str())
        .map(String::from);
    let serial = root.get("serial").and_then(|v| v.as_u64()).unwrap_or(0);
    let lineage = root
        .get("lineage")
        .and_then(|v| v.as_str())
        .map(String::from);
    (tool_version, serial, lineage)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> JsonMap {
        serde_json::from_str(r#"{"version": 4, "serial": 7, "lineage": "abc"}"#).unwrap()
    }

    #[test]
    fn test_require_present_and_missing() {
        let object = sample();
        assert!(require(&object, "version", "state document").is_ok());
        let err = require(&object, "outputs", "state document").unwrap_err();
        assert!(matches!(err, DecodeError::MissingField { field: "outputs", .. }));
    }

    #[test]
    fn test_as_object_rejects_scalars() {
        let object = sample();
        let err = as_object(&object["serial"], "serial", "state document").unwrap_err();
        assert!(err.to_string().contains("expected an object"));
    }

    #[test]
    fn test_document_header_defaults() {
        let empty: JsonMap = serde_json::Map::new();
        let (tool_version, serial, lineage) = document_header(&empty);
        assert_eq!(tool_version, None);
        assert_eq!(serial, 0);
        assert_eq!(lineage, None);
    }

    #[test]
    fn test_document_header_reads_fields() {
        let object: JsonMap = serde_json::from_str(
            r#"{"terraform_version": "0.12.31", "serial": 42, "lineage": "e7f-11"}"#,
        )
        .unwrap();
        let (tool_version, serial, lineage) = document_header(&object);
        assert_eq!(tool_version.as_deref(), Some("0.12.31"));
        assert_eq!(serial, 42);
        assert_eq!(lineage.as_deref(), Some("e7f-11"));
    }
}
