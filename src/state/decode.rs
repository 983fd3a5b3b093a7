use super::document::StateDocument;
use super::error::DecodeError;
use super::versions::{legacy, modern};

/// Decode raw bytes into a canonical state document.
///
/// Decoding is two-phase: the bytes are first parsed as generic JSON to read
/// the top-level `version` discriminant, then handed to the adapter
/// registered for that schema generation. Unknown top-level fields are
/// tolerated; an unknown version is not.
pub fn decode(bytes: &[u8]) -> Result<StateDocument, DecodeError> {
    let raw: serde_json::Value = serde_json::from_slice(bytes)?;
    let root = raw.as_object().ok_or(DecodeError::NotAnObject)?;

    let raw_version = root
        .get("version")
        .ok_or_else(|| DecodeError::MissingField {
            field: "version",
            context: "state document".to_string(),
        })?;
    let version = raw_version
        .as_u64()
        .ok_or_else(|| DecodeError::InvalidField {
            field: "version",
            context: "state document".to_string(),
            expected: "a non-negative integer",
        })?;

    match version {
        1 => legacy::normalize_v1(root),
        2 | 3 => legacy::normalize_v2_v3(root, version),
        4 => modern::normalize(root),
        other => Err(DecodeError::UnsupportedVersion { version: other }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_rejects_invalid_json() {
        let err = decode(b"not json at all").unwrap_err();
        assert!(matches!(err, DecodeError::Syntax(_)));
    }

    #[test]
    fn test_decode_rejects_non_object_root() {
        let err = decode(b"[1, 2, 3]").unwrap_err();
        assert!(matches!(err, DecodeError::NotAnObject));
    }

    #[test]
    fn test_decode_rejects_missing_version() {
        let err = decode(br#"{"serial": 1}"#).unwrap_err();
        assert!(matches!(err, DecodeError::MissingField { field: "version", .. }));
    }

    #[test]
    fn test_decode_rejects_non_integer_version() {
        let err = decode(br#"{"version": "four"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidField { field: "version", .. }));
    }

    #[test]
    fn test_decode_rejects_unknown_version_naming_it() {
        let err = decode(br#"{"version": 99}"#).unwrap_err();
        match err {
            DecodeError::UnsupportedVersion { version } => assert_eq!(version, 99),
            other => panic!("expected UnsupportedVersion, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_tolerates_unknown_top_level_fields() {
        let doc = decode(
            br#"{
                "version": 4,
                "check_results": null,
                "some_future_field": {"nested": true},
                "outputs": {"greeting": {"value": "hello", "type": "string"}}
            }"#,
        )
        .unwrap();
        assert_eq!(doc.root_module().unwrap().outputs["greeting"].value, "hello");
    }

    #[test]
    fn test_decode_is_idempotent() {
        let bytes: &[u8] = br#"{
            "version": 4,
            "terraform_version": "1.6.2",
            "serial": 11,
            "lineage": "0b7a-43",
            "outputs": {"name": {"value": "demo", "type": "string"}},
            "resources": [{
                "mode": "managed",
                "type": "aws_s3_bucket",
                "name": "assets",
                "instances": [{"attributes": {"bucket": "assets-prod"}}]
            }]
        }"#;
        let first = decode(bytes).unwrap();
        let second = decode(bytes).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_decode_header_fields() {
        let doc = decode(
            br#"{"version": 3, "terraform_version": "0.11.14", "serial": 5, "lineage": "aa-bb", "modules": []}"#,
        )
        .unwrap();
        assert_eq!(doc.version, 3);
        assert_eq!(doc.tool_version.as_deref(), Some("0.11.14"));
        assert_eq!(doc.serial, 5);
        assert_eq!(doc.lineage.as_deref(), Some("aa-bb"));
    }
}
