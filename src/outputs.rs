//! Extraction of root-module outputs from a canonical state document.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::state::{OutputValue, StateDocument};

#[derive(Debug, Error)]
pub enum OutputsError {
    /// The requested output key is not declared by the root module. Carries
    /// the known keys so callers can produce an actionable message.
    #[error("output '{name}' not found (known outputs: {known:?})")]
    OutputNotFound { name: String, known: Vec<String> },
}

/// Flatten a state document's root-module outputs into a name-to-value map.
///
/// Only the root module's outputs are exposed; nested module outputs are not
/// surfaced unless the source configuration re-exported them through the
/// root. A document with no outputs section yields an empty map.
pub fn extract(document: StateDocument) -> BTreeMap<String, OutputValue> {
    document
        .modules
        .into_iter()
        .find(|module| module.is_root())
        .map(|module| module.outputs)
        .unwrap_or_default()
}

/// Look up a single output by name.
pub fn lookup<'a>(
    outputs: &'a BTreeMap<String, OutputValue>,
    name: &str,
) -> Result<&'a OutputValue, OutputsError> {
    outputs.get(name).ok_or_else(|| OutputsError::OutputNotFound {
        name: name.to_string(),
        known: outputs.keys().cloned().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Module, Value, decode};

    fn document(json: &str) -> StateDocument {
        decode(json.as_bytes()).unwrap()
    }

    #[test]
    fn test_extract_root_outputs() {
        let doc = document(
            r#"{
                "version": 4,
                "outputs": {
                    "bucket_arn": {"value": "arn:aws:s3:::example", "type": "string"},
                    "public_subnet_ids": {"value": ["subnet-1", "subnet-2"], "type": ["list", "string"]}
                }
            }"#,
        );
        let outputs = extract(doc);
        assert_eq!(outputs["bucket_arn"].value, "arn:aws:s3:::example");
        assert_eq!(outputs["public_subnet_ids"].value[0], "subnet-1");
    }

    #[test]
    fn test_extract_empty_outputs_yields_empty_map() {
        let doc = document(r#"{"version": 4, "outputs": {}}"#);
        assert!(extract(doc).is_empty());
    }

    #[test]
    fn test_extract_missing_outputs_section_yields_empty_map() {
        let doc = document(r#"{"version": 4}"#);
        assert!(extract(doc).is_empty());
    }

    #[test]
    fn test_extract_ignores_nested_module_outputs() {
        let mut doc = document(r#"{"version": 4, "outputs": {"kept": {"value": "yes"}}}"#);
        doc.modules.push(Module {
            path: vec!["vpc".to_string()],
            resources: Vec::new(),
            outputs: [(
                "hidden".to_string(),
                OutputValue::plain(Value::String("no".to_string())),
            )]
            .into_iter()
            .collect(),
        });
        let outputs = extract(doc);
        assert!(outputs.contains_key("kept"));
        assert!(!outputs.contains_key("hidden"));
    }

    #[test]
    fn test_lookup_known_key() {
        let doc = document(r#"{"version": 4, "outputs": {"region": {"value": "eu-west-1"}}}"#);
        let outputs = extract(doc);
        assert_eq!(lookup(&outputs, "region").unwrap().value, "eu-west-1");
    }

    #[test]
    fn test_lookup_unknown_key_names_it_and_lists_known() {
        let doc = document(
            r#"{"version": 4, "outputs": {"region": {"value": "eu-west-1"}, "zone": {"value": "a"}}}"#,
        );
        let outputs = extract(doc);
        let err = lookup(&outputs, "bucket").unwrap_err();
        match &err {
            OutputsError::OutputNotFound { name, known } => {
                assert_eq!(name, "bucket");
                assert_eq!(known, &vec!["region".to_string(), "zone".to_string()]);
            }
        }
        assert!(err.to_string().contains("'bucket'"));
    }

    #[test]
    fn test_sensitivity_is_preserved_not_enforced() {
        let doc = document(
            r#"{"version": 4, "outputs": {"secret": {"value": "s3cr3t", "sensitive": true}}}"#,
        );
        let outputs = extract(doc);
        let output = lookup(&outputs, "secret").unwrap();
        assert!(output.sensitive);
        assert_eq!(output.value, "s3cr3t");
    }
}
