//! Rendering of resolved outputs for the CLI.

use std::collections::BTreeMap;

use stateref::{Error, OutputValue, ResolvedState, Value};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct OutputRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "VALUE")]
    value: String,
    #[tabled(rename = "SENSITIVE")]
    sensitive: String,
}

/// Compact JSON rendering of a single value.
pub fn render_value(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "<unrenderable>".to_string())
}

pub fn value_json(value: &Value) -> serde_json::Value {
    value.clone().into()
}

/// Plain `name -> value` JSON object, mirroring how downstream tooling
/// consumes the resolver. Sensitive values are included; redaction is a
/// caller decision.
pub fn outputs_json(outputs: &BTreeMap<String, OutputValue>) -> serde_json::Value {
    let map: serde_json::Map<String, serde_json::Value> = outputs
        .iter()
        .map(|(name, output)| (name.clone(), output.value.clone().into()))
        .collect();
    serde_json::Value::Object(map)
}

/// JSON object for prefix-mode results: each workspace short name maps to
/// either its outputs or the error that stopped it.
pub fn states_json(results: &BTreeMap<String, Result<ResolvedState, Error>>) -> serde_json::Value {
    let map: serde_json::Map<String, serde_json::Value> = results
        .iter()
        .map(|(short, result)| {
            let entry = match result {
                Ok(resolved) => serde_json::json!({"outputs": outputs_json(&resolved.outputs)}),
                Err(error) => serde_json::json!({"error": error.to_string()}),
            };
            (short.clone(), entry)
        })
        .collect();
    serde_json::Value::Object(map)
}

/// Tabular rendering; sensitive values are masked unless requested.
pub fn render_table(outputs: &BTreeMap<String, OutputValue>, show_sensitive: bool) -> String {
    let rows: Vec<OutputRow> = outputs
        .iter()
        .map(|(name, output)| OutputRow {
            name: name.clone(),
            value: if output.sensitive && !show_sensitive {
                "(sensitive)".to_string()
            } else {
                render_value(&output.value)
            },
            sensitive: if output.sensitive { "yes" } else { "" }.to_string(),
        })
        .collect();
    Table::new(rows).to_string()
}
