//! Adapters for the pre-0.12 schema generations (versions 1 through 3).
//!
//! These formats store a `modules` array where each module carries its own
//! outputs and a resource map keyed by a combined `type.name` address string,
//! optionally suffixed with a count index (`type.name.N`). Version 1 stores
//! outputs as a flat map of raw values; versions 2 and 3 store
//! `{value, type, sensitive}` records.

use std::collections::BTreeMap;

use super::{JsonMap, as_array, as_object, as_str, document_header, require};
use crate::state::document::{
    EachMode, InstanceKey, Module, OutputValue, Resource, ResourceInstance, StateDocument, Value,
};
use crate::state::error::DecodeError;

pub(crate) fn normalize_v1(root: &JsonMap) -> Result<StateDocument, DecodeError> {
    normalize(root, 1)
}

pub(crate) fn normalize_v2_v3(root: &JsonMap, version: u64) -> Result<StateDocument, DecodeError> {
    normalize(root, version)
}

fn normalize(root: &JsonMap, version: u64) -> Result<StateDocument, DecodeError> {
    let (tool_version, serial, lineage) = document_header(root);

    let mut modules = Vec::new();
    if let Some(raw_modules) = root.get("modules") {
        for raw in as_array(raw_modules, "modules", "state document")? {
            modules.push(normalize_module(raw, version)?);
        }
    }

    Ok(StateDocument {
        version,
        tool_version,
        serial,
        lineage,
        modules,
    })
}

fn normalize_module(raw: &serde_json::Value, version: u64) -> Result<Module, DecodeError> {
    let module = as_object(raw, "modules", "state document")?;

    // Legacy paths always start with a literal "root" segment; the canonical
    // root module has an empty path.
    let mut path = match module.get("path") {
        Some(raw_path) => as_array(raw_path, "path", "module")?
            .iter()
            .map(|segment| as_str(segment, "path", "module").map(String::from))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };
    if path.first().map(String::as_str) == Some("root") {
        path.remove(0);
    }

    let context = if path.is_empty() {
        "root module".to_string()
    } else {
        format!("module '{}'", path.join("."))
    };

    let mut outputs = BTreeMap::new();
    if let Some(raw_outputs) = module.get("outputs") {
        for (name, entry) in as_object(raw_outputs, "outputs", &context)? {
            outputs.insert(name.clone(), normalize_output(entry, version, &context)?);
        }
    }

    let resources = match module.get("resources") {
        Some(raw_resources) => normalize_resources(
            as_object(raw_resources, "resources", &context)?,
            &context,
        )?,
        None => Vec::new(),
    };

    Ok(Module {
        path,
        resources,
        outputs,
    })
}

/// Version 1 outputs are raw values keyed by name. Versions 2 and 3 wrap the
/// value in a `{value, type, sensitive}` record; `sensitive` was optional in
/// practice, so absent flags normalize to false either way.
fn normalize_output(
    entry: &serde_json::Value,
    version: u64,
    context: &str,
) -> Result<OutputValue, DecodeError> {
    if version == 1 {
        return Ok(OutputValue::plain(Value::from(entry.clone())));
    }

    match entry.as_object() {
        Some(record) => {
            let value = require(record, "value", context)?;
            let sensitive = record
                .get("sensitive")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            Ok(OutputValue {
                value: Value::from(value.clone()),
                sensitive,
            })
        }
        // Some 0.7-era writers left raw values behind during migration.
        None => Ok(OutputValue::plain(Value::from(entry.clone()))),
    }
}

fn normalize_resources(
    raw_resources: &JsonMap,
    context: &str,
) -> Result<Vec<Resource>, DecodeError> {
    // Instances of a counted resource appear as separate `type.name.N` keys;
    // group them back under one resource. BTreeMap keeps the result ordered.
    let mut grouped: BTreeMap<(String, String), Vec<ResourceInstance>> = BTreeMap::new();

    for (key, entry) in raw_resources {
        let (type_, name, instance_key) = split_resource_key(key)?;
        let resource = as_object(entry, "resources", &format!("resource '{key}' in {context}"))?;

        let primary = as_object(
            require(resource, "primary", &format!("resource '{key}' in {context}"))?,
            "primary",
            &format!("resource '{key}' in {context}"),
        )?;

        let mut attributes: BTreeMap<String, Value> = BTreeMap::new();
        if let Some(raw_attributes) = primary.get("attributes") {
            for (attr, value) in as_object(
                raw_attributes,
                "attributes",
                &format!("resource '{key}' in {context}"),
            )? {
                attributes.insert(attr.clone(), Value::from(value.clone()));
            }
        }
        // The instance id lives outside the flat attribute map.
        if let Some(id) = primary.get("id").and_then(|v| v.as_str()) {
            attributes
                .entry("id".to_string())
                .or_insert_with(|| Value::String(id.to_string()));
        }

        grouped
            .entry((type_, name))
            .or_default()
            .push(ResourceInstance {
                key: instance_key,
                attributes,
            });
    }

    let resources = grouped
        .into_iter()
        .map(|((type_, name), mut instances)| {
            instances.sort_by_key(|instance| match &instance.key {
                InstanceKey::Index(i) => *i,
                InstanceKey::None => 0,
                InstanceKey::Key(_) => 0,
            });
            let each = if instances
                .iter()
                .any(|instance| matches!(instance.key, InstanceKey::Index(_)))
            {
                EachMode::List
            } else {
                EachMode::Single
            };
            Resource {
                type_,
                name,
                each,
                instances,
            }
        })
        .collect();

    Ok(resources)
}

/// Split a combined resource address key into type, name, and instance key.
///
/// The trailing segment is a count index when it parses as an integer and at
/// least `type.name` remains. Data sources keep their `data.` label as part
/// of the type so they cannot collide with a managed resource of the same
/// type and name.
fn split_resource_key(key: &str) -> Result<(String, String, InstanceKey), DecodeError> {
    let mut segments: Vec<&str> = key.split('.').collect();

    let instance_key = match segments.last().and_then(|s| s.parse::<u64>().ok()) {
        Some(index) if segments.len() > 2 => {
            segments.pop();
            InstanceKey::Index(index)
        }
        _ => InstanceKey::None,
    };

    if segments.len() < 2 || segments.iter().any(|s| s.is_empty()) {
        return Err(DecodeError::InvalidField {
            field: "resources",
            context: format!("resource key '{key}'"),
            expected: "'type.name' addressing",
        });
    }

    let name = segments.pop().expect("length checked above").to_string();
    let type_ = segments.join(".");
    Ok((type_, name, instance_key))
}
