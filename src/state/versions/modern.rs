//! Adapter for the current schema generation (version 4, 0.12 and later).
//!
//! Version 4 keeps outputs at the top level as `{value, type, sensitive}`
//! records and flattens resources into a single list, each entry naming its
//! owning module by address. Instances carry an explicit `index_key` that is
//! a bare integer for `count`, a string for `for_each`, or absent.

use std::collections::BTreeMap;

use super::{JsonMap, as_array, as_object, as_str, document_header, require};
use crate::state::document::{
    EachMode, InstanceKey, Module, OutputValue, Resource, ResourceInstance, StateDocument, Value,
};
use crate::state::error::DecodeError;

pub(crate) fn normalize(root: &JsonMap) -> Result<StateDocument, DecodeError> {
    let (tool_version, serial, lineage) = document_header(root);

    let mut root_outputs = BTreeMap::new();
    if let Some(raw_outputs) = root.get("outputs") {
        for (name, entry) in as_object(raw_outputs, "outputs", "state document")? {
            root_outputs.insert(name.clone(), normalize_output(name, entry)?);
        }
    }

    // Resources are grouped back under their owning module; the root module
    // always exists because it owns the outputs section.
    let mut modules: BTreeMap<Vec<String>, Module> = BTreeMap::new();
    modules.insert(
        Vec::new(),
        Module {
            path: Vec::new(),
            resources: Vec::new(),
            outputs: root_outputs,
        },
    );

    if let Some(raw_resources) = root.get("resources") {
        for entry in as_array(raw_resources, "resources", "state document")? {
            let (path, resource) = normalize_resource(entry)?;
            modules
                .entry(path.clone())
                .or_insert_with(|| Module {
                    path,
                    ..Default::default()
                })
                .resources
                .push(resource);
        }
    }

    Ok(StateDocument {
        version: 4,
        tool_version,
        serial,
        lineage,
        modules: modules.into_values().collect(),
    })
}

fn normalize_output(name: &str, entry: &serde_json::Value) -> Result<OutputValue, DecodeError> {
    let context = format!("output '{name}'");
    let record = as_object(entry, "outputs", &context)?;
    let value = require(record, "value", &context)?;
    let sensitive = record
        .get("sensitive")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    Ok(OutputValue {
        value: Value::from(value.clone()),
        sensitive,
    })
}

fn normalize_resource(
    entry: &serde_json::Value,
) -> Result<(Vec<String>, Resource), DecodeError> {
    let resource = as_object(entry, "resources", "state document")?;

    let type_ = as_str(
        require(resource, "type", "resource")?,
        "type",
        "resource",
    )?;
    let name = as_str(
        require(resource, "name", "resource")?,
        "name",
        "resource",
    )?;
    let context = format!("resource '{type_}.{name}'");

    let path = match resource.get("module") {
        Some(address) => parse_module_address(as_str(address, "module", &context)?)?,
        None => Vec::new(),
    };

    // Data sources keep the "data." label on their type, matching how the
    // legacy generations address them.
    let mode = resource.get("mode").and_then(|v| v.as_str()).unwrap_or("managed");
    let canonical_type = if mode == "data" {
        format!("data.{type_}")
    } else {
        type_.to_string()
    };

    let mut instances = Vec::new();
    if let Some(raw_instances) = resource.get("instances") {
        for raw in as_array(raw_instances, "instances", &context)? {
            instances.push(normalize_instance(raw, &context)?);
        }
    }

    let each = match resource.get("each").and_then(|v| v.as_str()) {
        Some("list") => EachMode::List,
        Some("map") => EachMode::Map,
        _ => infer_each_mode(&instances),
    };

    Ok((
        path,
        Resource {
            type_: canonical_type,
            name: name.to_string(),
            each,
            instances,
        },
    ))
}

fn normalize_instance(
    raw: &serde_json::Value,
    context: &str,
) -> Result<ResourceInstance, DecodeError> {
    let instance = as_object(raw, "instances", context)?;

    let key = match instance.get("index_key") {
        None | Some(serde_json::Value::Null) => InstanceKey::None,
        Some(serde_json::Value::Number(n)) => {
            let index = n.as_u64().ok_or_else(|| DecodeError::InvalidField {
                field: "index_key",
                context: context.to_string(),
                expected: "a non-negative integer or a string",
            })?;
            InstanceKey::Index(index)
        }
        Some(serde_json::Value::String(s)) => InstanceKey::Key(s.clone()),
        Some(_) => {
            return Err(DecodeError::InvalidField {
                field: "index_key",
                context: context.to_string(),
                expected: "a non-negative integer or a string",
            });
        }
    };

    let mut attributes = BTreeMap::new();
    if let Some(raw_attributes) = instance.get("attributes") {
        for (attr, value) in as_object(raw_attributes, "attributes", context)? {
            attributes.insert(attr.clone(), Value::from(value.clone()));
        }
    }

    Ok(ResourceInstance { key, attributes })
}

fn infer_each_mode(instances: &[ResourceInstance]) -> EachMode {
    if instances
        .iter()
        .any(|i| matches!(i.key, InstanceKey::Key(_)))
    {
        EachMode::Map
    } else if instances
        .iter()
        .any(|i| matches!(i.key, InstanceKey::Index(_)))
    {
        EachMode::List
    } else {
        EachMode::Single
    }
}

/// Parse a module address such as `module.network.module.subnets` into its
/// path segments `["network", "subnets"]`.
fn parse_module_address(address: &str) -> Result<Vec<String>, DecodeError> {
    let segments: Vec<&str> = address.split('.').collect();
    if segments.is_empty() || segments.len() % 2 != 0 {
        return Err(invalid_module_address(address));
    }

    let mut path = Vec::with_capacity(segments.len() / 2);
    for pair in segments.chunks(2) {
        if pair[0] != "module" || pair[1].is_empty() {
            return Err(invalid_module_address(address));
        }
        path.push(pair[1].to_string());
    }
    Ok(path)
}

fn invalid_module_address(address: &str) -> DecodeError {
    DecodeError::InvalidField {
        field: "module",
        context: format!("module address '{address}'"),
        expected: "'module.<name>' segments",
    }
}
