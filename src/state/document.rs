use std::collections::BTreeMap;

use serde::Serialize;

/// A state value: scalar, ordered list, or string-keyed map.
///
/// This is the shape shared by resource attributes and declared outputs. It
/// is a closed sum type so consumers pattern-match exhaustively instead of
/// poking at untyped JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Element of a list value, if this is a list and the index is in range.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            Value::List(items) => items.get(index),
            _ => None,
        }
    }

    /// Entry of a map value, if this is a map and the key is present.
    pub fn get_key(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(entries) => entries.get(key),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(raw: serde_json::Value) -> Self {
        match raw {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => serde_json::Value::Number(n),
            Value::String(s) => serde_json::Value::String(s),
            Value::List(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Map(entries) => serde_json::Value::Object(
                entries.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
        }
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl std::ops::Index<usize> for Value {
    type Output = Value;

    /// Panics when this is not a list or the index is out of range,
    /// mirroring `serde_json::Value` indexing.
    fn index(&self, index: usize) -> &Value {
        self.get_index(index)
            .unwrap_or_else(|| panic!("no list element at index {index}"))
    }
}

impl std::ops::Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.get_key(key)
            .unwrap_or_else(|| panic!("no map entry for key '{key}'"))
    }
}

/// A declared output together with its sensitivity flag.
///
/// Sensitivity is carried so callers can redact values in logs or UIs; it
/// never blocks access to the value itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputValue {
    pub value: Value,
    pub sensitive: bool,
}

impl OutputValue {
    pub fn plain(value: Value) -> Self {
        Self {
            value,
            sensitive: false,
        }
    }
}

/// How a resource's instances are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EachMode {
    /// A single instance with no key.
    #[default]
    Single,
    /// Instances keyed by integer index (`count`).
    List,
    /// Instances keyed by string (`for_each`).
    Map,
}

/// The key of one resource instance under its resource.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InstanceKey {
    #[default]
    None,
    Index(u64),
    Key(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceInstance {
    pub key: InstanceKey,
    pub attributes: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub type_: String,
    pub name: String,
    pub each: EachMode,
    pub instances: Vec<ResourceInstance>,
}

/// One module within a state document. The root module has an empty path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    pub path: Vec<String>,
    pub resources: Vec<Resource>,
    pub outputs: BTreeMap<String, OutputValue>,
}

impl Module {
    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }
}

/// The canonical, version-agnostic form of a parsed state document.
///
/// Built once per resolution from raw bytes, consumed by output extraction,
/// and discarded. Never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct StateDocument {
    /// The on-disk schema version the document was decoded from.
    pub version: u64,
    /// Version of the tool that wrote the state, when recorded.
    pub tool_version: Option<String>,
    /// Monotonic write counter.
    pub serial: u64,
    /// Opaque identity of the state's lineage, when recorded.
    pub lineage: Option<String>,
    pub modules: Vec<Module>,
}

impl StateDocument {
    /// The root module, if the document contains one.
    pub fn root_module(&self) -> Option<&Module> {
        self.modules.iter().find(|m| m.is_root())
    }
}
