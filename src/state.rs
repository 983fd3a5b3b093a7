//! Multi-version state document parsing.
//!
//! The decoder understands every supported on-disk schema generation and
//! normalizes all of them into one canonical tree of modules, resources,
//! instances, and outputs.

mod decode;
mod document;
mod error;
mod versions;

pub use decode::decode;
pub use document::{
    EachMode, InstanceKey, Module, OutputValue, Resource, ResourceInstance, StateDocument, Value,
};
pub use error::DecodeError;
