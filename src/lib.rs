//! stateref - Terraform/OpenTofu state reference resolver
//!
//! A library for resolving state references - local state files or remote backend workspaces -
//! into their declared output values.

pub mod local;
pub mod outputs;
pub mod remote;
pub mod resolve;
pub mod source;
pub mod state;

mod error;

pub use error::Error;
pub use local::{LocalError, LocalSource};
pub use outputs::OutputsError;
pub use remote::{
    DEFAULT_HOSTNAME, RemoteClient, RemoteConfig, RemoteError, RemoteSource, WorkspaceSelector,
};
pub use resolve::{
    RemoteStates, ResolvedState, resolve_local, resolve_remote, resolve_remote_with_cancellation,
    resolve_remote_with_client, resolve_source,
};
pub use source::StateSource;
pub use state::{DecodeError, OutputValue, StateDocument, Value, decode};
