//! Remote workspace backend access.
//!
//! Resolves workspaces by exact name or shared prefix against a
//! workspace-oriented HTTP API and downloads their current state snapshots.
//! Read-only: no locking, no state writing.

mod client;
mod config;
mod error;
mod types;

pub use client::RemoteClient;
pub use config::{
    DEFAULT_HOSTNAME, DEFAULT_RETRY_ATTEMPTS, DEFAULT_TIMEOUT, RemoteConfig, WorkspaceSelector,
};
pub use error::RemoteError;
pub use types::{StateVersion, Workspace};

use async_trait::async_trait;

use crate::source::StateSource;

/// The byte source for one resolved remote workspace.
///
/// Construction requires an already-resolved workspace (by lookup or
/// listing); loading performs the two-call fetch for its current snapshot.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    client: RemoteClient,
    workspace: Workspace,
}

impl RemoteSource {
    pub fn new(client: RemoteClient, workspace: Workspace) -> Self {
        Self { client, workspace }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }
}

#[async_trait]
impl StateSource for RemoteSource {
    fn describe(&self) -> String {
        format!("remote workspace '{}'", self.workspace.name)
    }

    async fn load(&self) -> Result<Vec<u8>, crate::Error> {
        let bytes = self.client.fetch_current_state(&self.workspace.id).await?;
        Ok(bytes)
    }
}
