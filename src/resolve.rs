//! The resolution pipeline: obtain bytes, decode, normalize, extract.
//!
//! Each resolution is a single linear pass with no state shared across
//! calls; the canonical document tree is rebuilt every time and discarded
//! once the outputs are extracted.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::error::Error;
use crate::local::LocalSource;
use crate::outputs::{self, OutputsError};
use crate::remote::{RemoteClient, RemoteConfig, RemoteError, RemoteSource};
use crate::source::StateSource;
use crate::state::{self, OutputValue};

/// Upper bound on concurrent per-workspace fetches in prefix mode.
const MAX_CONCURRENT_FETCHES: usize = 8;

/// The caller-visible result of resolving one state reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedState {
    /// Root-module outputs, keyed by name.
    pub outputs: BTreeMap<String, OutputValue>,
    /// Monotonic write counter of the underlying state.
    pub serial: u64,
    /// Opaque state identity, when recorded.
    pub lineage: Option<String>,
    /// Version of the tool that wrote the state, when recorded.
    pub tool_version: Option<String>,
}

impl ResolvedState {
    fn from_document(document: state::StateDocument) -> Self {
        let serial = document.serial;
        let lineage = document.lineage.clone();
        let tool_version = document.tool_version.clone();
        Self {
            outputs: outputs::extract(document),
            serial,
            lineage,
            tool_version,
        }
    }

    /// Look up a single output by name.
    pub fn output(&self, name: &str) -> Result<&OutputValue, OutputsError> {
        outputs::lookup(&self.outputs, name)
    }
}

/// Result of a remote resolution: one state for an exact-name selector, or a
/// per-workspace mapping keyed by short name for a prefix selector. In the
/// prefix case a single workspace's failure is attached to its slot rather
/// than aborting the batch.
#[derive(Debug)]
pub enum RemoteStates {
    Single(ResolvedState),
    ByWorkspace(BTreeMap<String, Result<ResolvedState, Error>>),
}

/// Run the pipeline against any byte source.
pub async fn resolve_source(source: &dyn StateSource) -> Result<ResolvedState, Error> {
    let bytes = source.load().await?;
    let document = state::decode(&bytes)?;
    tracing::debug!(
        source = %source.describe(),
        version = document.version,
        serial = document.serial,
        "state decoded"
    );
    Ok(ResolvedState::from_document(document))
}

/// Resolve a state reference from a local file path.
pub async fn resolve_local(path: impl AsRef<Path>) -> Result<ResolvedState, Error> {
    resolve_source(&LocalSource::new(path.as_ref())).await
}

/// Resolve a state reference from remote backend coordinates.
pub async fn resolve_remote(config: &RemoteConfig) -> Result<RemoteStates, Error> {
    resolve_remote_with_cancellation(config, CancellationToken::new()).await
}

/// Like [`resolve_remote`], aborting early with a cancellation error once the
/// given token is cancelled.
pub async fn resolve_remote_with_cancellation(
    config: &RemoteConfig,
    cancel: CancellationToken,
) -> Result<RemoteStates, Error> {
    // Surfaces configuration errors before any network call.
    config.validate()?;
    let client = RemoteClient::new(config)?.with_cancellation(cancel);
    resolve_remote_with_client(config, client).await
}

/// Resolve against an already-constructed client.
///
/// NOTE: Primarily used for testing with mock servers.
pub async fn resolve_remote_with_client(
    config: &RemoteConfig,
    client: RemoteClient,
) -> Result<RemoteStates, Error> {
    config.validate()?;

    if let Some(name) = &config.workspaces.name {
        let workspace = client.lookup_workspace(&config.organization, name).await?;
        let source = RemoteSource::new(client, workspace);
        let resolved = resolve_source(&source).await?;
        return Ok(RemoteStates::Single(resolved));
    }

    let prefix = config
        .workspaces
        .prefix
        .as_deref()
        .expect("validate() guarantees name or prefix");
    Ok(RemoteStates::ByWorkspace(
        resolve_prefix(config, client, prefix).await?,
    ))
}

/// Prefix fan-out: every matching workspace is fetched independently and
/// concurrently; the aggregation below is the only synchronization point.
async fn resolve_prefix(
    config: &RemoteConfig,
    client: RemoteClient,
    prefix: &str,
) -> Result<BTreeMap<String, Result<ResolvedState, Error>>, Error> {
    let workspaces = client.list_workspaces(&config.organization).await?;
    let matching: Vec<_> = workspaces
        .into_iter()
        .filter_map(|workspace| {
            let short = workspace.short_name(prefix)?.to_string();
            Some((short, workspace))
        })
        .collect();
    tracing::info!(
        organization = %config.organization,
        prefix = %prefix,
        matched = matching.len(),
        "resolving workspaces by prefix"
    );

    let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_FETCHES));
    let mut handles = Vec::with_capacity(matching.len());
    for (short, workspace) in matching {
        let client = client.clone();
        let semaphore = Arc::clone(&semaphore);
        let handle = tokio::spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("semaphore is never closed");
            let source = RemoteSource::new(client, workspace);
            resolve_source(&source).await
        });
        handles.push((short, handle));
    }

    let mut results = BTreeMap::new();
    for (short, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(join_error) if join_error.is_cancelled() => {
                Err(Error::Remote(RemoteError::Cancelled))
            }
            Err(join_error) => std::panic::resume_unwind(join_error.into_panic()),
        };
        if let Err(error) = &result {
            tracing::warn!(workspace = %short, error = %error, "workspace state fetch failed");
        }
        results.insert(short, result);
    }
    Ok(results)
}
