use thiserror::Error;

use crate::local::LocalError;
use crate::outputs::OutputsError;
use crate::remote::RemoteError;
use crate::state::DecodeError;

/// Top-level error for a state resolution.
///
/// Every variant carries enough context (path, workspace, schema version,
/// HTTP status) for the caller to produce an actionable message.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Local(#[from] LocalError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Outputs(#[from] OutputsError),
}
