use thiserror::Error;

/// Errors from the remote workspace backend.
///
/// Messages must never contain the bearer token.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Invalid configuration, caught before any network call.
    #[error("invalid remote state configuration: {message}")]
    Config { message: String },

    /// The backend rejected the token (401/403).
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// The named workspace does not exist in the organization.
    #[error("workspace '{workspace}' not found in organization '{organization}'")]
    WorkspaceNotFound {
        organization: String,
        workspace: String,
    },

    /// Any other non-success backend response, with upstream status and
    /// message for diagnostics.
    #[error("backend error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure (connection, protocol).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request deadline was exceeded on every attempt.
    #[error("request timed out after {attempts} attempts")]
    Timeout { attempts: u32 },

    /// The caller withdrew interest before the operation completed.
    #[error("operation cancelled")]
    Cancelled,
}

impl RemoteError {
    /// Whether a retry could plausibly succeed. Authentication failures,
    /// missing workspaces, and config errors are definitive.
    pub fn is_transient(&self) -> bool {
        match self {
            RemoteError::Api { status, .. } => *status == 429 || *status >= 500,
            RemoteError::Network(err) => err.is_timeout() || err.is_connect(),
            RemoteError::Timeout { .. } => true,
            _ => false,
        }
    }
}
