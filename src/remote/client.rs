use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tokio_util::sync::CancellationToken;

use super::RemoteError;
use super::config::RemoteConfig;
use super::types::{
    ApiCollection, ApiDocument, DEFAULT_PAGE_SIZE, ErrorDocument, StateVersion, StateVersionData,
    Workspace, WorkspaceData,
};

/// Base delay before the first retry; doubles per attempt.
const BACKOFF_BASE_MS: u64 = 250;

/// Cap on the delay between attempts.
const BACKOFF_CAP_MS: u64 = 4_000;

/// Client for the workspace backend's JSON:API.
///
/// Transient failures (timeouts, connection resets, 429/5xx) are retried with
/// bounded exponential backoff; authentication and not-found responses are
/// definitive and never retried. The underlying connection pool is shared by
/// cloning, which is safe for concurrent use.
#[derive(Clone)]
pub struct RemoteClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    retry_attempts: u32,
    cancel: CancellationToken,
}

impl RemoteClient {
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let base_url = config.base_url();
        Self::with_base_url(config, base_url)
    }

    /// NOTE: Primarily used for testing with mock servers.
    pub fn with_base_url(config: &RemoteConfig, base_url: String) -> Result<Self, RemoteError> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            let header_value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| RemoteError::Auth {
                    message: "invalid token format".to_string(),
                })?;
            headers.insert(AUTHORIZATION, header_value);
        }
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.api+json"));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/vnd.api+json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(RemoteError::Network)?;

        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
            retry_attempts: config.retry_attempts.max(1),
            cancel: CancellationToken::new(),
        })
    }

    /// Tie this client to a caller-owned cancellation token. A cancelled
    /// token aborts in-flight and queued requests with `Cancelled`.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn api_base(&self) -> &str {
        &self.base_url
    }

    /// Look up one workspace by its full name.
    pub async fn lookup_workspace(
        &self,
        organization: &str,
        name: &str,
    ) -> Result<Workspace, RemoteError> {
        let url = format!(
            "{}/api/v2/organizations/{}/workspaces/{}",
            self.base_url,
            urlencoding::encode(organization),
            urlencoding::encode(name)
        );

        match self.get_json::<ApiDocument<WorkspaceData>>(&url).await {
            Ok(doc) => {
                tracing::debug!(workspace = %name, id = %doc.data.id, "workspace resolved");
                Ok(doc.data.into())
            }
            Err(RemoteError::Api { status: 404, .. }) => Err(RemoteError::WorkspaceNotFound {
                organization: organization.to_string(),
                workspace: name.to_string(),
            }),
            Err(err) => Err(err),
        }
    }

    /// List every workspace in the organization, following pagination.
    pub async fn list_workspaces(&self, organization: &str) -> Result<Vec<Workspace>, RemoteError> {
        let mut workspaces = Vec::new();
        let mut page = 1u32;

        loop {
            let url = format!(
                "{}/api/v2/organizations/{}/workspaces?page[number]={}&page[size]={}",
                self.base_url,
                urlencoding::encode(organization),
                page,
                DEFAULT_PAGE_SIZE
            );
            let collection: ApiCollection<WorkspaceData> = self.get_json(&url).await?;
            workspaces.extend(collection.data.into_iter().map(Workspace::from));

            match collection
                .meta
                .and_then(|meta| meta.pagination)
                .and_then(|pagination| pagination.next_page)
            {
                Some(next) => page = next,
                None => break,
            }
        }

        tracing::debug!(organization = %organization, count = workspaces.len(), "workspaces listed");
        Ok(workspaces)
    }

    /// Identifier and download location of a workspace's current state
    /// snapshot.
    pub async fn current_state_version(
        &self,
        workspace_id: &str,
    ) -> Result<StateVersion, RemoteError> {
        let url = format!(
            "{}/api/v2/workspaces/{}/current-state-version",
            self.base_url,
            urlencoding::encode(workspace_id)
        );
        let doc: ApiDocument<StateVersionData> = self.get_json(&url).await?;
        Ok(doc.data.into())
    }

    /// Download a state payload from its (signed) URL.
    pub async fn download_state(&self, url: &str) -> Result<Vec<u8>, RemoteError> {
        let response = self.get_with_retry(url).await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|err| RemoteError::Api {
            status,
            message: format!("failed to read state payload: {err}"),
        })?;
        Ok(bytes.to_vec())
    }

    /// The two-call fetch for one workspace: resolve the current state
    /// version, then download its payload.
    pub async fn fetch_current_state(&self, workspace_id: &str) -> Result<Vec<u8>, RemoteError> {
        let version = self.current_state_version(workspace_id).await?;
        tracing::debug!(
            workspace_id = %workspace_id,
            state_version = %version.id,
            "downloading state payload"
        );
        self.download_state(&version.download_url).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, RemoteError> {
        let response = self.get_with_retry(url).await?;
        let status = response.status().as_u16();
        response.json::<T>().await.map_err(|err| RemoteError::Api {
            status,
            message: format!("failed to parse backend response: {err}"),
        })
    }

    async fn get_with_retry(&self, url: &str) -> Result<reqwest::Response, RemoteError> {
        let mut attempt = 1u32;

        loop {
            if self.cancel.is_cancelled() {
                return Err(RemoteError::Cancelled);
            }

            let outcome = tokio::select! {
                _ = self.cancel.cancelled() => return Err(RemoteError::Cancelled),
                result = self.client.get(url).send() => result,
            };

            let error = match outcome {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }
                    let status = status.as_u16();
                    let message = read_error_message(response).await;
                    match status {
                        401 | 403 => return Err(RemoteError::Auth { message }),
                        429 | 500..=599 => RemoteError::Api { status, message },
                        _ => return Err(RemoteError::Api { status, message }),
                    }
                }
                Err(err) if err.is_timeout() || err.is_connect() => RemoteError::Network(err),
                Err(err) => return Err(RemoteError::Network(err)),
            };

            if attempt >= self.retry_attempts {
                return Err(match error {
                    RemoteError::Network(err) if err.is_timeout() => RemoteError::Timeout {
                        attempts: attempt,
                    },
                    other => other,
                });
            }

            let delay = backoff_delay(attempt);
            tracing::debug!(
                %url,
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "transient backend failure, retrying"
            );
            tokio::select! {
                _ = self.cancel.cancelled() => return Err(RemoteError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
            attempt += 1;
        }
    }
}

async fn read_error_message(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<ErrorDocument>().await {
        Ok(doc) => doc
            .message()
            .unwrap_or_else(|| format!("HTTP {status}")),
        Err(_) => format!("HTTP {status}"),
    }
}

fn backoff_delay(attempt: u32) -> Duration {
    let doubled = BACKOFF_BASE_MS.saturating_mul(1 << attempt.min(6).saturating_sub(1));
    Duration::from_millis(doubled.min(BACKOFF_CAP_MS))
}

impl std::fmt::Debug for RemoteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("retry_attempts", &self.retry_attempts)
            .finish()
    }
}
