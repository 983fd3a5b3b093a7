use serde::Deserialize;

/// Page size used when listing an organization's workspaces.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Envelope of a single-resource JSON:API response.
#[derive(Debug, Deserialize)]
pub struct ApiDocument<T> {
    pub data: T,
}

/// Envelope of a collection JSON:API response.
#[derive(Debug, Deserialize)]
pub struct ApiCollection<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Meta {
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct Pagination {
    #[allow(dead_code)] // NOTE: Used in tests and pagination diagnostics
    pub current_page: Option<u32>,
    pub next_page: Option<u32>,
    #[allow(dead_code)] // NOTE: Used in tests and pagination diagnostics
    pub total_pages: Option<u32>,
}

/// Error body shape used by the backend for non-success responses.
#[derive(Debug, Deserialize, Default)]
pub struct ErrorDocument {
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub status: Option<String>,
    pub title: Option<String>,
    pub detail: Option<String>,
}

impl ErrorDocument {
    /// Best human-readable message in the error body, if any.
    pub fn message(&self) -> Option<String> {
        self.errors.first().map(|error| {
            match (&error.title, &error.detail) {
                (Some(title), Some(detail)) => format!("{title}: {detail}"),
                (Some(title), None) => title.clone(),
                (None, Some(detail)) => detail.clone(),
                (None, None) => match &error.status {
                    Some(status) => format!("HTTP {status}"),
                    None => "unknown error".to_string(),
                },
            }
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct WorkspaceData {
    pub id: String,
    pub attributes: WorkspaceAttributes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WorkspaceAttributes {
    pub name: String,
}

/// A remote workspace resolved through the backend API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub id: String,
    pub name: String,
}

impl Workspace {
    /// The short name used to key prefix-mode results: the full name with
    /// the prefix stripped.
    pub fn short_name(&self, prefix: &str) -> Option<&str> {
        self.name.strip_prefix(prefix)
    }
}

impl From<WorkspaceData> for Workspace {
    fn from(data: WorkspaceData) -> Self {
        Self {
            id: data.id,
            name: data.attributes.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StateVersionData {
    pub id: String,
    pub attributes: StateVersionAttributes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StateVersionAttributes {
    /// Signed URL of the raw state payload for this version.
    pub hosted_state_download_url: String,
    #[serde(default)]
    pub serial: Option<u64>,
}

/// The current state snapshot of a workspace: its version identifier and
/// where to download the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateVersion {
    pub id: String,
    pub download_url: String,
    pub serial: Option<u64>,
}

impl From<StateVersionData> for StateVersion {
    fn from(data: StateVersionData) -> Self {
        Self {
            id: data.id,
            download_url: data.attributes.hosted_state_download_url,
            serial: data.attributes.serial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_deserialization() {
        let json = r#"{
            "data": {
                "id": "ws-61f1inbBVHDvRsGz",
                "type": "workspaces",
                "attributes": {"name": "networking-prod", "locked": false}
            }
        }"#;
        let doc: ApiDocument<WorkspaceData> = serde_json::from_str(json).unwrap();
        let workspace = Workspace::from(doc.data);
        assert_eq!(workspace.id, "ws-61f1inbBVHDvRsGz");
        assert_eq!(workspace.name, "networking-prod");
    }

    #[test]
    fn test_workspace_short_name() {
        let workspace = Workspace {
            id: "ws-1".to_string(),
            name: "networking-prod".to_string(),
        };
        assert_eq!(workspace.short_name("networking-"), Some("prod"));
        assert_eq!(workspace.short_name("app-"), None);
    }

    #[test]
    fn test_state_version_deserialization_kebab_case() {
        let json = r#"{
            "data": {
                "id": "sv-g4rqST72reoHMM5a",
                "type": "state-versions",
                "attributes": {
                    "hosted-state-download-url": "https://archivist.example.com/v1/object/abc",
                    "serial": 9,
                    "vcs-commit-sha": "ignored"
                }
            }
        }"#;
        let doc: ApiDocument<StateVersionData> = serde_json::from_str(json).unwrap();
        let version = StateVersion::from(doc.data);
        assert_eq!(version.id, "sv-g4rqST72reoHMM5a");
        assert_eq!(version.download_url, "https://archivist.example.com/v1/object/abc");
        assert_eq!(version.serial, Some(9));
    }

    #[test]
    fn test_collection_pagination() {
        let json = r#"{
            "data": [],
            "meta": {"pagination": {"current-page": 1, "next-page": 2, "total-pages": 3}}
        }"#;
        let collection: ApiCollection<WorkspaceData> = serde_json::from_str(json).unwrap();
        let pagination = collection.meta.unwrap().pagination.unwrap();
        assert_eq!(pagination.next_page, Some(2));
        assert_eq!(pagination.total_pages, Some(3));
    }

    #[test]
    fn test_error_document_message_shapes() {
        let doc: ErrorDocument = serde_json::from_str(
            r#"{"errors": [{"status": "404", "title": "not found", "detail": "resource missing"}]}"#,
        )
        .unwrap();
        assert_eq!(doc.message().unwrap(), "not found: resource missing");

        let doc: ErrorDocument =
            serde_json::from_str(r#"{"errors": [{"status": "401", "title": "unauthorized"}]}"#)
                .unwrap();
        assert_eq!(doc.message().unwrap(), "unauthorized");

        let doc: ErrorDocument = serde_json::from_str(r#"{"errors": []}"#).unwrap();
        assert!(doc.message().is_none());
    }
}
