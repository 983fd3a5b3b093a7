use std::time::Duration;

use super::RemoteError;

/// Well-known SaaS host used when no hostname is configured.
pub const DEFAULT_HOSTNAME: &str = "app.terraform.io";

/// Default deadline for a single backend request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default bound on attempts for transient failures.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Selects the remote workspace(s) to resolve: exactly one of an exact name
/// or a shared name prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceSelector {
    pub name: Option<String>,
    pub prefix: Option<String>,
}

impl WorkspaceSelector {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            prefix: None,
        }
    }

    pub fn by_prefix(prefix: impl Into<String>) -> Self {
        Self {
            name: None,
            prefix: Some(prefix.into()),
        }
    }
}

/// Coordinates and knobs for resolving state from a remote backend.
///
/// Validation runs before any network call so misconfiguration surfaces as a
/// configuration error instead of failing deep inside the network layer.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Backend hostname; defaults to the well-known SaaS host.
    pub hostname: String,
    /// Organization containing the targeted workspace(s).
    pub organization: String,
    /// Bearer token; optional because some backends accept anonymous reads.
    pub token: Option<String>,
    pub workspaces: WorkspaceSelector,
    /// Per-request deadline.
    pub timeout: Duration,
    /// Upper bound on attempts for transient failures.
    pub retry_attempts: u32,
}

impl RemoteConfig {
    pub fn new(organization: impl Into<String>, workspaces: WorkspaceSelector) -> Self {
        Self {
            hostname: DEFAULT_HOSTNAME.to_string(),
            organization: organization.into(),
            token: None,
            workspaces,
            timeout: DEFAULT_TIMEOUT,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
        }
    }

    /// Check the configuration before any I/O happens.
    pub fn validate(&self) -> Result<(), RemoteError> {
        if self.organization.is_empty() {
            return Err(RemoteError::Config {
                message: "organization must not be empty".to_string(),
            });
        }
        match (&self.workspaces.name, &self.workspaces.prefix) {
            (Some(_), Some(_)) => Err(RemoteError::Config {
                message: "workspace name and prefix are mutually exclusive; set exactly one"
                    .to_string(),
            }),
            (None, None) => Err(RemoteError::Config {
                message: "either a workspace name or a workspace prefix is required".to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Base URL of the backend API for the configured hostname.
    pub fn base_url(&self) -> String {
        format!("https://{}", self.hostname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RemoteConfig::new("acme", WorkspaceSelector::by_name("networking"));
        assert_eq!(config.hostname, DEFAULT_HOSTNAME);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.base_url(), "https://app.terraform.io");
    }

    #[test]
    fn test_validate_accepts_exactly_one_selector() {
        assert!(RemoteConfig::new("acme", WorkspaceSelector::by_name("n"))
            .validate()
            .is_ok());
        assert!(RemoteConfig::new("acme", WorkspaceSelector::by_prefix("p-"))
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_rejects_both_name_and_prefix() {
        let config = RemoteConfig::new(
            "acme",
            WorkspaceSelector {
                name: Some("networking".to_string()),
                prefix: Some("net-".to_string()),
            },
        );
        let err = config.validate().unwrap_err();
        assert!(matches!(err, RemoteError::Config { .. }));
        assert!(err.to_string().contains("mutually exclusive"));
    }

    #[test]
    fn test_validate_rejects_neither_selector() {
        let config = RemoteConfig::new("acme", WorkspaceSelector::default());
        let err = config.validate().unwrap_err();
        assert!(matches!(err, RemoteError::Config { .. }));
    }

    #[test]
    fn test_validate_rejects_empty_organization() {
        let config = RemoteConfig::new("", WorkspaceSelector::by_name("n"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("organization"));
    }

    #[test]
    fn test_custom_hostname_base_url() {
        let mut config = RemoteConfig::new("acme", WorkspaceSelector::by_name("n"));
        config.hostname = "tfe.internal.example.com".to_string();
        assert_eq!(config.base_url(), "https://tfe.internal.example.com");
    }
}
