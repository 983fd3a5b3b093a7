use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::source::StateSource;

#[derive(Debug, Error)]
pub enum LocalError {
    #[error("state file not found: '{path}'")]
    NotFound { path: PathBuf },

    #[error("failed to read state file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Reads a state document from a filesystem path.
///
/// Performs no interpretation of the content; relative paths resolve against
/// the process working directory.
#[derive(Debug, Clone)]
pub struct LocalSource {
    path: PathBuf,
}

impl LocalSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StateSource for LocalSource {
    fn describe(&self) -> String {
        format!("local state file '{}'", self.path.display())
    }

    async fn load(&self) -> Result<Vec<u8>, crate::Error> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LocalError::NotFound {
                    path: self.path.clone(),
                }
            } else {
                LocalError::Io {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "read state file");
        Ok(bytes)
    }
}
