// Shared types: storage providers and the error type every storage call returns

use std::path::PathBuf;
use std::str::FromStr;

use s3::error::S3Error;

/// Which backend a [`crate::config::StorageConfig`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    S3,
    Gcs,
    Local,
}

impl std::fmt::Display for StorageProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageProvider::S3 => write!(f, "s3"),
            StorageProvider::Gcs => write!(f, "gcs"),
            StorageProvider::Local => write!(f, "local"),
        }
    }
}

impl FromStr for StorageProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s3" => Ok(StorageProvider::S3),
            "gcs" | "google" => Ok(StorageProvider::Gcs),
            "local" | "fs" => Ok(StorageProvider::Local),
            other => Err(anyhow::anyhow!("Unsupported storage provider: {}", other)),
        }
    }
}

/// Errors are never translated: library errors pass through with their own
/// message, and only conditions raised by this crate get a variant of their own.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error(transparent)]
    S3(#[from] S3Error),

    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Blob {blob} is not valid UTF-8: {source}")]
    InvalidUtf8 {
        blob: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("No such blob: {bucket}/{blob}")]
    NotFound { bucket: String, blob: String },
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;
