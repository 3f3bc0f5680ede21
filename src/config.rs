use anyhow::Result;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::types::StorageProvider;

pub const GCS_ENDPOINT: &str = "https://storage.googleapis.com";

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub provider: StorageProvider,
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub path_style: bool,
    pub local_root: PathBuf,
}

impl StorageConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (the process environment
    /// in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            provider: lookup("STORAGE_PROVIDER")
                .unwrap_or_else(|| "s3".to_string())
                .parse()?,
            region: lookup("STORAGE_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            endpoint: lookup("STORAGE_ENDPOINT"),
            access_key_id: lookup("STORAGE_ACCESS_KEY_ID")
                .or_else(|| lookup("AWS_ACCESS_KEY_ID")),
            secret_access_key: lookup("STORAGE_SECRET_ACCESS_KEY")
                .or_else(|| lookup("AWS_SECRET_ACCESS_KEY")),
            path_style: lookup("STORAGE_PATH_STYLE")
                .unwrap_or_else(|| "false".to_string())
                .parse()?,
            local_root: lookup("STORAGE_LOCAL_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./buckets")),
        })
    }

    /// Endpoint to talk to, if the provider is not plain AWS S3.
    pub fn resolved_endpoint(&self) -> Option<String> {
        match (&self.endpoint, self.provider) {
            (Some(endpoint), _) => Some(endpoint.clone()),
            (None, StorageProvider::Gcs) => Some(GCS_ENDPOINT.to_string()),
            (None, _) => None,
        }
    }
}
