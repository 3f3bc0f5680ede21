// S3-compatible storage backend (AWS S3, Google Cloud Storage interop, MinIO, ...)

use anyhow::Result;
use async_trait::async_trait;
use s3::creds::Credentials;
use s3::region::Region;
use s3::Bucket;
use std::path::Path;
use tracing::{debug, info};

use super::{BucketHandle, StorageClient};
use crate::config::StorageConfig;
use crate::types::{StorageError, StorageProvider, StorageResult};

#[derive(Clone)]
pub struct S3StorageClient {
    region: Region,
    credentials: Credentials,
    path_style: bool,
}

impl S3StorageClient {
    pub fn new(region: Region, credentials: Credentials, path_style: bool) -> Self {
        Self {
            region,
            credentials,
            path_style,
        }
    }

    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        if config.provider == StorageProvider::Local {
            anyhow::bail!("Storage provider {} is not served by the S3 client", config.provider);
        }

        let region = match config.resolved_endpoint() {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint,
            },
            None => config.region.parse()?,
        };

        let credentials = match (&config.access_key_id, &config.secret_access_key) {
            (Some(access_key), Some(secret_key)) => Credentials::new(
                Some(access_key.as_str()),
                Some(secret_key.as_str()),
                None,
                None,
                None,
            )?,
            _ => Credentials::default()?,
        };

        info!(
            "S3 storage client configured: provider={}, region={:?}, path_style={}",
            config.provider, region, config.path_style
        );
        Ok(Self::new(region, credentials, config.path_style))
    }
}

impl StorageClient for S3StorageClient {
    type Bucket = S3Bucket;

    fn bucket(&self, name: &str) -> StorageResult<S3Bucket> {
        let mut bucket = Bucket::new(name, self.region.clone(), self.credentials.clone())?;
        if self.path_style {
            bucket = bucket.with_path_style();
        }

        Ok(S3Bucket {
            name: name.to_string(),
            bucket,
        })
    }
}

pub struct S3Bucket {
    name: String,
    bucket: Bucket,
}

#[async_trait]
impl BucketHandle for S3Bucket {
    fn name(&self) -> &str {
        &self.name
    }

    async fn upload_from_filename(&self, blob: &str, path: &Path) -> StorageResult<()> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| StorageError::io(path, e))?;
        debug!(bucket = %self.name, blob, source = %path.display(), bytes = data.len(), "PUT object from file");

        self.bucket.put_object(blob, &data).await?;
        Ok(())
    }

    async fn upload_from_string(
        &self,
        blob: &str,
        data: &str,
        content_type: Option<&str>,
    ) -> StorageResult<()> {
        debug!(bucket = %self.name, blob, bytes = data.len(), content_type, "PUT object");

        match content_type {
            Some(content_type) => {
                self.bucket
                    .put_object_with_content_type(blob, data.as_bytes(), content_type)
                    .await?;
            }
            None => {
                self.bucket.put_object(blob, data.as_bytes()).await?;
            }
        }
        Ok(())
    }

    async fn download_as_bytes(&self, blob: &str) -> StorageResult<Vec<u8>> {
        debug!(bucket = %self.name, blob, "GET object");

        let response = self.bucket.get_object(blob).await?;
        Ok(response.bytes().to_vec())
    }
}
