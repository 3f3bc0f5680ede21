// Local filesystem backend: a bucket is a directory under the root, a blob a file inside it

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::{BucketHandle, StorageClient};
use crate::config::StorageConfig;
use crate::types::{StorageError, StorageProvider, StorageResult};

/// Append `name` below `base`, keeping only its normal components so that
/// absolute names and `..` never leave `base`.
fn join_contained(base: &Path, name: &str) -> PathBuf {
    let mut path = base.to_path_buf();
    for component in Path::new(name).components() {
        if let Component::Normal(part) = component {
            path.push(part);
        }
    }
    path
}

#[derive(Debug, Clone)]
pub struct LocalStorageClient {
    root: PathBuf,
}

impl LocalStorageClient {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &StorageConfig) -> anyhow::Result<Self> {
        if config.provider != StorageProvider::Local {
            anyhow::bail!("Storage provider {} is not served by the local client", config.provider);
        }
        Ok(Self::new(config.local_root.clone()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl StorageClient for LocalStorageClient {
    type Bucket = LocalBucket;

    fn bucket(&self, name: &str) -> StorageResult<LocalBucket> {
        Ok(LocalBucket {
            name: name.to_string(),
            dir: join_contained(&self.root, name),
        })
    }
}

#[derive(Debug, Clone)]
pub struct LocalBucket {
    name: String,
    dir: PathBuf,
}

impl LocalBucket {
    pub fn blob_path(&self, blob: &str) -> PathBuf {
        join_contained(&self.dir, blob)
    }

    async fn write_blob(&self, blob: &str, data: &[u8]) -> StorageResult<()> {
        let target = self.blob_path(blob);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io(parent, e))?;
        }
        fs::write(&target, data)
            .await
            .map_err(|e| StorageError::io(&target, e))
    }
}

#[async_trait]
impl BucketHandle for LocalBucket {
    fn name(&self) -> &str {
        &self.name
    }

    async fn upload_from_filename(&self, blob: &str, path: &Path) -> StorageResult<()> {
        let data = fs::read(path).await.map_err(|e| StorageError::io(path, e))?;
        debug!(bucket = %self.name, blob, source = %path.display(), "local upload from file");
        self.write_blob(blob, &data).await
    }

    // Files carry no metadata, so the content type is dropped.
    async fn upload_from_string(
        &self,
        blob: &str,
        data: &str,
        _content_type: Option<&str>,
    ) -> StorageResult<()> {
        debug!(bucket = %self.name, blob, bytes = data.len(), "local upload");
        self.write_blob(blob, data.as_bytes()).await
    }

    async fn download_as_bytes(&self, blob: &str) -> StorageResult<Vec<u8>> {
        let path = self.blob_path(blob);
        debug!(bucket = %self.name, blob, "local download");
        fs::read(&path).await.map_err(|e| StorageError::io(&path, e))
    }
}
