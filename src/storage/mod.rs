// Storage layer: clients hand out bucket handles, buckets hand out blob handles
// Backends: S3-compatible services (GCS interop included), a local directory tree, memory

use async_trait::async_trait;
use std::path::Path;

use crate::types::{StorageError, StorageResult};

pub mod facade;
pub mod local;
pub mod memory;
pub mod s3_client;

pub use facade::StorageFacade;
pub use local::{LocalBucket, LocalStorageClient};
pub use memory::{MemoryBucket, MemoryStorageClient, StoredObject};
pub use s3_client::{S3Bucket, S3StorageClient};

/// Entry point of a storage backend.
pub trait StorageClient: Send + Sync {
    type Bucket: BucketHandle;

    /// Obtain a handle on the named bucket. The name is not validated.
    fn bucket(&self, name: &str) -> StorageResult<Self::Bucket>;
}

#[async_trait]
pub trait BucketHandle: Send + Sync {
    fn name(&self) -> &str;

    /// Upload the local file at `path` as `blob`.
    async fn upload_from_filename(&self, blob: &str, path: &Path) -> StorageResult<()>;

    /// Upload `data` as the full contents of `blob`, tagged with
    /// `content_type` when one is given.
    async fn upload_from_string(
        &self,
        blob: &str,
        data: &str,
        content_type: Option<&str>,
    ) -> StorageResult<()>;

    /// Read the full contents of `blob`.
    async fn download_as_bytes(&self, blob: &str) -> StorageResult<Vec<u8>>;

    fn blob(&self, name: &str) -> Blob<'_, Self>
    where
        Self: Sized,
    {
        Blob::new(self, name)
    }
}

/// A named object inside a bucket.
pub struct Blob<'a, B: BucketHandle> {
    bucket: &'a B,
    name: String,
}

impl<'a, B: BucketHandle> Blob<'a, B> {
    pub fn new(bucket: &'a B, name: impl Into<String>) -> Self {
        Self {
            bucket,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bucket(&self) -> &B {
        self.bucket
    }

    pub async fn upload_from_filename(&self, path: impl AsRef<Path>) -> StorageResult<()> {
        self.bucket
            .upload_from_filename(&self.name, path.as_ref())
            .await
    }

    pub async fn upload_from_string(&self, data: &str) -> StorageResult<()> {
        self.bucket.upload_from_string(&self.name, data, None).await
    }

    pub async fn upload_from_string_with_content_type(
        &self,
        data: &str,
        content_type: &str,
    ) -> StorageResult<()> {
        self.bucket
            .upload_from_string(&self.name, data, Some(content_type))
            .await
    }

    pub async fn download_as_bytes(&self) -> StorageResult<Vec<u8>> {
        self.bucket.download_as_bytes(&self.name).await
    }

    /// Download the contents and decode them as UTF-8. No other processing.
    pub async fn download_as_string(&self) -> StorageResult<String> {
        let bytes = self.download_as_bytes().await?;
        String::from_utf8(bytes).map_err(|source| StorageError::InvalidUtf8 {
            blob: self.name.clone(),
            source,
        })
    }
}
