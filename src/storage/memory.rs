// In-memory storage backend, shared across clones of the client

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::{BucketHandle, StorageClient};
use crate::types::{StorageError, StorageResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: Option<String>,
    /// Local file the object was uploaded from, if any.
    pub source_path: Option<PathBuf>,
}

type ObjectMap = HashMap<(String, String), StoredObject>;

#[derive(Clone, Default)]
pub struct MemoryStorageClient {
    objects: Arc<RwLock<ObjectMap>>,
}

impl MemoryStorageClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn object(&self, bucket: &str, blob: &str) -> Option<StoredObject> {
        let guard = self.objects.read().await;
        guard.get(&(bucket.to_string(), blob.to_string())).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

impl StorageClient for MemoryStorageClient {
    type Bucket = MemoryBucket;

    fn bucket(&self, name: &str) -> StorageResult<MemoryBucket> {
        Ok(MemoryBucket {
            name: name.to_string(),
            objects: Arc::clone(&self.objects),
        })
    }
}

pub struct MemoryBucket {
    name: String,
    objects: Arc<RwLock<ObjectMap>>,
}

impl MemoryBucket {
    async fn store(&self, blob: &str, object: StoredObject) {
        let mut guard = self.objects.write().await;
        guard.insert((self.name.clone(), blob.to_string()), object);
    }
}

#[async_trait]
impl BucketHandle for MemoryBucket {
    fn name(&self) -> &str {
        &self.name
    }

    async fn upload_from_filename(&self, blob: &str, path: &Path) -> StorageResult<()> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| StorageError::io(path, e))?;
        debug!(bucket = %self.name, blob, bytes = data.len(), "memory upload from file");

        self.store(
            blob,
            StoredObject {
                data,
                content_type: None,
                source_path: Some(path.to_path_buf()),
            },
        )
        .await;
        Ok(())
    }

    async fn upload_from_string(
        &self,
        blob: &str,
        data: &str,
        content_type: Option<&str>,
    ) -> StorageResult<()> {
        debug!(bucket = %self.name, blob, bytes = data.len(), "memory upload");

        self.store(
            blob,
            StoredObject {
                data: data.as_bytes().to_vec(),
                content_type: content_type.map(str::to_string),
                source_path: None,
            },
        )
        .await;
        Ok(())
    }

    async fn download_as_bytes(&self, blob: &str) -> StorageResult<Vec<u8>> {
        let guard = self.objects.read().await;
        guard
            .get(&(self.name.clone(), blob.to_string()))
            .map(|object| object.data.clone())
            .ok_or_else(|| StorageError::NotFound {
                bucket: self.name.clone(),
                blob: blob.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_objects() {
        let client = MemoryStorageClient::new();
        let other = client.clone();

        let bucket = client.bucket("shared").unwrap();
        bucket
            .upload_from_string("note.txt", "hello", Some("text/plain"))
            .await
            .unwrap();

        let stored = other.object("shared", "note.txt").await.unwrap();
        assert_eq!(stored.data, b"hello");
        assert_eq!(stored.content_type.as_deref(), Some("text/plain"));
        assert!(stored.source_path.is_none());
        assert_eq!(other.len().await, 1);
    }

    #[tokio::test]
    async fn test_buckets_are_isolated() {
        let client = MemoryStorageClient::new();
        let first = client.bucket("first").unwrap();
        let second = client.bucket("second").unwrap();

        first.upload_from_string("a", "1", None).await.unwrap();

        let err = second.download_as_bytes("a").await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::NotFound { ref bucket, ref blob } if bucket == "second" && blob == "a"
        ));
    }

    #[tokio::test]
    async fn test_missing_source_file_is_reported() {
        let client = MemoryStorageClient::new();
        let bucket = client.bucket("b").unwrap();

        let err = bucket
            .upload_from_filename("x", Path::new("/definitely/not/here.txt"))
            .await
            .unwrap_err();

        match err {
            StorageError::Io { path, source } => {
                assert_eq!(path, PathBuf::from("/definitely/not/here.txt"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(client.is_empty().await);
    }
}
