// Storage facade: one call per upload/download, bucket and blob handles derived each time

use std::path::Path;
use tracing::debug;

use super::{BucketHandle, StorageClient};
use crate::types::StorageResult;

pub struct StorageFacade<C: StorageClient> {
    client: C,
}

impl<C: StorageClient> StorageFacade<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Uploads a local file to the bucket.
    pub async fn upload_blob_from_file(
        &self,
        bucket_name: &str,
        source_file_name: impl AsRef<Path>,
        destination_blob_name: &str,
    ) -> StorageResult<()> {
        let source = source_file_name.as_ref();
        debug!(bucket = bucket_name, blob = destination_blob_name, source = %source.display(), "upload_blob_from_file");

        let bucket = self.client.bucket(bucket_name)?;
        bucket
            .blob(destination_blob_name)
            .upload_from_filename(source)
            .await
    }

    /// Uploads in-memory contents to the bucket.
    pub async fn upload_blob_from_memory(
        &self,
        bucket_name: &str,
        contents: &str,
        destination_blob_name: &str,
    ) -> StorageResult<()> {
        debug!(bucket = bucket_name, blob = destination_blob_name, "upload_blob_from_memory");

        let bucket = self.client.bucket(bucket_name)?;
        bucket
            .blob(destination_blob_name)
            .upload_from_string(contents)
            .await
    }

    /// Uploads a JSON document to the bucket. The payload is sent as-is.
    pub async fn upload_json(
        &self,
        bucket_name: &str,
        json_data: &str,
        destination_blob_name: &str,
    ) -> StorageResult<()> {
        debug!(bucket = bucket_name, blob = destination_blob_name, "upload_json");

        let bucket = self.client.bucket(bucket_name)?;
        bucket
            .blob(destination_blob_name)
            .upload_from_string_with_content_type(json_data, mime::APPLICATION_JSON.essence_str())
            .await
    }

    /// Reads a JSON document from the bucket, returned unparsed.
    ///
    /// The contents are decoded as UTF-8; a blob holding anything else fails
    /// with [`StorageError::InvalidUtf8`](crate::types::StorageError::InvalidUtf8)
    /// instead of being returned as raw bytes.
    pub async fn read_json(&self, bucket_name: &str, source_blob_name: &str) -> StorageResult<String> {
        debug!(bucket = bucket_name, blob = source_blob_name, "read_json");

        let bucket = self.client.bucket(bucket_name)?;
        bucket.blob(source_blob_name).download_as_string().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{LocalStorageClient, MemoryStorageClient};
    use crate::types::StorageError;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Bucket(String),
        UploadFile { blob: String, path: PathBuf },
        UploadString { blob: String, data: String, content_type: Option<String> },
        Download { blob: String },
    }

    /// Records every call and answers downloads with a canned payload.
    #[derive(Clone, Default)]
    struct RecordingClient {
        calls: Arc<Mutex<Vec<Call>>>,
        canned: String,
    }

    struct RecordingBucket {
        name: String,
        calls: Arc<Mutex<Vec<Call>>>,
        canned: String,
    }

    impl StorageClient for RecordingClient {
        type Bucket = RecordingBucket;

        fn bucket(&self, name: &str) -> StorageResult<RecordingBucket> {
            self.calls.try_lock().unwrap().push(Call::Bucket(name.to_string()));
            Ok(RecordingBucket {
                name: name.to_string(),
                calls: Arc::clone(&self.calls),
                canned: self.canned.clone(),
            })
        }
    }

    #[async_trait]
    impl BucketHandle for RecordingBucket {
        fn name(&self) -> &str {
            &self.name
        }

        async fn upload_from_filename(&self, blob: &str, path: &Path) -> StorageResult<()> {
            self.calls.lock().await.push(Call::UploadFile {
                blob: blob.to_string(),
                path: path.to_path_buf(),
            });
            Ok(())
        }

        async fn upload_from_string(
            &self,
            blob: &str,
            data: &str,
            content_type: Option<&str>,
        ) -> StorageResult<()> {
            self.calls.lock().await.push(Call::UploadString {
                blob: blob.to_string(),
                data: data.to_string(),
                content_type: content_type.map(str::to_string),
            });
            Ok(())
        }

        async fn download_as_bytes(&self, blob: &str) -> StorageResult<Vec<u8>> {
            self.calls.lock().await.push(Call::Download { blob: blob.to_string() });
            Ok(self.canned.as_bytes().to_vec())
        }
    }

    #[tokio::test]
    async fn test_upload_file_forwards_path_and_destination() {
        let client = RecordingClient::default();
        let facade = StorageFacade::new(client.clone());

        facade
            .upload_blob_from_file("my-bucket", "./data/in put.csv", "dest/out.csv")
            .await
            .unwrap();

        let calls = client.calls.lock().await.clone();
        assert_eq!(
            calls,
            vec![
                Call::Bucket("my-bucket".to_string()),
                Call::UploadFile {
                    blob: "dest/out.csv".to_string(),
                    path: PathBuf::from("./data/in put.csv"),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_string_uploads_pass_data_unchanged() {
        let client = RecordingClient::default();
        let facade = StorageFacade::new(client.clone());
        let contents = "  line one\nline two \u{1F980}\n";

        facade.upload_blob_from_memory("b", contents, "notes.txt").await.unwrap();
        facade.upload_json("b", "{ \"k\" : [1, 2] }", "doc.json").await.unwrap();

        let calls = client.calls.lock().await.clone();
        assert_eq!(
            calls[1],
            Call::UploadString {
                blob: "notes.txt".to_string(),
                data: contents.to_string(),
                content_type: None,
            }
        );
        assert_eq!(
            calls[3],
            Call::UploadString {
                blob: "doc.json".to_string(),
                data: "{ \"k\" : [1, 2] }".to_string(),
                content_type: Some("application/json".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_bucket_handle_derived_per_call() {
        let client = RecordingClient::default();
        let facade = StorageFacade::new(client.clone());

        facade.upload_blob_from_memory("first", "x", "a").await.unwrap();
        facade.read_json("second", "b").await.unwrap();

        let buckets: Vec<Call> = client
            .calls
            .lock()
            .await
            .iter()
            .filter(|call| matches!(call, Call::Bucket(_)))
            .cloned()
            .collect();
        assert_eq!(
            buckets,
            vec![Call::Bucket("first".to_string()), Call::Bucket("second".to_string())]
        );
    }

    #[tokio::test]
    async fn test_read_json_returns_raw_contents() {
        // Not valid JSON on purpose: nothing is parsed.
        let client = RecordingClient {
            canned: "{\"a\": 1,,}".to_string(),
            ..Default::default()
        };
        let facade = StorageFacade::new(client);

        assert_eq!(facade.read_json("b", "broken.json").await.unwrap(), "{\"a\": 1,,}");
    }

    #[tokio::test]
    async fn test_json_round_trip_through_memory_client() {
        let facade = StorageFacade::new(MemoryStorageClient::new());

        facade.upload_json("b", "{\"a\":1}", "o.json").await.unwrap();
        assert_eq!(facade.read_json("b", "o.json").await.unwrap(), "{\"a\":1}");

        let stored = facade.client().object("b", "o.json").await.unwrap();
        assert_eq!(stored.content_type.as_deref(), Some("application/json"));

        let parsed: serde_json::Value = serde_json::from_str(&facade.read_json("b", "o.json").await.unwrap()).unwrap();
        assert_eq!(parsed["a"], 1);
    }

    #[tokio::test]
    async fn test_upload_file_round_trip_through_local_client() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let source = temp_dir.path().join("settings.json");
        std::fs::write(&source, "{\"debug\":true}").unwrap();

        let facade = StorageFacade::new(LocalStorageClient::new(temp_dir.path().join("root")));
        facade
            .upload_blob_from_file("config", &source, "prod/settings.json")
            .await
            .unwrap();

        assert_eq!(
            facade.read_json("config", "prod/settings.json").await.unwrap(),
            "{\"debug\":true}"
        );
    }

    #[tokio::test]
    async fn test_errors_propagate_unchanged() {
        let facade = StorageFacade::new(MemoryStorageClient::new());

        let err = facade.read_json("b", "absent.json").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));

        let err = facade
            .upload_blob_from_file("b", "/no/such/file.txt", "file.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }
}
