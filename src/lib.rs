// Bucket IO - helpers for moving blobs in and out of cloud object storage

pub mod app;
pub mod config;
pub mod storage;
pub mod types;
pub mod utils;

// Re-exports for convenience
pub use config::StorageConfig;
pub use storage::{
    Blob, BucketHandle, LocalStorageClient, MemoryStorageClient, S3StorageClient, StorageClient,
    StorageFacade,
};
pub use types::{StorageError, StorageProvider, StorageResult};
pub use utils::{add_one, double};
