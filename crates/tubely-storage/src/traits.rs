//! Storage abstraction trait
//!
//! This module defines the Storage trait that all blob backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Upload exceeds the maximum size of {limit} bytes")]
    TooLarge { limit: u64 },

    /// The upload stream itself failed (client disconnect, malformed body, body limit).
    #[error("Failed to read upload: {0}")]
    SourceRead(#[source] std::io::Error),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) implement this trait so the
/// object-storage materializer can stream uploads without knowing where they go.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload everything `reader` yields under `storage_key` and return its public URL.
    ///
    /// The reader is consumed until EOF without being buffered in memory as a whole.
    /// `content_type` is stored with the object where the backend supports it.
    async fn upload_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        content_length: Option<u64>,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<String>;

    /// Public URL for a key. Pure, no I/O.
    fn public_url(&self, storage_key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
