#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{
    AssetMaterializer, InlineMaterializer, LocalDiskMaterializer, ObjectStoreMaterializer,
    Storage, StorageBackend, StorageError, StorageResult,
};
use std::sync::Arc;
use tubely_core::{Config, ThumbnailStorage};

/// Create the video storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.video_storage_backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket()
                .map(String::from)
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.s3_region().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;
            let endpoint = config.s3_endpoint().map(String::from);

            let storage = S3Storage::new(bucket, region, endpoint).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config
                .local_storage_path()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
                })?;
            let base_url = config
                .local_storage_base_url()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
                })?;

            let storage = LocalStorage::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

/// Materializer for thumbnails, selected by `THUMBNAIL_STORAGE`.
pub async fn create_thumbnail_materializer(config: &Config) -> StorageResult<AssetMaterializer> {
    match config.thumbnail_storage {
        ThumbnailStorage::Inline => Ok(AssetMaterializer::Inline(InlineMaterializer)),
        ThumbnailStorage::Local => {
            let materializer = LocalDiskMaterializer::new(
                config.assets_root.clone(),
                &config.public_base_url,
                &config.assets_path_prefix,
            )
            .await?;
            Ok(AssetMaterializer::LocalDisk(materializer))
        }
    }
}

/// Materializer for videos. Always streams to the given object storage backend.
pub fn create_video_materializer(config: &Config, storage: Arc<dyn Storage>) -> AssetMaterializer {
    AssetMaterializer::ObjectStore(ObjectStoreMaterializer::new(
        storage,
        config.scratch_dir.clone(),
    ))
}
