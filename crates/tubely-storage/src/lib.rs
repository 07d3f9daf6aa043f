//! Tubely Storage Library
//!
//! This crate provides the storage abstraction for uploaded media and the strategies
//! that turn an upload stream into a resolvable URL.
//!
//! # Pieces
//!
//! - [`Storage`]: a blob backend (S3 through `object_store`, or the local filesystem)
//!   that streams a reader to a key and knows the public URL of that key.
//! - [`ScratchFile`]: a request-scoped temporary file deleted when dropped.
//! - [`AssetMaterializer`]: inline `data:` URIs, files under the assets root, or
//!   objects in a [`Storage`] backend under random keys.
//!
//! Object keys are generated by the `keys` module and never contain `..` or a
//! leading `/`.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod materialize;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod temp;
pub mod traits;

// Re-export commonly used types
pub use factory::{create_storage, create_thumbnail_materializer, create_video_materializer};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use materialize::{
    AssetLocation, AssetMaterializer, InlineMaterializer, LocalDiskMaterializer,
    MaterializeRequest, MaterializedAsset, ObjectStoreMaterializer,
};
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use temp::{ScratchFile, SCRATCH_PREFIX};
pub use traits::{Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
