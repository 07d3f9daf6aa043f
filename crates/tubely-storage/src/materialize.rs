//! Asset materializers
//!
//! A materializer takes the validated bytes of one upload and produces a URL that
//! resolves to them. The upload handlers only ever call [`AssetMaterializer::materialize`];
//! which variant runs is decided once at startup from configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt};
use uuid::Uuid;

use crate::keys::random_key;
use crate::temp::ScratchFile;
use crate::traits::{Storage, StorageError, StorageResult};

/// Per-upload parameters.
#[derive(Debug, Clone, Copy)]
pub struct MaterializeRequest<'a> {
    /// Accepted media type without parameters, e.g. `image/png`.
    pub media_type: &'a str,
    /// Canonical extension derived from the media type, e.g. `png`.
    pub extension: &'a str,
    pub resource_id: Uuid,
    pub owner_id: Uuid,
    /// Reading more than this many bytes fails with `StorageError::TooLarge`.
    pub max_bytes: u64,
}

/// Where the bytes of a materialized asset live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetLocation {
    /// Inside the URL itself.
    Inline,
    LocalDisk { path: PathBuf },
    ObjectStore { key: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedAsset {
    pub url: String,
    pub location: AssetLocation,
}

#[derive(Clone)]
pub enum AssetMaterializer {
    Inline(InlineMaterializer),
    LocalDisk(LocalDiskMaterializer),
    ObjectStore(ObjectStoreMaterializer),
}

impl AssetMaterializer {
    #[tracing::instrument(
        skip(self, reader, request),
        fields(
            strategy = self.strategy(),
            video_id = %request.resource_id,
            user_id = %request.owner_id,
            media_type = %request.media_type,
        )
    )]
    pub async fn materialize<R>(
        &self,
        reader: &mut R,
        request: &MaterializeRequest<'_>,
    ) -> StorageResult<MaterializedAsset>
    where
        R: AsyncRead + Send + Unpin + ?Sized,
    {
        match self {
            AssetMaterializer::Inline(inner) => inner.materialize(reader, request).await,
            AssetMaterializer::LocalDisk(inner) => inner.materialize(reader, request).await,
            AssetMaterializer::ObjectStore(inner) => inner.materialize(reader, request).await,
        }
    }

    pub fn strategy(&self) -> &'static str {
        match self {
            AssetMaterializer::Inline(_) => "inline",
            AssetMaterializer::LocalDisk(_) => "local_disk",
            AssetMaterializer::ObjectStore(_) => "object_store",
        }
    }
}

/// Encodes the upload as a `data:` URI. Nothing is written anywhere.
#[derive(Debug, Clone, Default)]
pub struct InlineMaterializer;

impl InlineMaterializer {
    pub async fn materialize<R>(
        &self,
        reader: &mut R,
        request: &MaterializeRequest<'_>,
    ) -> StorageResult<MaterializedAsset>
    where
        R: AsyncRead + Send + Unpin + ?Sized,
    {
        let mut data = Vec::new();
        reader
            .take(request.max_bytes.saturating_add(1))
            .read_to_end(&mut data)
            .await
            .map_err(StorageError::SourceRead)?;

        if data.len() as u64 > request.max_bytes {
            return Err(StorageError::TooLarge {
                limit: request.max_bytes,
            });
        }

        tracing::debug!(size_bytes = data.len(), "Encoded upload as data URI");

        Ok(MaterializedAsset {
            url: format!("data:{};base64,{}", request.media_type, STANDARD.encode(&data)),
            location: AssetLocation::Inline,
        })
    }
}

/// Writes `<resource_id>.<extension>` under the assets root, which the server exposes
/// at `<public_base_url><path_prefix>/`.
///
/// Uploads are spooled in a sibling `<assets_root>.partial` directory and renamed into
/// place once complete, so a partial file is never reachable through the static route.
#[derive(Debug, Clone)]
pub struct LocalDiskMaterializer {
    assets_root: PathBuf,
    staging_dir: PathBuf,
    public_base_url: String,
    path_prefix: String,
}

impl LocalDiskMaterializer {
    pub async fn new(
        assets_root: impl Into<PathBuf>,
        public_base_url: &str,
        path_prefix: &str,
    ) -> StorageResult<Self> {
        let assets_root = assets_root.into();

        fs::create_dir_all(&assets_root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create assets directory {}: {}",
                assets_root.display(),
                e
            ))
        })?;

        let staging_dir = staging_dir_for(&assets_root).await?;
        fs::create_dir_all(&staging_dir).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create staging directory {}: {}",
                staging_dir.display(),
                e
            ))
        })?;

        Ok(LocalDiskMaterializer {
            assets_root,
            staging_dir,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            path_prefix: path_prefix.trim_end_matches('/').to_string(),
        })
    }

    pub async fn materialize<R>(
        &self,
        reader: &mut R,
        request: &MaterializeRequest<'_>,
    ) -> StorageResult<MaterializedAsset>
    where
        R: AsyncRead + Send + Unpin + ?Sized,
    {
        if request.extension.is_empty()
            || !request
                .extension
                .chars()
                .all(|c| c.is_ascii_alphanumeric())
        {
            return Err(StorageError::InvalidKey(format!(
                "Invalid file extension '{}'",
                request.extension
            )));
        }

        let start = std::time::Instant::now();
        let filename = format!("{}.{}", request.resource_id, request.extension);
        let path = self.assets_root.join(&filename);

        let mut scratch = ScratchFile::create_in(&self.staging_dir)?;
        let size = scratch.fill_from(reader, request.max_bytes).await?;
        scratch.persist(&path).await?;

        tracing::info!(
            path = %path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Stored asset on local disk"
        );

        Ok(MaterializedAsset {
            url: format!("{}{}/{}", self.public_base_url, self.path_prefix, filename),
            location: AssetLocation::LocalDisk { path },
        })
    }
}

/// `<parent>/<name>.partial` next to the assets root. The assets root is resolved first
/// so that relative roots such as `.` still have a name and a parent.
async fn staging_dir_for(assets_root: &Path) -> StorageResult<PathBuf> {
    let resolved = fs::canonicalize(assets_root).await?;
    let name = resolved.file_name().ok_or_else(|| {
        StorageError::ConfigError(format!(
            "Assets root {} must not be the filesystem root",
            resolved.display()
        ))
    })?;

    let mut staging_name = name.to_os_string();
    staging_name.push(".partial");
    Ok(resolved.with_file_name(staging_name))
}

/// Spools the upload to a scratch file, then streams it to a [`Storage`] backend under
/// a fresh random key.
#[derive(Clone)]
pub struct ObjectStoreMaterializer {
    storage: Arc<dyn Storage>,
    scratch_dir: PathBuf,
}

impl ObjectStoreMaterializer {
    pub fn new(storage: Arc<dyn Storage>, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage,
            scratch_dir: scratch_dir.into(),
        }
    }

    pub async fn materialize<R>(
        &self,
        reader: &mut R,
        request: &MaterializeRequest<'_>,
    ) -> StorageResult<MaterializedAsset>
    where
        R: AsyncRead + Send + Unpin + ?Sized,
    {
        let start = std::time::Instant::now();

        let mut scratch = ScratchFile::create_in(&self.scratch_dir)?;
        let size = scratch.fill_from(reader, request.max_bytes).await?;
        scratch.rewind().await?;

        tracing::debug!(
            path = %scratch.path().display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Spooled upload to scratch file"
        );

        let key = random_key(request.extension);
        let url = self
            .storage
            .upload_stream(&key, request.media_type, Some(size), scratch.reader())
            .await?;

        Ok(MaterializedAsset {
            url,
            location: AssetLocation::ObjectStore { key },
        })
    }
}
