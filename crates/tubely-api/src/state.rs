//! Shared application state

use std::sync::Arc;

use tubely_core::{Config, UploadKind};
use tubely_db::VideoStore;
use tubely_storage::AssetMaterializer;

/// Read-only after startup; cloned into every request through an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoStore>,
    pub thumbnail_materializer: AssetMaterializer,
    pub video_materializer: AssetMaterializer,
}

impl AppState {
    pub fn materializer(&self, kind: UploadKind) -> &AssetMaterializer {
        match kind {
            UploadKind::Thumbnail => &self.thumbnail_materializer,
            UploadKind::Video => &self.video_materializer,
        }
    }

    /// Per-part byte cap for an upload kind.
    pub fn max_upload_bytes(&self, kind: UploadKind) -> u64 {
        match kind {
            UploadKind::Thumbnail => self.config.max_thumbnail_size_bytes,
            UploadKind::Video => self.config.max_video_size_bytes,
        }
    }
}
