//! Assemble [`AppState`] from its already-constructed dependencies.

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoStore;
use tubely_storage::{create_thumbnail_materializer, create_video_materializer, Storage};

pub async fn initialize_services(
    config: Config,
    videos: Arc<dyn VideoStore>,
    video_storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    tokio::fs::create_dir_all(&config.scratch_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create scratch directory {}",
                config.scratch_dir.display()
            )
        })?;

    let thumbnail_materializer = create_thumbnail_materializer(&config)
        .await
        .context("Failed to initialize thumbnail storage")?;
    let video_materializer = create_video_materializer(&config, video_storage);

    tracing::info!(
        thumbnail_strategy = thumbnail_materializer.strategy(),
        video_strategy = video_materializer.strategy(),
        scratch_dir = %config.scratch_dir.display(),
        "Upload materializers ready"
    );

    Ok(Arc::new(AppState {
        config,
        videos,
        thumbnail_materializer,
        video_materializer,
    }))
}
