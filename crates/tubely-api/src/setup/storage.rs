//! Video storage backend setup

use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_storage::{create_storage, Storage};

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize video storage backend")?;

    tracing::info!(
        backend = %storage.backend_type(),
        bucket = ?config.s3_bucket(),
        region = ?config.s3_region(),
        "Video storage initialized"
    );

    Ok(storage)
}
