//! Application setup and initialization
//!
//! Everything `main` needs to turn a loaded [`Config`] into a running router.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use crate::state::AppState;
use anyhow::Result;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::{VideoRepository, VideoStore};

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_tracing(config.is_production());

    tracing::info!(
        environment = %config.environment,
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let videos: Arc<dyn VideoStore> = Arc::new(VideoRepository::new(pool));

    let video_storage = storage::setup_storage(&config).await?;

    let state = services::initialize_services(config, videos, video_storage).await?;

    let router = routes::setup_routes(&state.config, state.clone())?;

    Ok((state, router))
}
