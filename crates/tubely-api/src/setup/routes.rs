//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;
use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tubely_core::{Config, ThumbnailStorage};
use utoipa::OpenApi;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let video_routes = Router::new()
        .route(
            "/videos/{video_id}/thumbnail",
            post(handlers::thumbnail_upload::upload_thumbnail).layer(RequestBodyLimitLayer::new(
                body_limit(config.max_thumbnail_size_bytes),
            )),
        )
        .route(
            "/videos/{video_id}/video",
            post(handlers::video_upload::upload_video).layer(RequestBodyLimitLayer::new(
                body_limit(config.max_video_size_bytes),
            )),
        )
        .route("/videos/{video_id}", get(handlers::video_get::get_video))
        // Uploads are capped per route above and per part by the materializers.
        .layer(DefaultBodyLimit::disable())
        .with_state(state.clone());

    let mut app = Router::new()
        .route(
            "/health",
            get({
                let state = state.clone();
                move || {
                    let state = state.clone();
                    async move { handlers::health::health_check(state).await }
                }
            }),
        )
        .route(
            "/api/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .merge(video_routes);

    if config.thumbnail_storage == ThumbnailStorage::Local {
        tracing::info!(
            path_prefix = %config.assets_path_prefix,
            assets_root = %config.assets_root.display(),
            "Serving local assets"
        );
        app = app.nest_service(
            &config.assets_path_prefix,
            ServeDir::new(&config.assets_root),
        );
    }

    Ok(app.layer(cors).layer(TraceLayer::new_for_http()))
}

fn body_limit(max_file_bytes: u64) -> usize {
    usize::try_from(max_file_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES)).unwrap_or(usize::MAX)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin '{}'", o))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
