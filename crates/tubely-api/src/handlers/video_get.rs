use crate::error::{ErrorResponse, HttpAppError};
use crate::services::access::authorize_owner;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use std::sync::Arc;
use tubely_core::models::Video;

#[utoipa::path(
    get,
    path = "/videos/{video_id}",
    tag = "videos",
    params(
        ("video_id" = String, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video record", body = Video),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Video>, HttpAppError> {
    let owned = authorize_owner(&state, &video_id, &headers).await?;
    Ok(Json(owned.video))
}
