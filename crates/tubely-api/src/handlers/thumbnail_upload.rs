use crate::error::{ErrorResponse, HttpAppError};
use crate::services::upload::UploadService;
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::HeaderMap,
    Json,
};
use std::sync::Arc;
use tubely_core::models::Video;
use tubely_core::UploadKind;

#[utoipa::path(
    post,
    path = "/videos/{video_id}/thumbnail",
    tag = "videos",
    params(
        ("video_id" = String, Path, description = "Video ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Form field `thumbnail`: image/png or image/jpeg"),
    responses(
        (status = 200, description = "Thumbnail stored", body = Video),
        (status = 400, description = "Invalid ID, body or content type", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "Unsupported media type", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Video>, HttpAppError> {
    let video = UploadService::new(&state)
        .upload(&video_id, &headers, multipart, UploadKind::Thumbnail)
        .await?;
    Ok(Json(video))
}
