//! Resolving the caller and checking that they own the video they address.

use axum::http::HeaderMap;
use tubely_core::models::Video;
use tubely_core::AppError;
use uuid::Uuid;

use crate::auth::authenticate;
use crate::error::HttpAppError;
use crate::state::AppState;

/// A video the authenticated caller is allowed to modify.
#[derive(Debug)]
pub struct OwnedVideo {
    pub video: Video,
    pub user_id: Uuid,
}

/// Parse the path ID, authenticate the caller and load the video, in that order.
///
/// Nothing from the request body has been read when this returns.
pub async fn authorize_owner(
    state: &AppState,
    raw_video_id: &str,
    headers: &HeaderMap,
) -> Result<OwnedVideo, HttpAppError> {
    let video_id = Uuid::parse_str(raw_video_id)
        .map_err(|_| AppError::BadRequest(format!("Invalid ID '{}'", raw_video_id)))?;

    let user_id = authenticate(headers, &state.config.jwt_secret)?;

    let video = state
        .videos
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

    if !video.is_owned_by(user_id) {
        return Err(AppError::Forbidden(format!(
            "User {} does not own video {}",
            user_id, video_id
        ))
        .into());
    }

    Ok(OwnedVideo { video, user_id })
}
