//! Upload pipeline
//!
//! authorize → extract part → validate content type → materialize → persist URL.
//! Each step exits early; nothing is retried.

use std::io;
use std::time::Instant;

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::Multipart;
use axum::http::{HeaderMap, StatusCode};
use futures::TryStreamExt;
use tokio_util::io::StreamReader;
use tubely_core::models::Video;
use tubely_core::{validate_media_type, AppError, UploadKind};
use tubely_storage::MaterializeRequest;

use crate::error::{BodyLimitExceeded, HttpAppError};
use crate::services::access::{authorize_owner, OwnedVideo};
use crate::state::AppState;

pub struct UploadService<'a> {
    state: &'a AppState,
}

impl<'a> UploadService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Store one uploaded asset for a video and record its URL.
    ///
    /// Ownership is checked before the multipart body is touched. If the metadata
    /// update fails after the asset was stored, the stored asset is left in place.
    pub async fn upload(
        &self,
        raw_video_id: &str,
        headers: &HeaderMap,
        multipart: Result<Multipart, MultipartRejection>,
        kind: UploadKind,
    ) -> Result<Video, HttpAppError> {
        let start = Instant::now();

        let OwnedVideo { mut video, user_id } =
            authorize_owner(self.state, raw_video_id, headers).await?;

        let mut multipart = multipart?;
        let form_field = kind.form_field();

        let field = loop {
            match multipart.next_field().await.map_err(multipart_error)? {
                Some(field) if field.name() == Some(form_field) => break field,
                Some(other) => {
                    tracing::debug!(field = ?other.name(), "Skipping unexpected form field");
                }
                None => {
                    return Err(AppError::BadRequest(format!(
                        "Missing form field '{}'",
                        form_field
                    ))
                    .into());
                }
            }
        };

        let media = validate_media_type(field.content_type().unwrap_or_default(), kind)?;

        let request = MaterializeRequest {
            media_type: &media.media_type,
            extension: &media.extension,
            resource_id: video.id,
            owner_id: user_id,
            max_bytes: self.state.max_upload_bytes(kind),
        };

        let reader = StreamReader::new(field.map_err(multipart_read_error));
        tokio::pin!(reader);

        let asset = self
            .state
            .materializer(kind)
            .materialize(&mut reader, &request)
            .await?;

        match kind {
            UploadKind::Thumbnail => video.thumbnail_url = Some(asset.url),
            UploadKind::Video => video.video_url = Some(asset.url),
        }

        let updated = self.state.videos.update_video(&video, kind).await.map_err(|e| {
            tracing::error!(
                error = %e,
                video_id = %video.id,
                location = ?asset.location,
                "Asset stored but metadata update failed; stored asset is orphaned"
            );
            e
        })?;

        tracing::info!(
            video_id = %updated.id,
            user_id = %user_id,
            kind = %kind,
            media_type = %media.media_type,
            strategy = self.state.materializer(kind).strategy(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload stored"
        );

        Ok(updated)
    }
}

fn multipart_error(err: MultipartError) -> HttpAppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        HttpAppError(AppError::PayloadTooLarge(err.body_text()))
    } else {
        HttpAppError(AppError::BadRequest(format!(
            "Invalid multipart body: {}",
            err.body_text()
        )))
    }
}

fn multipart_read_error(err: MultipartError) -> io::Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        io::Error::other(BodyLimitExceeded)
    } else {
        io::Error::other(err)
    }
}
