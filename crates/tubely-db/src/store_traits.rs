//! Repository trait abstractions
//!
//! These traits define the minimal interface the upload pipeline needs from the
//! metadata store, allowing handlers to be tested without a database.

use async_trait::async_trait;
use tubely_core::models::Video;
use tubely_core::{AppError, UploadKind};
use uuid::Uuid;

use crate::db::video::VideoRepository;

/// Video metadata operations needed by the upload pipeline
#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Get a video by ID
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// Persist the URL field selected by `kind` from `video` and return the stored
    /// record. The other URL field keeps its stored value. Fails with `NotFound` if the
    /// record no longer exists.
    async fn update_video(&self, video: &Video, kind: UploadKind) -> Result<Video, AppError>;

    /// Check that the store is reachable
    async fn ping(&self) -> Result<(), AppError>;
}

#[async_trait]
impl VideoStore for VideoRepository {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        VideoRepository::get_video(self, id).await
    }

    async fn update_video(&self, video: &Video, kind: UploadKind) -> Result<Video, AppError> {
        VideoRepository::update_video(self, video, kind).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        VideoRepository::ping(self).await
    }
}
