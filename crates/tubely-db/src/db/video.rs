use sqlx::{PgPool, Postgres};
use tubely_core::models::Video;
use tubely_core::{AppError, UploadKind};
use uuid::Uuid;

/// Repository for video records
///
/// Records are created by the video management endpoints; this repository only reads
/// them and updates the asset URL columns.
#[derive(Clone)]
pub struct VideoRepository {
    pool: PgPool,
}

impl VideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", db.record_id = %id))]
    pub async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let video = sqlx::query_as::<Postgres, Video>(
            r#"
            SELECT id, created_at, updated_at, title, description, user_id, thumbnail_url, video_url
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    /// Write the URL column that `kind` owns from `video` and bump `updated_at`.
    ///
    /// The other URL column, ownership, title and description are never changed here, so
    /// a slow upload cannot put back a URL that another upload replaced in the meantime.
    #[tracing::instrument(skip(self, video), fields(db.table = "videos", db.operation = "update", db.record_id = %video.id))]
    pub async fn update_video(&self, video: &Video, kind: UploadKind) -> Result<Video, AppError> {
        let url = match kind {
            UploadKind::Thumbnail => &video.thumbnail_url,
            UploadKind::Video => &video.video_url,
        };

        let updated = sqlx::query_as::<Postgres, Video>(update_url_sql(kind))
            .bind(video.id)
            .bind(url)
            .fetch_optional(&self.pool)
            .await?;

        updated.ok_or_else(|| AppError::NotFound(format!("Video {} not found", video.id)))
    }

    #[tracing::instrument(skip(self), fields(db.operation = "ping"))]
    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn update_url_sql(kind: UploadKind) -> &'static str {
    match kind {
        UploadKind::Thumbnail => {
            r#"
            UPDATE videos
            SET thumbnail_url = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, created_at, updated_at, title, description, user_id, thumbnail_url, video_url
            "#
        }
        UploadKind::Video => {
            r#"
            UPDATE videos
            SET video_url = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, created_at, updated_at, title, description, user_id, thumbnail_url, video_url
            "#
        }
    }
}
