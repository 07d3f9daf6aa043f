use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A video record and the URLs of its uploaded assets.
///
/// Records are created elsewhere; the upload pipeline only reads them to check
/// ownership and sets one of the two URL fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Video {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub description: String,
    /// Owner. Only this user may change the URL fields.
    pub user_id: Uuid,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
}

impl Video {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}
