use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A candidate's resume as plain text. Read-only to the matching core.
///
/// `owner_name` and `owner_email` are display copies of the owning user and are
/// never consulted by scoring.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Resume {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub owner_email: String,
    pub filename: String,
    pub content: String,
    pub uploaded_at: DateTime<Utc>,
}

impl Resume {
    pub fn new(
        owner_id: Uuid,
        owner_name: impl Into<String>,
        owner_email: impl Into<String>,
        filename: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            owner_name: owner_name.into(),
            owner_email: owner_email.into(),
            filename: filename.into(),
            content: content.into(),
            uploaded_at: Utc::now(),
        }
    }
}
