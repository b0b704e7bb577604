use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A job posting owned by an evaluator.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobDescription {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub company: String,
    pub description: String,
    /// Drives hard-match scoring and missing-skill detection. May be empty.
    pub required_skills: Vec<String>,
    /// Stored and returned but not scored.
    pub preferred_skills: Vec<String>,
    pub experience_level: String,
    pub created_at: DateTime<Utc>,
}
