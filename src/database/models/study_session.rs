use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudySession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub topic: Option<String>,
    pub duration_min: i32,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub difficulty: Option<i16>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewStudySession {
    pub topic: Option<String>,
    pub duration_min: i32,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub difficulty: Option<i16>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
}
