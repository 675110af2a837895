use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Processing stage of an uploaded lecture. Any stage may be written at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum LectureStatus {
    Uploaded,
    Transcribing,
    Summarizing,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lecture {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub module_code: Option<String>,
    pub lecturer_name: Option<String>,
    pub status: LectureStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewLecture {
    pub title: String,
    pub module_code: Option<String>,
    pub lecturer_name: Option<String>,
}
