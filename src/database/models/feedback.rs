use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LecturerFeedback {
    pub id: Uuid,
    pub user_id: Uuid,
    pub module_code: String,
    pub lecturer_name: Option<String>,
    pub rating: Option<i16>,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub module_code: String,
    pub lecturer_name: Option<String>,
    pub rating: Option<i16>,
    pub comment: String,
}
