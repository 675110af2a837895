use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WritingSample {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub content: String,
    pub context: Value,
    pub word_count: i32,
    pub is_ai_generated: bool,
    pub confidence_score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewWritingSample {
    pub title: Option<String>,
    pub content: String,
    pub context: Value,
    pub word_count: i32,
    pub is_ai_generated: bool,
    pub confidence_score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct WritingSamplePatch {
    pub title: Option<String>,
    pub context: Option<Value>,
    pub confidence_score: Option<f64>,
}

impl WritingSamplePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.context.is_none() && self.confidence_score.is_none()
    }
}
