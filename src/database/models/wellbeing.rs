use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WellbeingCheckin {
    pub id: Uuid,
    pub user_id: Uuid,
    pub score: i16,
    pub stressors: Vec<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCheckin {
    pub score: i16,
    pub stressors: Vec<String>,
    pub note: Option<String>,
}
