use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum ConnectionStatus {
    Pending,
    Active,
}

/// "Always With You" link between a student and a loved one
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AwyConnection {
    pub id: Uuid,
    pub student_id: Uuid,
    pub loved_email: String,
    pub relationship: String,
    pub nickname: Option<String>,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
}

pub const ALREADY_CONNECTED: &str = "This person is already connected";

pub fn connection_limit_reached(limit: usize) -> String {
    format!("You can connect at most {} loved ones", limit)
}

#[derive(Debug, Clone)]
pub struct NewAwyConnection {
    pub loved_email: String,
    pub relationship: String,
    pub nickname: Option<String>,
}
