use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptTurn {
    pub role: TurnRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transcript {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub turns: Json<Vec<TranscriptTurn>>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTranscript {
    pub title: String,
    pub turns: Vec<TranscriptTurn>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct TranscriptPatch {
    pub title: Option<String>,
    pub is_pinned: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptSort {
    #[default]
    Recent,
    Oldest,
    Title,
}

/// Listing parameters, already validated and clamped
#[derive(Debug, Clone)]
pub struct TranscriptFilter {
    pub query: Option<String>,
    pub pinned_only: bool,
    pub sort: TranscriptSort,
    pub page: i64,
    pub page_size: i64,
}

/// Pages past this are always empty; keeps `offset` well inside `i64`
pub const MAX_TRANSCRIPT_PAGE: i64 = 1_000_000;

impl TranscriptFilter {
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.page_size.max(0))
    }
}
