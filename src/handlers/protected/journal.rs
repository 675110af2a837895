// handlers/protected/journal.rs - /api/journal
use axum::extract::State;
use serde::Deserialize;

use crate::database::models::{JournalEntry, NewJournalEntry};
use crate::handlers::validate::{clamp_limit, required_text, score};
use crate::middleware::{ApiJson, ApiQuery, ApiResponse, ApiResult, SessionUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateEntryBody {
    pub content: Option<String>,
    pub mood: Option<i16>,
    #[serde(default)]
    pub tags: Vec<String>,
}

pub async fn list(
    State(state): State<AppState>,
    user: SessionUser,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Vec<JournalEntry>> {
    let limit = clamp_limit(query.limit, 50, 200);
    Ok(ApiResponse::success(state.store.list_journal(user.id, limit).await?))
}

pub async fn create(
    State(state): State<AppState>,
    user: SessionUser,
    ApiJson(body): ApiJson<CreateEntryBody>,
) -> ApiResult<JournalEntry> {
    let entry = NewJournalEntry {
        content: required_text("content", body.content)?,
        mood: score("mood", body.mood)?,
        tags: body.tags,
    };
    Ok(ApiResponse::created(state.store.create_journal(user.id, entry).await?))
}
