// handlers/protected/transcripts.rs - saved assistant conversations
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{
    NewTranscript, Transcript, TranscriptFilter, TranscriptPatch, TranscriptSort, TranscriptTurn, TurnRole,
    MAX_TRANSCRIPT_PAGE,
};
use crate::error::ApiError;
use crate::handlers::validate::{clamp_limit, optional_text, required_text};
use crate::middleware::{ApiJson, ApiPath, ApiQuery, ApiResponse, ApiResult, SessionUser};
use crate::services::transcripts::generate_title;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub pinned: Option<String>,
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl ListQuery {
    fn into_filter(self) -> TranscriptFilter {
        let sort = match self.sort.as_deref() {
            Some("oldest") => TranscriptSort::Oldest,
            Some("title") => TranscriptSort::Title,
            _ => TranscriptSort::Recent,
        };
        TranscriptFilter {
            query: optional_text(self.q),
            pinned_only: matches!(self.pinned.as_deref(), Some("true") | Some("1")),
            sort,
            page: self.page.unwrap_or(1).clamp(1, MAX_TRANSCRIPT_PAGE),
            page_size: clamp_limit(self.page_size, 20, 100),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TranscriptPage {
    pub transcripts: Vec<Transcript>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

#[derive(Debug, Deserialize)]
pub struct TurnBody {
    pub role: TurnRole,
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct SaveTranscriptBody {
    pub title: Option<String>,
    pub turns: Option<Vec<TurnBody>>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTranscriptBody {
    pub title: Option<String>,
    pub is_pinned: Option<bool>,
}

/// GET /api/transcripts
pub async fn list(
    State(state): State<AppState>,
    user: SessionUser,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<TranscriptPage> {
    let filter = query.into_filter();
    let (transcripts, total) = state.store.list_transcripts(user.id, &filter).await?;
    Ok(ApiResponse::success(TranscriptPage {
        transcripts,
        total,
        page: filter.page,
        page_size: filter.page_size,
    }))
}

/// POST /api/transcripts
pub async fn create(
    State(state): State<AppState>,
    user: SessionUser,
    ApiJson(body): ApiJson<SaveTranscriptBody>,
) -> ApiResult<Transcript> {
    let turns = body.turns.unwrap_or_default();
    if turns.is_empty() {
        return Err(ApiError::missing_field("turns"));
    }
    let started_at = body.started_at.ok_or_else(|| ApiError::missing_field("started_at"))?;
    let now = Utc::now();

    let turns: Vec<TranscriptTurn> = turns
        .into_iter()
        .map(|t| TranscriptTurn {
            role: t.role,
            content: t.content,
            timestamp: t.timestamp.unwrap_or(now),
        })
        .collect();
    let title = optional_text(body.title).unwrap_or_else(|| generate_title(&turns));

    let transcript = state
        .store
        .create_transcript(
            user.id,
            NewTranscript {
                title,
                turns,
                started_at,
                ended_at: body.ended_at.unwrap_or(now),
            },
        )
        .await?;
    tracing::info!(user_id = %user.id, transcript_id = %transcript.id, "Transcript saved");
    Ok(ApiResponse::created(transcript))
}

/// PATCH /api/transcripts/:id - rename or pin
pub async fn update(
    State(state): State<AppState>,
    user: SessionUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<UpdateTranscriptBody>,
) -> ApiResult<Transcript> {
    if body.title.is_none() && body.is_pinned.is_none() {
        return Err(ApiError::bad_request("Provide title or is_pinned"));
    }
    let patch = TranscriptPatch {
        title: match body.title {
            Some(title) => Some(required_text("title", Some(title))?),
            None => None,
        },
        is_pinned: body.is_pinned,
    };
    Ok(ApiResponse::success(state.store.update_transcript(user.id, id, patch).await?))
}

/// DELETE /api/transcripts/:id
pub async fn delete(
    State(state): State<AppState>,
    user: SessionUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<()> {
    state.store.delete_transcript(user.id, id).await?;
    Ok(ApiResponse::no_content())
}
