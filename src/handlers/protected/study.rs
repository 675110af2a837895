// handlers/protected/study.rs - /api/study-sessions
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::{NewStudySession, StudySession};
use crate::error::ApiError;
use crate::handlers::validate::{clamp_limit, optional_text, score};
use crate::middleware::{ApiJson, ApiQuery, ApiResponse, ApiResult, SessionUser};
use crate::services::study::{aggregate, Period, StudyAggregates};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SessionsQuery {
    pub period: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionBody {
    pub topic: Option<String>,
    pub duration_min: Option<i32>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub difficulty: Option<i16>,
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionsView {
    pub sessions: Vec<StudySession>,
    pub aggregates: StudyAggregates,
}

pub async fn list(
    State(state): State<AppState>,
    user: SessionUser,
    ApiQuery(query): ApiQuery<SessionsQuery>,
) -> ApiResult<SessionsView> {
    let now = Utc::now();
    let period = Period::parse(query.period.as_deref());
    let limit = clamp_limit(query.limit, 10, 100);

    let sessions = state.store.list_study_sessions(user.id, period.since(now), limit).await?;
    let aggregates = aggregate(&sessions, period, now.date_naive());
    Ok(ApiResponse::success(SessionsView { sessions, aggregates }))
}

pub async fn create(
    State(state): State<AppState>,
    user: SessionUser,
    ApiJson(body): ApiJson<CreateSessionBody>,
) -> ApiResult<StudySession> {
    let duration_min = match body.duration_min {
        Some(d) if d > 0 => d,
        Some(_) => return Err(ApiError::invalid_field("duration_min", "Must be greater than zero")),
        None => return Err(ApiError::missing_field("duration_min")),
    };
    let now = Utc::now();

    let session = NewStudySession {
        topic: optional_text(body.topic),
        duration_min,
        started_at: body.started_at.unwrap_or(now),
        ended_at: body.ended_at.unwrap_or(now),
        difficulty: score("difficulty", body.difficulty)?,
        notes: optional_text(body.notes),
        tags: body.tags,
    };
    Ok(ApiResponse::created(state.store.create_study_session(user.id, session).await?))
}
