// handlers/protected/wellbeing.rs - /api/wellbeing/*
use axum::extract::State;
use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::database::models::{NewCheckin, WellbeingCheckin};
use crate::handlers::validate::{clamp_limit, optional_text, required_score};
use crate::middleware::{ApiJson, ApiQuery, ApiResponse, ApiResult, SessionUser};
use crate::services::wellbeing::{summarize, WellbeingSummary};
use crate::state::AppState;

const DEFAULT_DAYS: i64 = 14;
const MAX_DAYS: i64 = 30;

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCheckinBody {
    pub score: Option<i16>,
    #[serde(default)]
    pub stressors: Vec<String>,
    pub note: Option<String>,
}

/// GET /api/wellbeing/checkins
pub async fn list(
    State(state): State<AppState>,
    user: SessionUser,
    ApiQuery(query): ApiQuery<WindowQuery>,
) -> ApiResult<Vec<WellbeingCheckin>> {
    let days = clamp_limit(query.days, DEFAULT_DAYS, MAX_DAYS);
    let since = Utc::now() - Duration::days(days);
    Ok(ApiResponse::success(state.store.list_checkins(user.id, since).await?))
}

/// POST /api/wellbeing/checkins
pub async fn create(
    State(state): State<AppState>,
    user: SessionUser,
    ApiJson(body): ApiJson<CreateCheckinBody>,
) -> ApiResult<WellbeingCheckin> {
    let checkin = NewCheckin {
        score: required_score("score", body.score)?,
        stressors: body
            .stressors
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        note: optional_text(body.note),
    };
    Ok(ApiResponse::created(state.store.create_checkin(user.id, checkin).await?))
}

/// GET /api/wellbeing/summary - daily trend and totals
pub async fn summary(
    State(state): State<AppState>,
    user: SessionUser,
    ApiQuery(query): ApiQuery<WindowQuery>,
) -> ApiResult<WellbeingSummary> {
    let days = clamp_limit(query.days, DEFAULT_DAYS, MAX_DAYS);
    let now = Utc::now();
    let checkins = state.store.list_checkins(user.id, now - Duration::days(days)).await?;
    Ok(ApiResponse::success(summarize(&checkins, days, now)))
}
