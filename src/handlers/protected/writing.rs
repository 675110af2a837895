// handlers/protected/writing.rs - /api/writing-samples
use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{NewWritingSample, WritingSample, WritingSamplePatch};
use crate::error::ApiError;
use crate::handlers::validate::{clamp_limit, optional_text};
use crate::middleware::{ApiJson, ApiPath, ApiQuery, ApiResponse, ApiResult, SessionUser};
use crate::services::writing::{word_count, MIN_SAMPLE_CHARS};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSampleBody {
    pub title: Option<String>,
    pub content: Option<String>,
    pub context: Option<Value>,
    #[serde(default)]
    pub is_ai_generated: bool,
    pub confidence_score: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSampleBody {
    pub title: Option<String>,
    pub context: Option<Value>,
    pub confidence_score: Option<f64>,
}

fn confidence(value: Option<f64>) -> Result<Option<f64>, ApiError> {
    match value {
        Some(v) if !(0.0..=1.0).contains(&v) => {
            Err(ApiError::invalid_field("confidence_score", "Must be between 0 and 1"))
        }
        other => Ok(other),
    }
}

pub async fn list(
    State(state): State<AppState>,
    user: SessionUser,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Vec<WritingSample>> {
    let limit = clamp_limit(query.limit, 10, 100);
    Ok(ApiResponse::success(state.store.list_writing_samples(user.id, limit).await?))
}

pub async fn create(
    State(state): State<AppState>,
    user: SessionUser,
    ApiJson(body): ApiJson<CreateSampleBody>,
) -> ApiResult<WritingSample> {
    let content = body.content.map(|c| c.trim().to_string()).unwrap_or_default();
    if content.chars().count() < MIN_SAMPLE_CHARS {
        return Err(ApiError::invalid_field(
            "content",
            format!("Must be at least {} characters", MIN_SAMPLE_CHARS),
        ));
    }

    let sample = NewWritingSample {
        title: optional_text(body.title),
        word_count: word_count(&content),
        content,
        context: body.context.unwrap_or_else(|| json!({})),
        is_ai_generated: body.is_ai_generated,
        confidence_score: confidence(body.confidence_score)?.unwrap_or(1.0),
    };
    Ok(ApiResponse::created(state.store.create_writing_sample(user.id, sample).await?))
}

pub async fn get(
    State(state): State<AppState>,
    user: SessionUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<WritingSample> {
    Ok(ApiResponse::success(state.store.get_writing_sample(user.id, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    user: SessionUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<UpdateSampleBody>,
) -> ApiResult<WritingSample> {
    let patch = WritingSamplePatch {
        title: body.title,
        context: body.context,
        confidence_score: confidence(body.confidence_score)?,
    };
    if patch.is_empty() {
        return Err(ApiError::bad_request("Provide at least one of title, context, confidence_score"));
    }
    Ok(ApiResponse::success(state.store.update_writing_sample(user.id, id, patch).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    user: SessionUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<()> {
    state.store.delete_writing_sample(user.id, id).await?;
    Ok(ApiResponse::no_content())
}
