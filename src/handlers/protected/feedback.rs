// handlers/protected/feedback.rs - /api/lecturer-feedback
use axum::extract::State;
use serde::Deserialize;

use crate::database::models::{LecturerFeedback, NewFeedback};
use crate::handlers::validate::{optional_text, required_text, score};
use crate::middleware::{ApiJson, ApiResponse, ApiResult, SessionUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateFeedbackBody {
    pub module_code: Option<String>,
    pub lecturer_name: Option<String>,
    pub rating: Option<i16>,
    pub comment: Option<String>,
}

pub async fn list(State(state): State<AppState>, user: SessionUser) -> ApiResult<Vec<LecturerFeedback>> {
    Ok(ApiResponse::success(state.store.list_feedback(user.id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    user: SessionUser,
    ApiJson(body): ApiJson<CreateFeedbackBody>,
) -> ApiResult<LecturerFeedback> {
    let feedback = NewFeedback {
        module_code: required_text("module_code", body.module_code)?.to_uppercase(),
        lecturer_name: optional_text(body.lecturer_name),
        rating: score("rating", body.rating)?,
        comment: required_text("comment", body.comment)?,
    };
    Ok(ApiResponse::created(state.store.create_feedback(user.id, feedback).await?))
}
