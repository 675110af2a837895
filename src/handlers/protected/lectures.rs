// handlers/protected/lectures.rs - /api/lectures
use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Lecture, LectureStatus, NewLecture};
use crate::error::ApiError;
use crate::handlers::validate::{optional_text, required_text};
use crate::middleware::{ApiJson, ApiPath, ApiResponse, ApiResult, SessionUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateLectureBody {
    pub title: Option<String>,
    pub module_code: Option<String>,
    pub lecturer_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: Option<LectureStatus>,
}

pub async fn list(State(state): State<AppState>, user: SessionUser) -> ApiResult<Vec<Lecture>> {
    Ok(ApiResponse::success(state.store.list_lectures(user.id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    user: SessionUser,
    ApiJson(body): ApiJson<CreateLectureBody>,
) -> ApiResult<Lecture> {
    let lecture = NewLecture {
        title: required_text("title", body.title)?,
        module_code: optional_text(body.module_code),
        lecturer_name: optional_text(body.lecturer_name),
    };
    Ok(ApiResponse::created(state.store.create_lecture(user.id, lecture).await?))
}

/// PUT /api/lectures/:id/status - any status may be written at any time
pub async fn set_status(
    State(state): State<AppState>,
    user: SessionUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<StatusBody>,
) -> ApiResult<Lecture> {
    let status = body.status.ok_or_else(|| ApiError::missing_field("status"))?;
    let lecture = state.store.set_lecture_status(user.id, id, status).await?;
    tracing::info!(lecture_id = %id, status = ?status, "Lecture status updated");
    Ok(ApiResponse::success(lecture))
}
