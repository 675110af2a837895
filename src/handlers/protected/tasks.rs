// handlers/protected/tasks.rs - /api/tasks
use axum::extract::State;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{NewTask, Task, TaskPatch, TaskStatus};
use crate::error::ApiError;
use crate::handlers::validate::{nullable, required_text};
use crate::middleware::{ApiJson, ApiPath, ApiResponse, ApiResult, SessionUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTaskBody {
    pub title: Option<String>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskBody {
    pub title: Option<String>,
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub due_date: Option<Option<NaiveDate>>,
}

/// GET /api/tasks - caller's tasks, newest first
pub async fn list(State(state): State<AppState>, user: SessionUser) -> ApiResult<Vec<Task>> {
    let tasks = state.store.list_tasks(user.id).await?;
    Ok(ApiResponse::success(tasks))
}

/// POST /api/tasks
pub async fn create(
    State(state): State<AppState>,
    user: SessionUser,
    ApiJson(body): ApiJson<CreateTaskBody>,
) -> ApiResult<Task> {
    let title = required_text("title", body.title)?;
    let task = state
        .store
        .create_task(user.id, NewTask { title, due_date: body.due_date })
        .await?;
    tracing::debug!(user_id = %user.id, task_id = %task.id, "Task created");
    Ok(ApiResponse::created(task))
}

/// PATCH /api/tasks/:id
pub async fn update(
    State(state): State<AppState>,
    user: SessionUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<UpdateTaskBody>,
) -> ApiResult<Task> {
    let patch = TaskPatch {
        title: match body.title {
            Some(title) => Some(required_text("title", Some(title))?),
            None => None,
        },
        status: body.status,
        due_date: body.due_date,
    };
    if patch.is_empty() {
        return Err(ApiError::bad_request("Provide at least one of title, status, due_date"));
    }

    let task = state.store.update_task(user.id, id, patch).await?;
    Ok(ApiResponse::success(task))
}

/// DELETE /api/tasks/:id
pub async fn delete(
    State(state): State<AppState>,
    user: SessionUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<()> {
    state.store.delete_task(user.id, id).await?;
    Ok(ApiResponse::no_content())
}
