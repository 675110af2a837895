// handlers/public/demo.rs - GET /api/demo/dashboard
use axum::extract::State;
use serde_json::Value;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::demo::{demo_dashboard, scrub};
use crate::state::AppState;

pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Value> {
    if !state.config.demo.enabled {
        return Err(ApiError::not_found("Demo mode is disabled"));
    }
    Ok(ApiResponse::success(scrub(demo_dashboard(), &state.config.demo.deny_list)))
}
