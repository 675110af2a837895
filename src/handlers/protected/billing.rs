// handlers/protected/billing.rs - entitlement view for the caller
use axum::extract::State;
use chrono::Utc;

use crate::middleware::{ApiResponse, ApiResult, SessionUser};
use crate::services::Entitlement;
use crate::state::AppState;

/// GET /api/billing/subscription
pub async fn subscription(State(state): State<AppState>, user: SessionUser) -> ApiResult<Entitlement> {
    let subscription = state.store.get_subscription(user.id).await?;
    Ok(ApiResponse::success(Entitlement::evaluate(subscription.as_ref(), Utc::now())))
}
