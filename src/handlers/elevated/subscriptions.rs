// handlers/elevated/subscriptions.rs - manual subscription management
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Subscription, SubscriptionPlan, SubscriptionStatus, SubscriptionUpdate};
use crate::error::ApiError;
use crate::middleware::{AdminSession, ApiJson, ApiPath, ApiResponse, ApiResult};
use crate::state::AppState;

const LIST_LIMIT: i64 = 200;

#[derive(Debug, Deserialize)]
pub struct UpsertSubscriptionBody {
    pub plan: Option<SubscriptionPlan>,
    pub status: Option<SubscriptionStatus>,
    pub trial_end_date: Option<DateTime<Utc>>,
    pub current_period_end: Option<DateTime<Utc>>,
}

/// GET /api/admin/subscriptions
pub async fn list(State(state): State<AppState>, _admin: AdminSession) -> ApiResult<Vec<Subscription>> {
    Ok(ApiResponse::success(state.store.list_subscriptions(LIST_LIMIT).await?))
}

/// PUT /api/admin/subscriptions/:user_id
pub async fn upsert(
    State(state): State<AppState>,
    _admin: AdminSession,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<UpsertSubscriptionBody>,
) -> ApiResult<Subscription> {
    let update = SubscriptionUpdate {
        plan: body.plan.ok_or_else(|| ApiError::missing_field("plan"))?,
        status: body.status.ok_or_else(|| ApiError::missing_field("status"))?,
        trial_end_date: body.trial_end_date,
        current_period_end: body.current_period_end,
    };
    let subscription = state.store.upsert_subscription(user_id, update).await?;
    tracing::info!(%user_id, plan = ?subscription.plan, status = ?subscription.status, "Subscription updated by admin");
    Ok(ApiResponse::success(subscription))
}
