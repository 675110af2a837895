// handlers/elevated/access_requests.rs - review queue for trial access
use axum::extract::State;
use chrono::{Duration, Utc};
use rand::RngCore;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{already_decided, AccessApproval, AccessRequest, AccessStatus};
use crate::error::ApiError;
use crate::middleware::{AdminSession, ApiPath, ApiQuery, ApiResponse, ApiResult};
use crate::state::AppState;

const INVITE_VALID_DAYS: i64 = 7;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<AccessStatus>,
}

/// 32 random bytes, hex encoded
pub fn generate_invite_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// GET /api/admin/access-requests
pub async fn list(
    State(state): State<AppState>,
    _admin: AdminSession,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Vec<AccessRequest>> {
    Ok(ApiResponse::success(state.store.list_access_requests(query.status).await?))
}

/// POST /api/admin/access-requests/:id/approve
pub async fn approve(
    State(state): State<AppState>,
    _admin: AdminSession,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Value> {
    let request = state
        .store
        .get_access_request(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Request not found"))?;

    if request.status != AccessStatus::Pending {
        return Err(ApiError::bad_request(already_decided(request.status)));
    }

    let invite_token = generate_invite_token();
    let trial_expires_at = Utc::now() + Duration::days(state.config.access.trial_days);
    let approved = state
        .store
        .approve_access_request(
            id,
            AccessApproval {
                invite_token: invite_token.clone(),
                trial_expires_at,
            },
        )
        .await?;

    let invite_url = format!(
        "{}/invite/accept?token={}",
        state.config.server.public_base_url, invite_token
    );
    tracing::info!(request_id = %id, email = %approved.email, "Access request approved");

    Ok(ApiResponse::success(json!({
        "request": approved,
        "invite_url": invite_url,
        "invite_expires_at": Utc::now() + Duration::days(INVITE_VALID_DAYS),
    })))
}
