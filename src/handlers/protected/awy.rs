// handlers/protected/awy.rs - "Always With You" loved-one connections
use axum::extract::State;
use serde::Deserialize;

use crate::database::models::{AwyConnection, NewAwyConnection};
use crate::error::ApiError;
use crate::handlers::validate::{optional_text, required_text};
use crate::middleware::{ApiJson, ApiResponse, ApiResult, SessionUser};
use crate::state::AppState;

pub const MAX_CONNECTIONS: usize = 3;

#[derive(Debug, Deserialize)]
pub struct AddLovedOneBody {
    pub email: Option<String>,
    pub relationship: Option<String>,
    pub nickname: Option<String>,
}

pub async fn list(State(state): State<AppState>, user: SessionUser) -> ApiResult<Vec<AwyConnection>> {
    Ok(ApiResponse::success(state.store.list_awy_connections(user.id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    user: SessionUser,
    ApiJson(body): ApiJson<AddLovedOneBody>,
) -> ApiResult<AwyConnection> {
    let email = required_text("email", body.email)?.to_lowercase();
    if !email.contains('@') {
        return Err(ApiError::invalid_field("email", "Must be an email address"));
    }
    let relationship = required_text("relationship", body.relationship)?;

    let connection = state
        .store
        .create_awy_connection(
            user.id,
            NewAwyConnection {
                loved_email: email,
                relationship,
                nickname: optional_text(body.nickname),
            },
            MAX_CONNECTIONS,
        )
        .await?;
    Ok(ApiResponse::created(connection))
}
