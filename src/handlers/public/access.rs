// handlers/public/access.rs - POST /api/access/request
use axum::{
    extract::{ConnectInfo, State},
    http::HeaderMap,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;

use crate::database::models::{AccessStatus, NewAccessRequest};
use crate::error::ApiError;
use crate::handlers::validate::{optional_text, required_text};
use crate::middleware::{rate_limit, ApiJson, ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AccessRequestBody {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// First `X-Forwarded-For` hop, then `X-Real-IP`, then the peer address
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    header("x-forwarded-for")
        .or_else(|| header("x-real-ip"))
        .or_else(|| peer.map(|p| p.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Domain part of a plausible address
fn email_domain(email: &str) -> Option<&str> {
    let (local, domain) = email.rsplit_once('@')?;
    if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return None;
    }
    Some(domain)
}

pub fn domain_allowed(domain: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|d| {
        let d = d.trim().trim_start_matches('@').to_lowercase();
        domain == d || domain.ends_with(&format!(".{}", d))
    })
}

pub async fn request_access(
    State(state): State<AppState>,
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    ApiJson(body): ApiJson<AccessRequestBody>,
) -> ApiResult<Value> {
    let email = required_text("email", body.email)?.to_lowercase();
    let domain = email_domain(&email)
        .ok_or_else(|| ApiError::invalid_field("email", "Must be a valid email address"))?
        .to_string();

    let ip = client_ip(&headers, peer.map(|ConnectInfo(addr)| addr));
    rate_limit::check(&state.limits.access_by_ip, &ip, "Too many requests. Please try again later.")?;
    rate_limit::check(
        &state.limits.access_by_email,
        &email,
        "This email has requested access too many times. Please try again later.",
    )?;

    let access = &state.config.access;
    let (status, trial_expires_at) = if domain_allowed(&domain, &access.allowed_domains) {
        (AccessStatus::Approved, Some(Utc::now() + Duration::days(access.trial_days)))
    } else {
        (AccessStatus::Pending, None)
    };

    // An earlier admin decision on this email is kept; the response reflects the stored row
    let record = state
        .store
        .upsert_access_request(NewAccessRequest {
            email,
            name: optional_text(body.name),
            status,
            trial_expires_at,
        })
        .await?;

    if record.status == AccessStatus::Approved {
        tracing::info!(email = %record.email, "Trial access approved");
        return Ok(ApiResponse::success(json!({
            "status": record.status,
            "email": record.email,
            "trial_expires_at": record.trial_expires_at,
            "trial_days": access.trial_days,
        })));
    }

    tracing::info!(email = %record.email, status = ?record.status, "Access request queued for review");
    Ok(ApiResponse::accepted(json!({
        "status": AccessStatus::Pending,
        "email": record.email,
        "message": "Your request has been received and will be reviewed.",
    })))
}
