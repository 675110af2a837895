// handlers/public/admin_session.rs - admin cookie issue and clear
use axum::{extract::State, response::IntoResponse};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::json;
use subtle::ConstantTimeEq;

use crate::auth::{admin_token, expected_admin_token};
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(body): ApiJson<LoginBody>,
) -> Result<impl IntoResponse, ApiError> {
    let admin = &state.config.admin;
    let expected = expected_admin_token(admin)
        .ok_or_else(|| ApiError::unauthorized("Admin access is not configured"))?;

    let submitted = match (body.username, body.password) {
        (Some(user), Some(pass)) => admin_token(&user, &pass),
        _ => None,
    }
    .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !bool::from(submitted.as_bytes().ct_eq(expected.as_bytes())) {
        tracing::warn!("Failed admin login attempt");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let cookie = Cookie::build((admin.cookie_name.clone(), expected))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.security.secure_cookies)
        .max_age(time::Duration::hours(admin.session_hours));

    tracing::info!("Admin session started");
    Ok((jar.add(cookie), ApiResponse::success(json!({ "authenticated": true }))))
}

/// POST /api/admin/logout
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    // Always emit the expiring cookie, even when the request did not carry one
    let mut cookie = Cookie::build((state.config.admin.cookie_name.clone(), "")).path("/").build();
    cookie.make_removal();
    (jar.add(cookie), ApiResponse::success(json!({ "authenticated": false })))
}
