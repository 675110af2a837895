use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::auth::{admin_token_matches, verify_session_token, SessionClaims, SessionError};
use crate::error::ApiError;
use crate::state::AppState;

/// Caller identity from a verified session token
#[derive(Clone, Debug)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl From<SessionClaims> for SessionUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_session_token(&parts.headers, &state.config.auth.session_cookie)?;
        let claims = verify_session_token(&token, &state.config.auth)?;
        Ok(SessionUser::from(claims))
    }
}

/// Bearer header first, then the session cookie
fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Result<String, SessionError> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let value = value
            .to_str()
            .map_err(|_| SessionError::Invalid("Invalid Authorization header format".to_string()))?;
        return match value.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            Some(_) => Err(SessionError::Invalid("Empty bearer token".to_string())),
            None => Err(SessionError::Invalid(
                "Authorization header must use Bearer token format".to_string(),
            )),
        };
    }

    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(SessionError::Missing)
}

/// Proof of a valid admin cookie
#[derive(Clone, Debug)]
pub struct AdminSession;

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let admin = &state.config.admin;
        let jar = CookieJar::from_headers(&parts.headers);
        let presented = jar
            .get(&admin.cookie_name)
            .map(|c| c.value().to_string())
            .ok_or_else(|| ApiError::unauthorized("Admin session required"))?;

        if !admin_token_matches(&presented, admin) {
            tracing::warn!("Rejected admin request with invalid admin cookie");
            return Err(ApiError::unauthorized("Invalid admin session"));
        }
        Ok(AdminSession)
    }
}
