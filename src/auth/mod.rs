use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;
use uuid::Uuid;

use crate::config::{AdminConfig, AuthConfig};

/// Claims carried by an access token from the external auth service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn new(user_id: Uuid, email: Option<String>, audience: &str, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            email,
            role: Some("authenticated".to_string()),
            aud: audience.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Missing session token")]
    Missing,

    #[error("Session expired")]
    Expired,

    #[error("Invalid session token: {0}")]
    Invalid(String),

    #[error("Session secret not configured")]
    SecretNotConfigured,

    #[error("Token generation failed: {0}")]
    TokenGeneration(String),
}

/// Verify an access token and return its claims
pub fn verify_session_token(token: &str, auth: &AuthConfig) -> Result<SessionClaims, SessionError> {
    if auth.jwt_secret.is_empty() {
        return Err(SessionError::SecretNotConfigured);
    }

    let decoding_key = DecodingKey::from_secret(auth.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[auth.jwt_audience.as_str()]);

    decode::<SessionClaims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => SessionError::Expired,
            _ => SessionError::Invalid(e.to_string()),
        })
}

/// Sign claims with the session secret (local development and tests)
pub fn issue_session_token(claims: &SessionClaims, auth: &AuthConfig) -> Result<String, SessionError> {
    if auth.jwt_secret.is_empty() {
        return Err(SessionError::SecretNotConfigured);
    }

    let encoding_key = EncodingKey::from_secret(auth.jwt_secret.as_bytes());
    encode(&Header::new(Algorithm::HS256), claims, &encoding_key)
        .map_err(|e| SessionError::TokenGeneration(e.to_string()))
}

type HmacSha256 = Hmac<Sha256>;

/// Admin cookie value: hex(HMAC-SHA256(key = password, msg = username))
pub fn admin_token(username: &str, password: &str) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(password.as_bytes()).ok()?;
    mac.update(username.as_bytes());
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Expected admin cookie value, if admin credentials are configured
pub fn expected_admin_token(admin: &AdminConfig) -> Option<String> {
    match (&admin.username, &admin.password) {
        (Some(user), Some(pass)) => admin_token(user, pass),
        _ => None,
    }
}

/// Constant-time comparison of a presented admin cookie against the configured credential
pub fn admin_token_matches(presented: &str, admin: &AdminConfig) -> bool {
    match expected_admin_token(admin) {
        Some(expected) => presented.as_bytes().ct_eq(expected.as_bytes()).into(),
        None => false,
    }
}
