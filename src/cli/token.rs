use anyhow::Context;
use chrono::Duration;
use uuid::Uuid;

use crate::auth::{issue_session_token, SessionClaims};
use crate::config::config;

pub fn run(user_id: Option<Uuid>, email: Option<String>, hours: i64) -> anyhow::Result<()> {
    let auth = &config().auth;
    let user_id = user_id.unwrap_or_else(Uuid::new_v4);
    let claims = SessionClaims::new(user_id, email, &auth.jwt_audience, Duration::hours(hours));
    let token = issue_session_token(&claims, auth).context("failed to issue token")?;

    eprintln!("user_id: {}", user_id);
    println!("{}", token);
    Ok(())
}
