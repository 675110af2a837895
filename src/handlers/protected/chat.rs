// handlers/protected/chat.rs - POST /api/chat, proxied to the chat-completion vendor
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::{rate_limit, require_feature, ApiJson, ApiResponse, SessionUser};
use crate::services::vendors::openai::{self, ChatMessage, INTEGRITY_REFUSAL};
use crate::services::Feature;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub messages: Option<Vec<ChatMessage>>,
    pub mode: Option<String>,
    pub module: Option<String>,
    #[serde(default)]
    pub stream: bool,
}

pub async fn chat(
    State(state): State<AppState>,
    user: SessionUser,
    ApiJson(body): ApiJson<ChatBody>,
) -> Result<Response, ApiError> {
    let messages = body.messages.unwrap_or_default();
    let Some(last) = messages.last() else {
        return Err(ApiError::missing_field("messages"));
    };

    require_feature(&state, &user, Feature::AiChat).await?;

    if openai::is_flagged(&last.content) {
        tracing::info!(user_id = %user.id, "Chat request refused by integrity guard");
        let refusal = json!({
            "error": true,
            "message": "Content violates academic integrity guidelines",
            "code": "ACADEMIC_INTEGRITY",
            "answer": INTEGRITY_REFUSAL,
            "sources": [],
        });
        return Ok((StatusCode::BAD_REQUEST, Json(refusal)).into_response());
    }

    rate_limit::check(
        &state.limits.chat_by_user,
        &user.id,
        &format!("Daily chat limit reached ({} requests per day)", state.config.api.chat_daily_limit),
    )?;

    let vendors = &state.config.vendors;
    if body.stream {
        let upstream = openai::complete_stream(&state.http, vendors, &messages).await?;
        let headers = [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ];
        return Ok((headers, Body::from_stream(upstream.bytes_stream())).into_response());
    }

    let answer = openai::complete(&state.http, vendors, &messages).await?;
    let sources = openai::sources_for(&last.content);
    Ok(ApiResponse::success(json!({
        "answer": answer,
        "sources": sources,
        "mode": body.mode.unwrap_or_else(|| "default".to_string()),
        "module": body.module.unwrap_or_else(|| "general".to_string()),
        "timestamp": Utc::now(),
    }))
    .into_response())
}
