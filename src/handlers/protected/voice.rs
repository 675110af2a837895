// handlers/protected/voice.rs - POST /api/voice/tts, proxied to the speech vendor
use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::handlers::validate::{optional_text, required_text};
use crate::middleware::{require_feature, ApiJson, ApiResponse, SessionUser};
use crate::services::vendors::{elevenlabs, VendorError};
use crate::services::Feature;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioEncoding {
    #[default]
    Binary,
    Base64,
}

#[derive(Debug, Deserialize)]
pub struct TtsBody {
    pub text: Option<String>,
    pub voice_id: Option<String>,
    #[serde(default)]
    pub encoding: AudioEncoding,
}

pub async fn tts(
    State(state): State<AppState>,
    user: SessionUser,
    ApiJson(body): ApiJson<TtsBody>,
) -> Result<Response, ApiError> {
    let text = required_text("text", body.text)?;
    if text.chars().count() > elevenlabs::MAX_TEXT_CHARS {
        return Err(ApiError::invalid_field(
            "text",
            format!("Must be at most {} characters", elevenlabs::MAX_TEXT_CHARS),
        ));
    }

    let voice_id = optional_text(body.voice_id);
    if voice_id.as_deref().is_some_and(|id| !elevenlabs::is_valid_voice_id(id)) {
        return Err(ApiError::invalid_field(
            "voice_id",
            "Must be 1 to 64 letters, digits, '_' or '-'",
        ));
    }

    require_feature(&state, &user, Feature::Voice).await?;

    let upstream = elevenlabs::synthesize(&state.http, &state.config.vendors, voice_id.as_deref(), &text).await?;
    let content_type = elevenlabs::content_type(&upstream);

    match body.encoding {
        AudioEncoding::Binary => {
            Ok(([(header::CONTENT_TYPE, content_type)], Body::from_stream(upstream.bytes_stream())).into_response())
        }
        AudioEncoding::Base64 => {
            let audio = upstream.bytes().await.map_err(VendorError::from)?;
            Ok(ApiResponse::success(json!({
                "audio_base64": STANDARD.encode(&audio),
                "content_type": content_type,
                "bytes": audio.len(),
            }))
            .into_response())
        }
    }
}
