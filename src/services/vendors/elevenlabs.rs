use serde_json::{json, Value};

use super::{check_status, VendorError};
use crate::config::VendorConfig;

pub const MAX_TEXT_CHARS: usize = 5000;
pub const DEFAULT_CONTENT_TYPE: &str = "audio/mpeg";
pub const MAX_VOICE_ID_LEN: usize = 64;

/// Voice ids become a URL path segment, so only `[A-Za-z0-9_-]{1,64}` passes
pub fn is_valid_voice_id(voice_id: &str) -> bool {
    !voice_id.is_empty()
        && voice_id.len() <= MAX_VOICE_ID_LEN
        && voice_id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

pub fn tts_request(config: &VendorConfig, text: &str) -> Value {
    json!({
        "text": text,
        "model_id": config.tts_model_id,
        "voice_settings": {
            "stability": 0.5,
            "similarity_boost": 0.75,
            "style": 0.2,
            "use_speaker_boost": true
        }
    })
}

/// Start a speech synthesis; the caller streams or buffers the body
pub async fn synthesize(
    http: &reqwest::Client,
    config: &VendorConfig,
    voice_id: Option<&str>,
    text: &str,
) -> Result<reqwest::Response, VendorError> {
    let api_key = config
        .elevenlabs_api_key
        .as_deref()
        .ok_or(VendorError::NotConfigured("ELEVENLABS_API_KEY"))?;
    let voice = voice_id.unwrap_or(&config.default_voice_id);

    let resp = http
        .post(format!("{}/v1/text-to-speech/{}/stream", config.elevenlabs_base_url, voice))
        .header("xi-api-key", api_key)
        .header(reqwest::header::ACCEPT, DEFAULT_CONTENT_TYPE)
        .json(&tts_request(config, text))
        .send()
        .await?;
    check_status(resp).await
}

/// Content type reported by the vendor, `audio/mpeg` when absent
pub fn content_type(resp: &reqwest::Response) -> String {
    resp.headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn request_carries_model_and_voice_settings() {
        let config = AppConfig::development().vendors;
        let body = tts_request(&config, "Hello");
        assert_eq!(body["model_id"], "eleven_monolingual_v1");
        assert_eq!(body["voice_settings"]["similarity_boost"], 0.75);
        assert_eq!(body["voice_settings"]["use_speaker_boost"], true);
    }

    #[test]
    fn voice_ids_are_single_safe_segments() {
        assert!(is_valid_voice_id("21m00Tcm4TlvDq8ikWAM"));
        assert!(is_valid_voice_id("my_voice-2"));
        assert!(!is_valid_voice_id(""));
        assert!(!is_valid_voice_id("x/../../chat/completions?"));
        assert!(!is_valid_voice_id("voice id"));
        assert!(!is_valid_voice_id("v%2F"));
        assert!(!is_valid_voice_id(&"a".repeat(MAX_VOICE_ID_LEN + 1)));
    }
}
