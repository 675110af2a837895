mod common;

use anyhow::Result;
use axum::{
    body::to_bytes,
    http::{header, StatusCode},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;
use uuid::Uuid;

async fn vendor_app() -> Result<common::TestApp> {
    let base = common::spawn_mock_vendor().await?;
    common::TestApp::new(common::test_config(Some(&base)))
}

fn ask(content: &str) -> serde_json::Value {
    json!({ "messages": [{ "role": "user", "content": content }] })
}

#[tokio::test]
async fn chat_returns_answer_and_sources() -> Result<()> {
    let app = vendor_app().await?;
    let user = Uuid::new_v4();
    app.entitle(user, "core").await?;

    let (status, body) = app
        .post("/api/chat", Some(user), json!({
            "messages": [{ "role": "user", "content": "What makes a contract binding?" }],
            "module": "LAW1051"
        }))
        .await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["answer"], "echo: What makes a contract binding?");
    assert_eq!(body["data"]["sources"][0]["type"], "case");
    assert_eq!(body["data"]["mode"], "default");
    assert_eq!(body["data"]["module"], "LAW1051");
    Ok(())
}

#[tokio::test]
async fn integrity_guard_refuses_without_calling_vendor() -> Result<()> {
    let app = vendor_app().await?;
    let user = Uuid::new_v4();
    app.entitle(user, "core").await?;

    let (status, body) = app.post("/api/chat", Some(user), ask("Please write my essay on tort")).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ACADEMIC_INTEGRITY");
    assert!(body["answer"].as_str().unwrap_or_default().contains("academic integrity"));
    assert_eq!(body["sources"], json!([]));
    Ok(())
}

#[tokio::test]
async fn chat_limit_is_per_user() -> Result<()> {
    let base = common::spawn_mock_vendor().await?;
    let mut config = common::test_config(Some(&base));
    config.api.chat_daily_limit = 2;
    let app = common::TestApp::new(config)?;
    let user = Uuid::new_v4();
    let other = Uuid::new_v4();
    app.entitle(user, "core").await?;
    app.entitle(other, "core").await?;

    for _ in 0..2 {
        let (status, _) = app.post("/api/chat", Some(user), ask("Explain consideration")).await?;
        assert_eq!(status, StatusCode::OK);
    }
    let response = app
        .raw(common::request("POST", "/api/chat", Some(user), Some(ask("One more"))))
        .await?;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(header::RETRY_AFTER));

    let (status, _) = app.post("/api/chat", Some(other), ask("Explain consideration")).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn chat_streams_vendor_events() -> Result<()> {
    let app = vendor_app().await?;
    let user = Uuid::new_v4();
    app.entitle(user, "core").await?;

    let mut body = ask("Explain estoppel");
    body["stream"] = json!(true);
    let response = app.raw(common::request("POST", "/api/chat", Some(user), Some(body))).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "text/event-stream");

    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("data: [DONE]"), "unexpected stream {:?}", text);
    Ok(())
}

#[tokio::test]
async fn vendor_errors_are_relayed() -> Result<()> {
    let app = vendor_app().await?;
    let user = Uuid::new_v4();
    app.entitle(user, "core").await?;

    let (status, body) = app.post("/api/chat", Some(user), ask("vendor-fail please")).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Incorrect API key provided");
    Ok(())
}

#[tokio::test]
async fn tts_streams_audio_or_base64() -> Result<()> {
    let app = vendor_app().await?;
    let user = Uuid::new_v4();
    app.entitle(user, "pro").await?;

    let response = app
        .raw(common::request("POST", "/api/voice/tts", Some(user), Some(json!({ "text": "Hello there", "voice_id": "abc" }))))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "audio/mpeg");
    let audio = to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(&audio[..], b"ID3-fake-audio-abc");

    let (status, body) = app
        .post("/api/voice/tts", Some(user), json!({ "text": "Hello there", "encoding": "base64" }))
        .await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let decoded = STANDARD.decode(body["data"]["audio_base64"].as_str().unwrap_or_default())?;
    assert_eq!(decoded.len() as u64, body["data"]["bytes"].as_u64().unwrap_or_default());
    assert!(decoded.starts_with(b"ID3-fake-audio-"));
    Ok(())
}

#[tokio::test]
async fn tts_validates_text_before_entitlement() -> Result<()> {
    let app = vendor_app().await?;
    let user = Uuid::new_v4();

    let (status, _) = app.post("/api/voice/tts", Some(user), json!({ "text": "" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let long = "a".repeat(5001);
    let (status, _) = app.post("/api/voice/tts", Some(user), json!({ "text": long })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn tts_rejects_voice_ids_that_are_not_one_path_segment() -> Result<()> {
    let app = vendor_app().await?;
    let user = Uuid::new_v4();
    app.entitle(user, "pro").await?;

    for voice_id in ["x/../../chat/completions?", "a b", "..", &"v".repeat(65)] {
        let (status, body) = app
            .post("/api/voice/tts", Some(user), json!({ "text": "Hello there", "voice_id": voice_id }))
            .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}: {}", voice_id, body);
        assert_eq!(body["message"], "Invalid field 'voice_id'");
    }
    Ok(())
}

#[tokio::test]
async fn vendor_405_is_relayed_not_rewritten() -> Result<()> {
    let app = vendor_app().await?;
    let user = Uuid::new_v4();
    app.entitle(user, "core").await?;

    let (status, body) = app.post("/api/chat", Some(user), ask("vendor-405 please")).await?;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"]["message"], "Model does not support this operation");
    Ok(())
}
