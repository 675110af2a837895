mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn no_subscription_is_not_entitled() -> Result<()> {
    let app = common::test_app()?;
    let user = Uuid::new_v4();

    let (status, body) = app.get("/api/billing/subscription", Some(user)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["entitled"], false);
    assert_eq!(body["data"]["reason"], "no_subscription");
    assert_eq!(body["data"]["features"], json!([]));
    Ok(())
}

#[tokio::test]
async fn core_plan_grants_chat_only() -> Result<()> {
    let app = common::test_app()?;
    let user = Uuid::new_v4();
    app.entitle(user, "core").await?;

    let (_, body) = app.get("/api/billing/subscription", Some(user)).await?;
    assert_eq!(body["data"]["entitled"], true);
    assert_eq!(body["data"]["plan"], "core");
    assert_eq!(body["data"]["features"], json!(["ai_chat"]));

    // Voice is gated before any vendor call is attempted
    let (status, body) = app.post("/api/voice/tts", Some(user), json!({ "text": "Hello" })).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
    Ok(())
}

#[tokio::test]
async fn unentitled_chat_is_forbidden() -> Result<()> {
    let app = common::test_app()?;
    let user = Uuid::new_v4();

    let (status, _) = app
        .post("/api/chat", Some(user), json!({ "messages": [{ "role": "user", "content": "Hi" }] }))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Empty conversation is rejected before the entitlement lookup
    let (status, _) = app.post("/api/chat", Some(user), json!({ "messages": [] })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}
