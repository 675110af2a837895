mod common;

use anyhow::Result;
use axum::http::StatusCode;

#[tokio::test]
async fn dashboard_is_scrubbed() -> Result<()> {
    let mut config = common::test_config(None);
    config.demo.deny_list = vec!["Dassonville".to_string(), "LAW2041".to_string()];
    let app = common::TestApp::new(config)?;

    let (status, body) = app.get("/api/demo/dashboard", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let text = body.to_string().to_lowercase();
    assert!(!text.contains("dassonville"), "deny-listed term leaked: {}", text);
    assert!(!text.contains("law2041"), "deny-listed term leaked: {}", text);
    Ok(())
}

#[tokio::test]
async fn default_deny_list_hides_brand_names() -> Result<()> {
    let app = common::test_app()?;
    let (_, body) = app.get("/api/demo/dashboard", None).await?;
    let text = body.to_string().to_lowercase();
    for term in &app.config.demo.deny_list {
        assert!(!text.contains(&term.to_lowercase()), "{} leaked", term);
    }
    Ok(())
}

#[tokio::test]
async fn disabled_demo_is_404() -> Result<()> {
    let mut config = common::test_config(None);
    config.demo.enabled = false;
    let app = common::TestApp::new(config)?;

    let (status, body) = app.get("/api/demo/dashboard", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], true);
    Ok(())
}
