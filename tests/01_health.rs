mod common;

use anyhow::Result;
use axum::http::StatusCode;

#[tokio::test]
async fn root_lists_endpoints() -> Result<()> {
    let app = common::test_app()?;
    let (status, body) = app.get("/", None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true, "success flag false or missing: {}", body);
    assert_eq!(body["data"]["name"], "Caseway API");
    assert!(body["data"]["endpoints"].is_object(), "missing endpoints: {}", body);
    Ok(())
}

#[tokio::test]
async fn health_reports_store() -> Result<()> {
    let app = common::test_app()?;
    let (status, body) = app.get("/health", None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_json_404() -> Result<()> {
    let app = common::test_app()?;
    let (status, body) = app.get("/api/nope", None).await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "NOT_FOUND");
    Ok(())
}
