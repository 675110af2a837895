mod common;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};

fn from_ip(ip: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/access/request")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", ip)
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn allowed_domain_gets_a_trial() -> Result<()> {
    let app = common::test_app()?;
    let (status, body) = app
        .send(from_ip("198.51.100.1", json!({ "email": "Sam@Students.Durham.ac.uk" })))
        .await?;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "approved");
    assert_eq!(body["data"]["email"], "sam@students.durham.ac.uk");
    assert_eq!(body["data"]["trial_days"], 30);
    Ok(())
}

#[tokio::test]
async fn other_domains_are_queued() -> Result<()> {
    let app = common::test_app()?;
    let (status, body) = app.send(from_ip("198.51.100.2", json!({ "email": "sam@gmail.com" }))).await?;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["data"]["status"], "pending");
    Ok(())
}

#[tokio::test]
async fn invalid_email_is_rejected() -> Result<()> {
    let app = common::test_app()?;
    let (status, _) = app.send(from_ip("198.51.100.3", json!({ "email": "not-an-email" }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app.send(from_ip("198.51.100.3", json!({}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn per_ip_limit_applies() -> Result<()> {
    let app = common::test_app()?;
    let limit = app.config.access.ip_requests_per_hour;

    for i in 0..limit {
        let email = format!("student{}@durham.ac.uk", i);
        let (status, _) = app.send(from_ip("203.0.113.7", json!({ "email": email }))).await?;
        assert_eq!(status, StatusCode::OK);
    }

    let response = app
        .raw(from_ip("203.0.113.7", json!({ "email": "late@durham.ac.uk" })))
        .await?;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(header::RETRY_AFTER));

    // Another address is unaffected
    let (status, _) = app.send(from_ip("203.0.113.8", json!({ "email": "late@durham.ac.uk" }))).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn per_email_limit_applies_across_addresses() -> Result<()> {
    let app = common::test_app()?;
    let limit = app.config.access.email_requests_per_day;

    for i in 0..limit {
        let ip = format!("192.0.2.{}", i + 1);
        let (status, _) = app.send(from_ip(&ip, json!({ "email": "repeat@durham.ac.uk" }))).await?;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = app
        .send(from_ip("192.0.2.200", json!({ "email": "REPEAT@durham.ac.uk" })))
        .await?;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], "TOO_MANY_REQUESTS");
    Ok(())
}

#[tokio::test]
async fn repeat_request_keeps_the_admin_decision() -> Result<()> {
    let app = common::test_app()?;

    let (status, _) = app.send(from_ip("198.51.100.20", json!({ "email": "visitor@gmail.com" }))).await?;
    assert_eq!(status, StatusCode::ACCEPTED);

    let mut list = common::request("GET", "/api/admin/access-requests", None, None);
    list.headers_mut().insert(header::COOKIE, common::admin_cookie().parse()?);
    let (_, body) = app.send(list).await?;
    let id = body["data"][0]["id"].as_str().unwrap_or_default().to_string();

    let mut approve = common::request("POST", &format!("/api/admin/access-requests/{}/approve", id), None, None);
    approve.headers_mut().insert(header::COOKIE, common::admin_cookie().parse()?);
    let (status, approved) = app.send(approve).await?;
    assert_eq!(status, StatusCode::OK, "{}", approved);
    let trial = approved["data"]["request"]["trial_expires_at"].clone();
    assert!(trial.is_string());

    // Anonymous re-request of the same address
    let (status, body) = app.send(from_ip("198.51.100.21", json!({ "email": "Visitor@gmail.com" }))).await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "approved");

    let mut list = common::request("GET", "/api/admin/access-requests", None, None);
    list.headers_mut().insert(header::COOKIE, common::admin_cookie().parse()?);
    let (_, body) = app.send(list).await?;
    assert_eq!(body["data"][0]["status"], "approved");
    assert_eq!(body["data"][0]["trial_expires_at"], trial);
    Ok(())
}
