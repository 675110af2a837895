mod common;

use anyhow::Result;
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn study_sessions_come_with_aggregates() -> Result<()> {
    let app = common::test_app()?;
    let user = Uuid::new_v4();

    for minutes in [30, 60] {
        let (status, body) = app
            .post(
                "/api/study-sessions",
                Some(user),
                json!({ "topic": "Tort", "duration_min": minutes, "started_at": Utc::now(), "tags": ["revision"] }),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
    }

    let (status, body) = app.get("/api/study-sessions?period=7d", Some(user)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["sessions"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["data"]["aggregates"]["total_minutes"], 90);
    assert_eq!(body["data"]["aggregates"]["session_count"], 2);
    assert_eq!(body["data"]["aggregates"]["current_streak"], 1);

    let (status, _) = app
        .post("/api/study-sessions", Some(user), json!({ "topic": "Tort", "duration_min": 0 }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn lecturer_feedback_uppercases_module_code() -> Result<()> {
    let app = common::test_app()?;
    let user = Uuid::new_v4();

    let (status, body) = app
        .post(
            "/api/lecturer-feedback",
            Some(user),
            json!({ "module_code": "law2041", "lecturer_name": "Dr Smith", "rating": 4, "comment": "Clear slides" }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["module_code"], "LAW2041");

    let (status, _) = app
        .post("/api/lecturer-feedback", Some(user), json!({ "module_code": "LAW2041", "rating": 9, "comment": "Fine" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn lecture_status_can_be_set() -> Result<()> {
    let app = common::test_app()?;
    let user = Uuid::new_v4();

    let (status, created) = app
        .post("/api/lectures", Some(user), json!({ "title": "Week 3: Negligence", "module_code": "LAW2041" }))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["status"], "uploaded");
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .put(&format!("/api/lectures/{}/status", id), Some(user), json!({ "status": "ready" }))
        .await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "ready");

    let (status, _) = app
        .put(&format!("/api/lectures/{}/status", id), Some(user), json!({ "status": "archived" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn transcripts_search_pin_and_title() -> Result<()> {
    let app = common::test_app()?;
    let user = Uuid::new_v4();
    let started = Utc::now() - Duration::minutes(10);

    let (status, first) = app
        .post(
            "/api/transcripts",
            Some(user),
            json!({
                "started_at": started,
                "turns": [
                    { "role": "user", "content": "Explain the contract formation rules" },
                    { "role": "assistant", "content": "Offer, acceptance, consideration." }
                ]
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED, "{}", first);
    assert!(first["data"]["title"].as_str().unwrap_or_default().len() > 0);
    assert_eq!(first["data"]["turns"].as_array().map(Vec::len), Some(2));

    let (_, second) = app
        .post(
            "/api/transcripts",
            Some(user),
            json!({
                "title": "Revision chat",
                "started_at": started,
                "turns": [{ "role": "user", "content": "How should I plan revision?" }]
            }),
        )
        .await?;
    let second_id = second["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .post("/api/transcripts", Some(user), json!({ "started_at": started, "turns": [] }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.get("/api/transcripts?q=CONSIDERATION", Some(user)).await?;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["transcripts"][0]["id"], first["data"]["id"]);

    let (status, _) = app
        .patch(&format!("/api/transcripts/{}", second_id), Some(user), json!({ "is_pinned": true }))
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/transcripts?pinned=true", Some(user)).await?;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["transcripts"][0]["title"], "Revision chat");

    let (_, body) = app.get("/api/transcripts?page=1&page_size=1", Some(user)).await?;
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["transcripts"].as_array().map(Vec::len), Some(1));

    assert_eq!(
        app.delete(&format!("/api/transcripts/{}", second_id), Some(user)).await?,
        StatusCode::NO_CONTENT
    );
    Ok(())
}

#[tokio::test]
async fn writing_samples_need_substance() -> Result<()> {
    let app = common::test_app()?;
    let user = Uuid::new_v4();

    let (status, _) = app
        .post("/api/writing-samples", Some(user), json!({ "title": "Short", "content": "Too short." }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let content = "The doctrine of precedent binds lower courts to follow the ratio decidendi of higher courts.";
    let (status, created) = app
        .post("/api/writing-samples", Some(user), json!({ "title": "Precedent", "content": content }))
        .await?;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(created["data"]["confidence_score"], 1.0);
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .put(&format!("/api/writing-samples/{}", id), Some(user), json!({ "confidence_score": 1.5 }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .put(&format!("/api/writing-samples/{}", id), Some(user), json!({ "title": "Stare decisis" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Stare decisis");

    let (status, _) = app.get(&format!("/api/writing-samples/{}", id), Some(Uuid::new_v4())).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(
        app.delete(&format!("/api/writing-samples/{}", id), Some(user)).await?,
        StatusCode::NO_CONTENT
    );
    Ok(())
}

#[tokio::test]
async fn transcript_listing_handles_extreme_pages_and_wildcards() -> Result<()> {
    let app = common::test_app()?;
    let user = Uuid::new_v4();
    let started = Utc::now() - Duration::minutes(10);

    for content in ["I am 100% ready for contract law", "Tort revision plan"] {
        let (status, _) = app
            .post(
                "/api/transcripts",
                Some(user),
                json!({ "started_at": started, "turns": [{ "role": "user", "content": content }] }),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app.get("/api/transcripts?page=9223372036854775807", Some(user)).await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["transcripts"].as_array().map(Vec::len), Some(0));

    let (_, body) = app.get("/api/transcripts?q=%25", Some(user)).await?;
    assert_eq!(body["data"]["total"], 1);

    let (_, body) = app.get("/api/transcripts?q=_", Some(user)).await?;
    assert_eq!(body["data"]["total"], 0);
    Ok(())
}
