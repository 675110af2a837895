#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    extract::Path,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Duration;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use caseway_api::auth::{admin_token, issue_session_token, SessionClaims};
use caseway_api::config::AppConfig;
use caseway_api::database::{MemoryStore, Store};
use caseway_api::{app, AppState};

pub const JWT_SECRET: &str = "integration-test-secret";
pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASS: &str = "correct horse battery staple";

/// Development preset with credentials filled in and vendors pointed at `vendor_base`
/// Who may call a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Public,
    Session,
    Admin,
}

/// Every route the router serves: path (with a placeholder id), allowed methods, gate
pub const ROUTES: &[(&str, &[&str], Gate)] = &[
    ("/", &["GET"], Gate::Public),
    ("/health", &["GET"], Gate::Public),
    ("/api/access/request", &["POST"], Gate::Public),
    ("/api/demo/dashboard", &["GET"], Gate::Public),
    ("/api/admin/login", &["POST"], Gate::Public),
    ("/api/admin/logout", &["POST"], Gate::Public),
    ("/api/auth/whoami", &["GET"], Gate::Session),
    ("/api/tasks", &["GET", "POST"], Gate::Session),
    ("/api/tasks/00000000-0000-4000-8000-000000000001", &["PATCH", "DELETE"], Gate::Session),
    ("/api/study-sessions", &["GET", "POST"], Gate::Session),
    ("/api/lecturer-feedback", &["GET", "POST"], Gate::Session),
    ("/api/lectures", &["GET", "POST"], Gate::Session),
    ("/api/lectures/00000000-0000-4000-8000-000000000001/status", &["PUT"], Gate::Session),
    ("/api/transcripts", &["GET", "POST"], Gate::Session),
    ("/api/transcripts/00000000-0000-4000-8000-000000000001", &["PATCH", "DELETE"], Gate::Session),
    ("/api/writing-samples", &["GET", "POST"], Gate::Session),
    ("/api/writing-samples/00000000-0000-4000-8000-000000000001", &["GET", "PUT", "DELETE"], Gate::Session),
    ("/api/journal", &["GET", "POST"], Gate::Session),
    ("/api/wellbeing/checkins", &["GET", "POST"], Gate::Session),
    ("/api/wellbeing/summary", &["GET"], Gate::Session),
    ("/api/awy/connections", &["GET", "POST"], Gate::Session),
    ("/api/oscola/format", &["POST"], Gate::Session),
    ("/api/oscola/validate", &["POST"], Gate::Session),
    ("/api/oscola/examples", &["GET"], Gate::Session),
    ("/api/billing/subscription", &["GET"], Gate::Session),
    ("/api/chat", &["POST"], Gate::Session),
    ("/api/voice/tts", &["POST"], Gate::Session),
    ("/api/admin/subscriptions", &["GET"], Gate::Admin),
    ("/api/admin/subscriptions/00000000-0000-4000-8000-000000000001", &["PUT"], Gate::Admin),
    ("/api/admin/access-requests", &["GET"], Gate::Admin),
    ("/api/admin/access-requests/00000000-0000-4000-8000-000000000001/approve", &["POST"], Gate::Admin),
];

pub const METHODS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE"];

pub fn test_config(vendor_base: Option<&str>) -> AppConfig {
    let mut config = AppConfig::development();
    config.auth.jwt_secret = JWT_SECRET.to_string();
    config.admin.username = Some(ADMIN_USER.to_string());
    config.admin.password = Some(ADMIN_PASS.to_string());
    config.vendors.openai_api_key = Some("sk-test".to_string());
    config.vendors.elevenlabs_api_key = Some("xi-test".to_string());
    if let Some(base) = vendor_base {
        config.vendors.openai_base_url = base.to_string();
        config.vendors.elevenlabs_base_url = base.to_string();
    }
    config.demo.enabled = true;
    config
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub config: AppConfig,
}

impl TestApp {
    pub fn new(config: AppConfig) -> Result<Self> {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(config.clone(), store.clone()).context("failed to build state")?;
        Ok(Self { router: app(state), store, config })
    }

    pub async fn send(&self, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let response = self.router.clone().oneshot(request).await?;
        read_json(response).await
    }

    pub async fn raw(&self, request: Request<Body>) -> Result<Response> {
        Ok(self.router.clone().oneshot(request).await?)
    }

    pub async fn get(&self, path: &str, user: Option<Uuid>) -> Result<(StatusCode, Value)> {
        self.send(request("GET", path, user, None)).await
    }

    pub async fn post(&self, path: &str, user: Option<Uuid>, body: Value) -> Result<(StatusCode, Value)> {
        self.send(request("POST", path, user, Some(body))).await
    }

    pub async fn patch(&self, path: &str, user: Option<Uuid>, body: Value) -> Result<(StatusCode, Value)> {
        self.send(request("PATCH", path, user, Some(body))).await
    }

    pub async fn put(&self, path: &str, user: Option<Uuid>, body: Value) -> Result<(StatusCode, Value)> {
        self.send(request("PUT", path, user, Some(body))).await
    }

    pub async fn delete(&self, path: &str, user: Option<Uuid>) -> Result<StatusCode> {
        Ok(self.raw(request("DELETE", path, user, None)).await?.status())
    }

    /// Give `user` an active subscription on `plan`
    pub async fn entitle(&self, user: Uuid, plan: &str) -> Result<()> {
        let update = caseway_api::database::models::SubscriptionUpdate {
            plan: serde_json::from_value(json!(plan))?,
            status: caseway_api::database::models::SubscriptionStatus::Active,
            trial_end_date: None,
            current_period_end: Some(chrono::Utc::now() + Duration::days(30)),
        };
        self.store.upsert_subscription(user, update).await?;
        Ok(())
    }
}

pub fn test_app() -> Result<TestApp> {
    TestApp::new(test_config(None))
}

pub fn bearer(user: Uuid) -> String {
    let auth = test_config(None).auth;
    let claims = SessionClaims::new(user, Some("student@durham.ac.uk".into()), &auth.jwt_audience, Duration::hours(1));
    issue_session_token(&claims, &auth).expect("failed to sign test token")
}

pub fn admin_cookie() -> String {
    format!("admin_session={}", admin_token(ADMIN_USER, ADMIN_PASS).expect("hmac"))
}

pub fn request(method: &str, path: &str, user: Option<Uuid>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(user) = user {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", bearer(user)));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub async fn read_json(response: Response) -> Result<(StatusCode, Value)> {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).with_context(|| format!("non-JSON body: {:?}", bytes))?
    };
    Ok((status, body))
}

/// Stand-in for the chat and speech vendors. A message containing "vendor-fail"
/// makes the chat endpoint answer 401 like a rejected API key.
pub async fn spawn_mock_vendor() -> Result<String> {
    async fn chat(Json(body): Json<Value>) -> Response {
        let last = body["messages"]
            .as_array()
            .and_then(|m| m.last())
            .and_then(|m| m["content"].as_str())
            .unwrap_or_default()
            .to_string();
        if last.contains("vendor-fail") {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": { "message": "Incorrect API key provided" } })),
            )
                .into_response();
        }
        if last.contains("vendor-405") {
            return (
                StatusCode::METHOD_NOT_ALLOWED,
                Json(json!({ "error": { "message": "Model does not support this operation" } })),
            )
                .into_response();
        }
        if body["stream"] == true {
            let sse = "data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\ndata: [DONE]\n\n";
            return ([(header::CONTENT_TYPE, "text/event-stream")], sse).into_response();
        }
        Json(json!({
            "choices": [{ "message": { "role": "assistant", "content": format!("echo: {}", last) } }]
        }))
        .into_response()
    }

    async fn tts(Path(voice): Path<String>) -> Response {
        let audio = format!("ID3-fake-audio-{}", voice).into_bytes();
        ([(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response()
    }

    let router = Router::new()
        .route("/v1/chat/completions", post(chat))
        .route("/v1/text-to-speech/:voice/stream", post(tts));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(format!("http://{}", addr))
}
