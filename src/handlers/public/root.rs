// handlers/public/root.rs - service index and health
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Caseway API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Student platform API: study tools, wellbeing, AI tutor and voice",
            "endpoints": {
                "public": "/health, /api/access/request, /api/demo/dashboard, /api/admin/login, /api/admin/logout",
                "study": "/api/tasks, /api/study-sessions, /api/lecturer-feedback, /api/lectures, /api/transcripts, /api/writing-samples (session)",
                "wellbeing": "/api/journal, /api/wellbeing/checkins, /api/wellbeing/summary, /api/awy/connections (session)",
                "account": "/api/auth/whoami, /api/billing/subscription (session)",
                "ai": "/api/chat, /api/voice/tts (session + entitlement)",
                "admin": "/api/admin/subscriptions, /api/admin/access-requests (admin cookie)"
            }
        }
    }))
}

/// GET /health - 503 when the store does not answer
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database_error": e.to_string()
                    }
                })),
            )
        }
    }
}
