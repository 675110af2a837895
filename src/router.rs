use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::map_response,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::SecurityConfig;
use crate::handlers::{elevated, protected, public};
use crate::middleware::{method_not_allowed_json, route_not_found};
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let router = Router::new()
        .merge(public_routes())
        .merge(protected_routes())
        .merge(proxy_routes())
        .merge(admin_routes())
        .fallback(route_not_found)
        .layer(map_response(method_not_allowed_json))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    let router = if config.security.enable_cors {
        router.layer(cors_layer(&config.security))
    } else {
        router
    };

    let router = if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root::root))
        .route("/health", get(public::root::health))
        .route("/api/access/request", post(public::access::request_access))
        .route("/api/demo/dashboard", get(public::demo::dashboard))
        .route("/api/admin/login", post(public::admin_session::login))
        .route("/api/admin/logout", post(public::admin_session::logout))
}

fn protected_routes() -> Router<AppState> {
    use protected::*;

    Router::new()
        .route("/api/auth/whoami", get(whoami::whoami))
        // Study tools
        .route("/api/tasks", get(tasks::list).post(tasks::create))
        .route("/api/tasks/:id", axum::routing::patch(tasks::update).delete(tasks::delete))
        .route("/api/study-sessions", get(study::list).post(study::create))
        .route("/api/lecturer-feedback", get(feedback::list).post(feedback::create))
        .route("/api/lectures", get(lectures::list).post(lectures::create))
        .route("/api/lectures/:id/status", put(lectures::set_status))
        .route("/api/transcripts", get(transcripts::list).post(transcripts::create))
        .route(
            "/api/transcripts/:id",
            axum::routing::patch(transcripts::update).delete(transcripts::delete),
        )
        .route("/api/writing-samples", get(writing::list).post(writing::create))
        .route(
            "/api/writing-samples/:id",
            get(writing::get).put(writing::update).delete(writing::delete),
        )
        // Wellbeing
        .route("/api/journal", get(journal::list).post(journal::create))
        .route("/api/wellbeing/checkins", get(wellbeing::list).post(wellbeing::create))
        .route("/api/wellbeing/summary", get(wellbeing::summary))
        .route("/api/awy/connections", get(awy::list).post(awy::create))
        // Citations
        .route("/api/oscola/format", post(oscola::format))
        .route("/api/oscola/validate", post(oscola::validate))
        .route("/api/oscola/examples", get(oscola::examples))
        // Billing
        .route("/api/billing/subscription", get(billing::subscription))
}

fn proxy_routes() -> Router<AppState> {
    Router::new()
        .route("/api/chat", post(protected::chat::chat))
        .route("/api/voice/tts", post(protected::voice::tts))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/subscriptions", get(elevated::subscriptions::list))
        .route("/api/admin/subscriptions/:user_id", put(elevated::subscriptions::upsert))
        .route("/api/admin/access-requests", get(elevated::access_requests::list))
        .route(
            "/api/admin/access-requests/:id/approve",
            post(elevated::access_requests::approve),
        )
}
