use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::error::ApiError;

/// Success envelope: `{"success": true, "data": ...}`
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    status: StatusCode,
    data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::with_status(data, StatusCode::OK)
    }

    pub fn with_status(data: T, status: StatusCode) -> Self {
        Self { status, data: Some(data) }
    }

    pub fn created(data: T) -> Self {
        Self::with_status(data, StatusCode::CREATED)
    }

    pub fn accepted(data: T) -> Self {
        Self::with_status(data, StatusCode::ACCEPTED)
    }
}

impl ApiResponse<()> {
    /// 204 with an empty body
    pub fn no_content() -> Self {
        Self { status: StatusCode::NO_CONTENT, data: None }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let Some(data) = self.data else {
            return self.status.into_response();
        };

        match serde_json::to_value(&data) {
            Ok(data) => (self.status, Json(json!({ "success": true, "data": data }))).into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                ApiError::internal_server_error("Failed to serialize response data").into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

/// Rewrite axum's bare 405 into the JSON error body, keeping its `Allow` header.
/// A 405 that already has a content type (a relayed vendor error) passes through.
pub async fn method_not_allowed_json(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED || response.headers().contains_key(header::CONTENT_TYPE) {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut rewritten = ApiError::method_not_allowed("Method not allowed").into_response();
    if let Some(allow) = allow {
        rewritten.headers_mut().insert(header::ALLOW, allow);
    }
    rewritten
}

/// Router fallback for unknown paths
pub async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
