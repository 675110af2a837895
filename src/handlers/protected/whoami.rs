// handlers/protected/whoami.rs - GET /api/auth/whoami
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult, SessionUser};

pub async fn whoami(user: SessionUser) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "id": user.id,
        "email": user.email,
        "role": user.role,
    })))
}
