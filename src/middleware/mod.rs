pub mod auth;
pub mod entitlement;
pub mod extract;
pub mod rate_limit;
pub mod response;

pub use auth::{AdminSession, SessionUser};
pub use entitlement::require_feature;
pub use extract::{ApiJson, ApiPath, ApiQuery};
pub use response::{method_not_allowed_json, route_not_found, ApiResponse, ApiResult};
