use chrono::Utc;

use crate::error::ApiError;
use crate::middleware::SessionUser;
use crate::services::{Entitlement, Feature};
use crate::state::AppState;

/// Load the caller's subscription and require `feature`, else 403
pub async fn require_feature(state: &AppState, user: &SessionUser, feature: Feature) -> Result<Entitlement, ApiError> {
    let subscription = state.store.get_subscription(user.id).await?;
    let entitlement = Entitlement::evaluate(subscription.as_ref(), Utc::now());

    if !entitlement.allows(feature) {
        tracing::info!(
            user_id = %user.id,
            feature = feature.as_str(),
            reason = entitlement.reason.unwrap_or("plan_excludes_feature"),
            "Entitlement check failed"
        );
        return Err(ApiError::forbidden(format!(
            "Your subscription does not include {}",
            feature.as_str()
        )));
    }
    Ok(entitlement)
}
