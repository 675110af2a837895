use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::models::{Subscription, SubscriptionPlan, SubscriptionStatus};

/// A gated capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    AiChat,
    Voice,
}

impl Feature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::AiChat => "ai_chat",
            Feature::Voice => "voice",
        }
    }
}

/// Features granted by a plan while the subscription is in good standing
pub fn plan_features(plan: SubscriptionPlan) -> Vec<Feature> {
    match plan {
        SubscriptionPlan::Core => vec![Feature::AiChat],
        SubscriptionPlan::Pro => vec![Feature::AiChat, Feature::Voice],
    }
}

const ALL_FEATURES: [Feature; 2] = [Feature::AiChat, Feature::Voice];

/// Entitlement derived from a subscription record at a point in time
#[derive(Debug, Clone, Serialize)]
pub struct Entitlement {
    pub status: Option<SubscriptionStatus>,
    pub plan: Option<SubscriptionPlan>,
    pub entitled: bool,
    pub features: Vec<Feature>,
    pub trial_days_remaining: Option<i64>,
    pub reason: Option<&'static str>,
}

impl Entitlement {
    pub fn evaluate(subscription: Option<&Subscription>, now: DateTime<Utc>) -> Self {
        let Some(sub) = subscription else {
            return Self::denied(None, None, "no_subscription");
        };

        let still_open = |end: Option<DateTime<Utc>>| end.map_or(false, |end| end > now);

        match sub.status {
            SubscriptionStatus::Trial => {
                if still_open(sub.trial_end_date) {
                    Self {
                        status: Some(sub.status),
                        plan: Some(sub.plan),
                        entitled: true,
                        features: ALL_FEATURES.to_vec(),
                        trial_days_remaining: sub.trial_end_date.map(|end| days_remaining(end, now)),
                        reason: None,
                    }
                } else {
                    let mut denied = Self::denied(Some(sub.status), Some(sub.plan), "trial_expired");
                    denied.trial_days_remaining = Some(0);
                    denied
                }
            }
            SubscriptionStatus::Active => Self::granted(sub),
            SubscriptionStatus::PastDue | SubscriptionStatus::Cancelled => {
                if still_open(sub.current_period_end) {
                    Self::granted(sub)
                } else {
                    Self::denied(Some(sub.status), Some(sub.plan), "period_ended")
                }
            }
            SubscriptionStatus::Expired => Self::denied(Some(sub.status), Some(sub.plan), "expired"),
        }
    }

    pub fn allows(&self, feature: Feature) -> bool {
        self.entitled && self.features.contains(&feature)
    }

    fn granted(sub: &Subscription) -> Self {
        Self {
            status: Some(sub.status),
            plan: Some(sub.plan),
            entitled: true,
            features: plan_features(sub.plan),
            trial_days_remaining: None,
            reason: None,
        }
    }

    fn denied(
        status: Option<SubscriptionStatus>,
        plan: Option<SubscriptionPlan>,
        reason: &'static str,
    ) -> Self {
        Self {
            status,
            plan,
            entitled: false,
            features: Vec::new(),
            trial_days_remaining: None,
            reason: Some(reason),
        }
    }
}

/// Whole days left, rounded up, never negative
fn days_remaining(end: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let secs = (end - now).num_seconds();
    if secs <= 0 {
        return 0;
    }
    (secs + 86_399) / 86_400
}
