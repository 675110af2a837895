use chrono::{DateTime, Utc};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::hash::Hash;
use std::num::NonZeroU32;
use std::time::Duration;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::ApiError;

const HOUR: Duration = Duration::from_secs(60 * 60);
const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Stale window keys are swept once the map grows past this
const PRUNE_AT: usize = 10_000;

/// Fixed-window counter: at most `limit` calls per key in each aligned `window`
/// (hour windows start on the hour, day windows at 00:00 UTC).
///
/// Cells live in a governor keyed limiter under `(key, window index)`. The quota
/// replenishes one cell per `window`, which never happens before the index moves
/// on, so a window can never hand out more than its burst.
pub struct WindowLimiter<K: Hash + Eq + Clone> {
    window_secs: u64,
    cells: DefaultKeyedRateLimiter<(K, u64)>,
}

impl<K: Hash + Eq + Clone> WindowLimiter<K> {
    pub fn new(limit: u32, window: Duration) -> Self {
        let burst = NonZeroU32::new(limit).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(window)
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);
        Self {
            window_secs: window.as_secs().max(1),
            cells: RateLimiter::keyed(quota),
        }
    }

    fn check_at(&self, key: &K, now: DateTime<Utc>) -> Result<(), u64> {
        let now = u64::try_from(now.timestamp()).unwrap_or_default();
        let index = now / self.window_secs;

        if self.cells.len() > PRUNE_AT {
            self.cells.retain_recent();
        }
        self.cells
            .check_key(&(key.clone(), index))
            .map_err(|_| self.window_secs - now % self.window_secs)
    }
}

/// Limiters shared by every request in the process
pub struct RateLimits {
    pub access_by_ip: WindowLimiter<String>,
    pub access_by_email: WindowLimiter<String>,
    pub chat_by_user: WindowLimiter<Uuid>,
}

impl RateLimits {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            access_by_ip: WindowLimiter::new(config.access.ip_requests_per_hour, HOUR),
            access_by_email: WindowLimiter::new(config.access.email_requests_per_day, DAY),
            chat_by_user: WindowLimiter::new(config.api.chat_daily_limit, DAY),
        }
    }
}

/// Spend one call for `key`, or fail with 429 and `Retry-After` set to the
/// seconds left in the current window
pub fn check<K>(limiter: &WindowLimiter<K>, key: &K, message: &str) -> Result<(), ApiError>
where
    K: Hash + Eq + Clone,
{
    limiter
        .check_at(key, Utc::now())
        .map_err(|retry_after| ApiError::too_many_requests(message, Some(retry_after.max(1))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, minute, 0).unwrap()
    }

    #[test]
    fn limit_holds_for_the_whole_window() {
        let limiter: WindowLimiter<String> = WindowLimiter::new(3, DAY);
        let key = "student@durham.ac.uk".to_string();

        for _ in 0..3 {
            assert!(limiter.check_at(&key, at(0, 5)).is_ok());
        }
        // No refill later the same day
        assert_eq!(limiter.check_at(&key, at(16, 0)), Err(8 * 60 * 60));
        assert_eq!(limiter.check_at(&key, at(23, 59)), Err(60));

        // Other keys are unaffected
        assert!(limiter.check_at(&"other@durham.ac.uk".to_string(), at(23, 59)).is_ok());
    }

    #[test]
    fn next_window_starts_fresh() {
        let limiter: WindowLimiter<Uuid> = WindowLimiter::new(2, HOUR);
        let user = Uuid::new_v4();

        assert!(limiter.check_at(&user, at(9, 58)).is_ok());
        assert!(limiter.check_at(&user, at(9, 59)).is_ok());
        assert!(limiter.check_at(&user, at(9, 59)).is_err());
        assert!(limiter.check_at(&user, at(10, 0)).is_ok());
        assert!(limiter.check_at(&user, at(10, 1)).is_ok());
        assert!(limiter.check_at(&user, at(10, 2)).is_err());
    }

    #[test]
    fn rejection_maps_to_429_with_retry_after() {
        let limiter: WindowLimiter<String> = WindowLimiter::new(1, HOUR);
        let key = "198.51.100.7".to_string();
        assert!(check(&limiter, &key, "slow down").is_ok());

        let err = check(&limiter, &key, "slow down").unwrap_err();
        assert_eq!(err.status_code(), 429);
        assert!(matches!(err, ApiError::TooManyRequests { retry_after_secs: Some(s), .. } if (1..=3600).contains(&s)));
    }
}
