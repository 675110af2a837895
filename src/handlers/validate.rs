use serde::{Deserialize, Deserializer};
use std::ops::RangeInclusive;

use crate::error::ApiError;

pub const SCORE_RANGE: RangeInclusive<i16> = 1..=5;

/// Present and non-blank after trimming
pub fn required_text(field: &str, value: Option<String>) -> Result<String, ApiError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::missing_field(field)),
    }
}

/// Blank strings become `None`
pub fn optional_text(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn score(field: &str, value: Option<i16>) -> Result<Option<i16>, ApiError> {
    match value {
        Some(v) if !SCORE_RANGE.contains(&v) => Err(ApiError::invalid_field(field, "Must be between 1 and 5")),
        other => Ok(other),
    }
}

pub fn required_score(field: &str, value: Option<i16>) -> Result<i16, ApiError> {
    score(field, value)?.ok_or_else(|| ApiError::missing_field(field))
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`)
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Clamp a client-supplied count into `1..=max`, defaulting when absent
pub fn clamp_limit(value: Option<i64>, default: i64, max: i64) -> i64 {
    value.unwrap_or(default).clamp(1, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(required_text("title", Some("  Read  ".into())).unwrap(), "Read");
        assert!(required_text("title", Some("   ".into())).is_err());
        assert!(required_text("title", None).is_err());
    }

    #[test]
    fn scores_must_be_in_range() {
        assert_eq!(score("mood", Some(5)).unwrap(), Some(5));
        assert_eq!(score("mood", None).unwrap(), None);
        assert!(score("mood", Some(0)).is_err());
        assert!(required_score("score", None).is_err());
    }

    #[test]
    fn limits_are_clamped() {
        assert_eq!(clamp_limit(None, 50, 200), 50);
        assert_eq!(clamp_limit(Some(1000), 50, 200), 200);
        assert_eq!(clamp_limit(Some(-3), 50, 200), 1);
    }
}
