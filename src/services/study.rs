use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashSet;

use crate::database::models::StudySession;

/// Look-back window for the study-session listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
    Month,
}

impl Period {
    /// Unknown values fall back to a week
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("1d") => Period::Day,
            Some("30d") => Period::Month,
            _ => Period::Week,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::Day => "1d",
            Period::Week => "7d",
            Period::Month => "30d",
        }
    }

    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let days = match self {
            Period::Day => 1,
            Period::Week => 7,
            Period::Month => 30,
        };
        now - Duration::days(days)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StudyAggregates {
    pub total_minutes: i64,
    pub session_count: usize,
    pub avg_session_length: i64,
    pub current_streak: u32,
    pub period: &'static str,
}

pub fn aggregate(sessions: &[StudySession], period: Period, today: NaiveDate) -> StudyAggregates {
    let total_minutes: i64 = sessions.iter().map(|s| i64::from(s.duration_min)).sum();
    let session_count = sessions.len();
    let avg_session_length = if session_count > 0 {
        (total_minutes as f64 / session_count as f64).round() as i64
    } else {
        0
    };

    StudyAggregates {
        total_minutes,
        session_count,
        avg_session_length,
        current_streak: streak(sessions, today),
        period: period.label(),
    }
}

/// Consecutive days with at least one session, counting back from today
fn streak(sessions: &[StudySession], today: NaiveDate) -> u32 {
    let days: HashSet<NaiveDate> = sessions.iter().map(|s| s.started_at.date_naive()).collect();
    let mut count = 0;
    let mut day = today;
    while days.contains(&day) {
        count += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn session(minutes: i32, started_at: DateTime<Utc>) -> StudySession {
        StudySession {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            topic: None,
            duration_min: minutes,
            started_at,
            ended_at: started_at,
            difficulty: None,
            notes: None,
            tags: vec![],
            created_at: started_at,
        }
    }

    #[test]
    fn unknown_period_defaults_to_week() {
        assert_eq!(Period::parse(Some("90d")), Period::Week);
        assert_eq!(Period::parse(None), Period::Week);
        assert_eq!(Period::parse(Some("1d")).label(), "1d");
    }

    #[test]
    fn totals_average_and_streak() {
        let now = Utc::now();
        let sessions = vec![
            session(25, now),
            session(50, now - Duration::days(1)),
            session(30, now - Duration::days(3)),
        ];
        let agg = aggregate(&sessions, Period::Week, now.date_naive());
        assert_eq!(agg.total_minutes, 105);
        assert_eq!(agg.session_count, 3);
        assert_eq!(agg.avg_session_length, 35);
        assert_eq!(agg.current_streak, 2);
        assert_eq!(agg.period, "7d");
    }

    #[test]
    fn streak_is_zero_without_a_session_today() {
        let now = Utc::now();
        let sessions = vec![session(40, now - Duration::days(1))];
        assert_eq!(aggregate(&sessions, Period::Week, now.date_naive()).current_streak, 0);
    }
}
