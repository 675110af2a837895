use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::database::models::WellbeingCheckin;

#[derive(Debug, Clone, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub avg_score: Option<f64>,
    pub entry_count: usize,
    pub stressors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StressorCount {
    pub stressor: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct WellbeingStats {
    pub total_entries: usize,
    pub avg_mood: Option<f64>,
    pub period_days: i64,
    pub common_stressors: Vec<StressorCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WellbeingSummary {
    pub trend: Vec<DayBucket>,
    pub stats: WellbeingStats,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn average(scores: &[i16]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let sum: f64 = scores.iter().map(|s| f64::from(*s)).sum();
    Some(round2(sum / scores.len() as f64))
}

/// One bucket per UTC calendar day from `now - days` through today, plus totals
pub fn summarize(checkins: &[WellbeingCheckin], days: i64, now: DateTime<Utc>) -> WellbeingSummary {
    let mut by_day: BTreeMap<NaiveDate, (Vec<i16>, BTreeSet<String>)> = BTreeMap::new();
    for checkin in checkins {
        let day = by_day.entry(checkin.created_at.date_naive()).or_default();
        day.0.push(checkin.score);
        day.1.extend(checkin.stressors.iter().cloned());
    }

    let today = now.date_naive();
    let mut trend = Vec::new();
    let mut date = (now - Duration::days(days)).date_naive();
    while date <= today {
        let bucket = match by_day.get(&date) {
            Some((scores, stressors)) => DayBucket {
                date,
                avg_score: average(scores),
                entry_count: scores.len(),
                stressors: stressors.iter().cloned().collect(),
            },
            None => DayBucket {
                date,
                avg_score: None,
                entry_count: 0,
                stressors: Vec::new(),
            },
        };
        trend.push(bucket);
        date += Duration::days(1);
    }

    // A stressor counts once per check-in that mentions it
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for checkin in checkins {
        let distinct: BTreeSet<&str> = checkin.stressors.iter().map(String::as_str).collect();
        for stressor in distinct {
            *counts.entry(stressor).or_default() += 1;
        }
    }
    let mut common: Vec<StressorCount> = counts
        .into_iter()
        .map(|(stressor, count)| StressorCount { stressor: stressor.to_string(), count })
        .collect();
    common.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.stressor.cmp(&b.stressor)));
    common.truncate(5);

    let scores: Vec<i16> = checkins.iter().map(|c| c.score).collect();

    WellbeingSummary {
        trend,
        stats: WellbeingStats {
            total_entries: checkins.len(),
            avg_mood: average(&scores),
            period_days: days,
            common_stressors: common,
        },
    }
}
