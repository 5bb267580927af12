use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::{MetricsSummary, TimeRange};
use crate::round_to;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthPoint {
    pub date: String,
    pub views: u64,
    pub followers: u64,
    pub engagement: f64,
}

pub fn synthesize_growth_trend(
    range: TimeRange,
    current: &MetricsSummary,
    previous: &MetricsSummary,
) -> Vec<GrowthPoint> {
    synthesize_growth_trend_on(range, current, previous, Utc::now().date_naive())
}

/// Linear series from `previous` (oldest point) to `current` (today), one
/// point per day, `trend_days + 1` points in total.
pub fn synthesize_growth_trend_on(
    range: TimeRange,
    current: &MetricsSummary,
    previous: &MetricsSummary,
    today: NaiveDate,
) -> Vec<GrowthPoint> {
    let days = range.trend_days().max(1);

    (0..=days)
        .rev()
        .map(|offset| {
            let progress = f64::from(days - offset) / f64::from(days);
            let date = today
                .checked_sub_days(Days::new(u64::from(offset)))
                .unwrap_or(today);

            GrowthPoint {
                date: date.format("%Y-%m-%d").to_string(),
                views: lerp(previous.views as f64, current.views as f64, progress)
                    .round()
                    .max(0.0) as u64,
                followers: lerp(previous.followers as f64, current.followers as f64, progress)
                    .round()
                    .max(0.0) as u64,
                engagement: round_to(lerp(previous.engagement, current.engagement, progress), 4),
            }
        })
        .collect()
}

fn lerp(from: f64, to: f64, progress: f64) -> f64 {
    from + (to - from) * progress
}
