use serde::{Deserialize, Serialize};

use crate::analytics::MetricsSummary;

/// Percentage delta from `previous` to `current`.
///
/// A zero baseline reports 100 when anything appeared and 0 otherwise.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    (current - previous) / previous * 100.0
}

/// Field-wise percentage deltas between two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthMetrics {
    pub views: f64,
    pub likes: f64,
    pub comments: f64,
    pub shares: f64,
    pub followers: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diamonds: Option<f64>,
    pub engagement: f64,
}

impl GrowthMetrics {
    pub fn between(current: &MetricsSummary, previous: &MetricsSummary) -> Self {
        let diamonds = match (current.diamonds, previous.diamonds) {
            (Some(now), Some(before)) => Some(percent_change(now as f64, before as f64)),
            _ => None,
        };

        Self {
            views: percent_change(current.views as f64, previous.views as f64),
            likes: percent_change(current.likes as f64, previous.likes as f64),
            comments: percent_change(current.comments as f64, previous.comments as f64),
            shares: percent_change(current.shares as f64, previous.shares as f64),
            followers: percent_change(current.followers as f64, previous.followers as f64),
            diamonds,
            engagement: percent_change(current.engagement, previous.engagement),
        }
    }
}
