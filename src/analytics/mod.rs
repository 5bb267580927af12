pub mod change;
pub mod dates;
pub mod growth;
pub mod historical;
pub mod metrics;
pub mod store;

use serde::{Deserialize, Serialize};

pub use change::{percent_change, GrowthMetrics};
pub use dates::{DateRange, TimeRange};
pub use growth::{synthesize_growth_trend, GrowthPoint};
pub use historical::{ComparisonMetrics, HistoricalComparison, HistoricalComparisonService, TopPerforming};
pub use metrics::{generate_metrics, DEFAULT_VARIANCE};
pub use store::{AnalyticsStore, StoreConfig};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: String,
    pub end: String,
    /// Whole days covered by the window.
    pub duration: u32,
    pub label: String,
}

/// One snapshot of a creator's counters over a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsMetrics {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub followers: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diamonds: Option<u64>,
    /// Interactions per view, as a ratio.
    pub engagement: f64,
    pub time_interval: TimeInterval,
}

impl AnalyticsMetrics {
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            views: self.views,
            likes: self.likes,
            comments: self.comments,
            shares: self.shares,
            followers: self.followers,
            diamonds: self.diamonds,
            engagement: self.engagement,
        }
    }
}

/// The counters of a snapshot without its window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub followers: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diamonds: Option<u64>,
    pub engagement: f64,
}

/// `(likes + comments + shares) / max(views, 1)`
pub fn engagement_rate(likes: u64, comments: u64, shares: u64, views: u64) -> f64 {
    let interactions = likes as f64 + comments as f64 + shares as f64;
    interactions / views.max(1) as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Current,
    Previous,
}

impl Period {
    pub fn label(self) -> &'static str {
        match self {
            Period::Current => "current",
            Period::Previous => "previous",
        }
    }

    pub fn is_previous(self) -> bool {
        matches!(self, Period::Previous)
    }
}

/// Store key for one period of one range, e.g. `7d-current`.
pub fn cache_key(range: TimeRange, period: Period) -> String {
    format!("{}-{}", range.as_str(), period.label())
}
