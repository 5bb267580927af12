use serde::{Deserialize, Serialize};

use crate::analytics::{engagement_rate, AnalyticsMetrics, TimeInterval, TimeRange};
use crate::trends::{ContentIdea, Source, TrendRecommendation, TrendingItem};

pub const DEFAULT_USER_ID: &str = "default";
pub const DEFAULT_IDEA_COUNT: usize = 5;
pub const MAX_IDEA_COUNT: usize = 20;

/// Envelope shared by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalQuery {
    pub user_id: Option<String>,
    pub time_range: Option<String>,
}

impl HistoricalQuery {
    pub fn user_id(&self) -> String {
        self.user_id
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_USER_ID)
            .to_string()
    }

    pub fn time_range(&self) -> Result<TimeRange, String> {
        match self.time_range.as_deref().map(str::trim) {
            None | Some("") => Ok(TimeRange::Week),
            Some(value) => value.parse().map_err(|_| "Invalid time range".to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetricsRequest {
    pub user_id: Option<String>,
    pub time_range: Option<String>,
    pub metrics: Option<MetricsPayload>,
}

impl RecordMetricsRequest {
    pub fn into_parts(self) -> Result<(String, TimeRange, MetricsPayload), String> {
        let user_id = self
            .user_id
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        let time_range = self
            .time_range
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let mut missing = Vec::new();
        if user_id.is_none() {
            missing.push("userId");
        }
        if time_range.is_none() {
            missing.push("timeRange");
        }
        if self.metrics.is_none() {
            missing.push("metrics");
        }

        match (user_id, time_range, self.metrics) {
            (Some(user_id), Some(time_range), Some(metrics)) => {
                let range = time_range
                    .parse::<TimeRange>()
                    .map_err(|_| "Invalid time range".to_string())?;
                Ok((user_id, range, metrics))
            }
            _ => Err(format!("Missing required fields: {}", missing.join(", "))),
        }
    }
}

/// Metrics supplied by a client. Engagement is always derived from the
/// counters, so any `engagement` field in the body is ignored. The window is
/// filled in when absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsPayload {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub followers: u64,
    #[serde(default)]
    pub diamonds: Option<u64>,
    #[serde(default)]
    pub time_interval: Option<TimeInterval>,
}

impl MetricsPayload {
    pub fn into_metrics(self, fallback_interval: TimeInterval) -> AnalyticsMetrics {
        let engagement = engagement_rate(self.likes, self.comments, self.shares, self.views);

        AnalyticsMetrics {
            views: self.views,
            likes: self.likes,
            comments: self.comments,
            shares: self.shares,
            followers: self.followers,
            diamonds: self.diamonds,
            engagement,
            time_interval: self.time_interval.unwrap_or(fallback_interval),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMetrics {
    pub user_id: String,
    pub time_range: TimeRange,
    pub metrics: AnalyticsMetrics,
}

#[derive(Debug, Default, Deserialize)]
pub struct TrendsQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AllTrends {
    pub hashtags: Vec<TrendingItem>,
    pub sounds: Vec<TrendingItem>,
    pub effects: Vec<TrendingItem>,
    pub challenges: Vec<TrendingItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendAction {
    Recommendations,
    ContentIdeas,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendActionRequest {
    pub action: Option<String>,
    #[serde(default)]
    pub user_interests: Vec<String>,
    #[serde(default)]
    pub content_history: Vec<String>,
    pub user_type: Option<String>,
    pub niche: Option<String>,
    pub count: Option<usize>,
}

impl TrendActionRequest {
    pub fn action(&self) -> Result<TrendAction, String> {
        match self.action.as_deref().map(str::trim) {
            Some("recommendations") => Ok(TrendAction::Recommendations),
            Some("contentIdeas") => Ok(TrendAction::ContentIdeas),
            _ => Err("Invalid action".to_string()),
        }
    }

    pub fn count(&self) -> usize {
        self.count
            .unwrap_or(DEFAULT_IDEA_COUNT)
            .clamp(1, MAX_IDEA_COUNT)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationsData {
    pub recommendations: Vec<TrendRecommendation>,
    pub source: Source,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentIdeasData {
    pub content_ideas: Vec<ContentIdea>,
    pub source: Source,
}
