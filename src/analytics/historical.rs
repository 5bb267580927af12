use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::analytics::dates::{self, DateRange};
use crate::analytics::{
    cache_key, metrics, synthesize_growth_trend, AnalyticsMetrics, AnalyticsStore, GrowthMetrics,
    GrowthPoint, MetricsSummary, Period, TimeInterval, TimeRange,
};
use crate::scoped_rng;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalComparison {
    pub metrics: ComparisonMetrics,
    pub top_performing: TopPerforming,
    pub growth_trend: Vec<GrowthPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonMetrics {
    pub current: MetricsSummary,
    pub previous: MetricsSummary,
    pub growth: GrowthMetrics,
    pub time_interval: TimeInterval,
}

/// Best performers of the window. Nothing fills these yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopPerforming {
    pub videos: Vec<String>,
    pub hashtags: Vec<String>,
    pub sounds: Vec<String>,
}

pub struct HistoricalComparisonService {
    store: Arc<AnalyticsStore>,
    variance: f64,
    seed: Option<u64>,
}

impl HistoricalComparisonService {
    pub fn new(store: Arc<AnalyticsStore>, variance: f64, seed: Option<u64>) -> Self {
        Self {
            store,
            variance,
            seed,
        }
    }

    pub fn store(&self) -> &Arc<AnalyticsStore> {
        &self.store
    }

    pub async fn comparison(
        &self,
        user_id: &str,
        range: TimeRange,
    ) -> Result<HistoricalComparison, String> {
        let current_range = dates::resolve(range, false)?;
        let previous_range = dates::resolve(range, true)?;
        tracing::debug!(
            user_id,
            time_range = %range,
            current_start = %current_range.start_date,
            previous_start = %previous_range.start_date,
            "resolved comparison windows"
        );

        let current = self.snapshot(user_id, range, Period::Current).await.summary();
        let previous = self.snapshot(user_id, range, Period::Previous).await.summary();

        let growth = GrowthMetrics::between(&current, &previous);
        let growth_trend = synthesize_growth_trend(range, &current, &previous);

        Ok(HistoricalComparison {
            metrics: ComparisonMetrics {
                current,
                previous,
                growth,
                time_interval: current_range.to_interval(range),
            },
            top_performing: TopPerforming::default(),
            growth_trend,
        })
    }

    /// Stores externally supplied metrics as the current snapshot of `range`.
    pub async fn record(&self, user_id: &str, range: TimeRange, metrics: AnalyticsMetrics) {
        let key = cache_key(range, Period::Current);
        self.store.put(user_id, &key, metrics).await;
        tracing::info!(user_id, time_range = %range, "recorded analytics snapshot");
    }

    pub fn current_window(&self, range: TimeRange) -> Result<DateRange, String> {
        dates::resolve(range, false)
    }

    async fn snapshot(&self, user_id: &str, range: TimeRange, period: Period) -> AnalyticsMetrics {
        let key = cache_key(range, period);
        let (current_base, previous_base) = range.baselines();
        let base = if period.is_previous() {
            previous_base
        } else {
            current_base
        };
        let scope = format!("user:{}:{}", user_id, key);

        self.store
            .get_or_insert_with(user_id, &key, || {
                let mut rng = scoped_rng(self.seed, &scope);
                metrics::generate_metrics(&mut rng, base, self.variance)
            })
            .await
    }
}
