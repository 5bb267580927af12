pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod server;
pub mod trends;

use rand::{rngs::StdRng, SeedableRng};

pub use analytics::{
    AnalyticsMetrics, AnalyticsStore, GrowthMetrics, GrowthPoint, HistoricalComparison,
    HistoricalComparisonService, MetricsSummary, Period, TimeInterval, TimeRange,
};
pub use trends::{
    ContentFormat, ContentIdea, EstimatedViews, RecommendationType, Source, Sourced,
    TrendAnalyzer, TrendCategory, TrendRecommendation, TrendingItem,
};

/// Builds the random source for one named draw.
///
/// With a seed the stream depends only on `seed` and `scope`, so two draws for
/// the same scope produce the same values. Without one it is seeded from the OS.
pub fn scoped_rng(seed: Option<u64>, scope: &str) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed ^ stable_hash64(scope)),
        None => StdRng::from_entropy(),
    }
}

pub fn stable_hash64(value: &str) -> u64 {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

pub fn format_number(value: f64) -> String {
    let rounded = value.round().max(0.0) as i64;
    let mut chars: Vec<char> = rounded.to_string().chars().collect();
    let mut result = String::new();
    let mut count = 0usize;

    while let Some(ch) = chars.pop() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(ch);
        count += 1;
    }

    result.chars().rev().collect()
}

/// Formats an already-scaled percentage with an explicit sign.
pub fn format_change(value: f64) -> String {
    format!("{:+.1}%", value)
}

pub fn format_ratio(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}
