use chrono::{Days, NaiveDate, Utc};
use rand::Rng;

use crate::analytics::{engagement_rate, AnalyticsMetrics, TimeInterval};

pub const DEFAULT_VARIANCE: f64 = 0.2;

const LIKES_SHARE: f64 = 0.4;
const COMMENTS_SHARE: f64 = 0.05;
const SHARES_SHARE: f64 = 0.02;
const FOLLOWERS_SHARE: f64 = 0.01;
const DIAMONDS_SHARE: f64 = 0.005;

const LOOKBACK_DAYS: u64 = 7;

// Absorbs float error in bounds such as `350.0 * 0.8`.
const BOUND_EPSILON: f64 = 1e-9;

/// Draws a snapshot whose counters sit within `variance` of `base` scaled by
/// each counter's usual share of views.
///
/// The attached window is always the trailing seven days, whatever range the
/// caller is filling.
pub fn generate_metrics<R: Rng + ?Sized>(rng: &mut R, base: f64, variance: f64) -> AnalyticsMetrics {
    generate_metrics_on(rng, base, variance, Utc::now().date_naive())
}

pub fn generate_metrics_on<R: Rng + ?Sized>(
    rng: &mut R,
    base: f64,
    variance: f64,
    today: NaiveDate,
) -> AnalyticsMetrics {
    let variance = clamp_variance(variance);
    let base = if base.is_finite() { base.max(0.0) } else { 0.0 };

    let views = random_around(rng, base, variance);
    let likes = random_around(rng, base * LIKES_SHARE, variance);
    let comments = random_around(rng, base * COMMENTS_SHARE, variance);
    let shares = random_around(rng, base * SHARES_SHARE, variance);
    let followers = random_around(rng, base * FOLLOWERS_SHARE, variance);
    let diamonds = random_around(rng, base * DIAMONDS_SHARE, variance);

    AnalyticsMetrics {
        views,
        likes,
        comments,
        shares,
        followers,
        diamonds: Some(diamonds),
        engagement: engagement_rate(likes, comments, shares, views),
        time_interval: lookback_interval(today),
    }
}

/// Uniform integer in `[base * (1 - variance), base * (1 + variance)]`.
fn random_around<R: Rng + ?Sized>(rng: &mut R, base: f64, variance: f64) -> u64 {
    let low = (base * (1.0 - variance) - BOUND_EPSILON).ceil().max(0.0) as u64;
    let high = (base * (1.0 + variance) + BOUND_EPSILON).floor().max(0.0) as u64;
    if high <= low {
        return low;
    }
    rng.gen_range(low..=high)
}

fn clamp_variance(value: f64) -> f64 {
    if value.is_nan() {
        return DEFAULT_VARIANCE;
    }
    value.max(0.0).min(1.0)
}

fn lookback_interval(today: NaiveDate) -> TimeInterval {
    let start = today
        .checked_sub_days(Days::new(LOOKBACK_DAYS))
        .unwrap_or(today);
    TimeInterval {
        start: start.format("%Y-%m-%d").to_string(),
        end: today.format("%Y-%m-%d").to_string(),
        duration: LOOKBACK_DAYS as u32,
        label: "Last 7 days".to_string(),
    }
}
