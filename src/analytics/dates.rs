use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::analytics::TimeInterval;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    /// Accepted by the API but resolved exactly like `30d`.
    #[serde(rename = "custom")]
    Custom,
}

impl TimeRange {
    pub const ALL: [TimeRange; 4] = [
        TimeRange::Day,
        TimeRange::Week,
        TimeRange::Month,
        TimeRange::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::Day => "24h",
            TimeRange::Week => "7d",
            TimeRange::Month => "30d",
            TimeRange::Custom => "custom",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::Day => "Last 24 hours",
            TimeRange::Week => "Last 7 days",
            TimeRange::Month => "Last 30 days",
            TimeRange::Custom => "Custom range",
        }
    }

    pub fn window(self) -> Duration {
        match self {
            TimeRange::Day => Duration::hours(24),
            TimeRange::Week => Duration::days(7),
            TimeRange::Month | TimeRange::Custom => Duration::days(30),
        }
    }

    /// Days spanned by the growth trend; always at least 1.
    pub fn trend_days(self) -> u32 {
        match self {
            TimeRange::Day => 1,
            TimeRange::Week => 7,
            TimeRange::Month | TimeRange::Custom => 30,
        }
    }

    /// Baseline magnitudes used when a snapshot has to be generated,
    /// as `(current, previous)`.
    pub fn baselines(self) -> (f64, f64) {
        match self {
            TimeRange::Day => (1_000.0, 900.0),
            TimeRange::Week => (7_000.0, 6_300.0),
            TimeRange::Month | TimeRange::Custom => (30_000.0, 27_000.0),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "24h" => Ok(TimeRange::Day),
            "7d" => Ok(TimeRange::Week),
            "30d" => Ok(TimeRange::Month),
            "custom" => Ok(TimeRange::Custom),
            other => Err(format!(
                "invalid time range: {} (expected 24h, 7d, 30d or custom)",
                other
            )),
        }
    }
}

/// Calendar bounds of a window, both formatted `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

impl DateRange {
    pub fn to_interval(&self, range: TimeRange) -> TimeInterval {
        TimeInterval {
            start: self.start_date.clone(),
            end: self.end_date.clone(),
            duration: range.trend_days(),
            label: range.label().to_string(),
        }
    }
}

pub fn resolve(range: TimeRange, is_previous: bool) -> Result<DateRange, String> {
    resolve_at(range, is_previous, Utc::now())
}

/// Resolves `range` relative to `now`. The previous window ends where the
/// current one starts.
pub fn resolve_at(
    range: TimeRange,
    is_previous: bool,
    now: DateTime<Utc>,
) -> Result<DateRange, String> {
    let window = range.window();
    let end = if is_previous {
        now.checked_sub_signed(window)
    } else {
        Some(now)
    };
    let end = end.ok_or_else(|| format!("date out of range resolving {}", range))?;
    let start = end
        .checked_sub_signed(window)
        .ok_or_else(|| format!("date out of range resolving {}", range))?;

    Ok(DateRange {
        start_date: format_date(start),
        end_date: format_date(end),
    })
}

fn format_date(value: DateTime<Utc>) -> String {
    value.date_naive().format("%Y-%m-%d").to_string()
}
