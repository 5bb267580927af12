pub mod analyzer;
pub mod catalog;
pub mod ideas;
pub mod recommendations;

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use analyzer::{AnalyzerConfig, TrendAnalyzer};
pub use catalog::{generate_items, random_name};
pub use ideas::generate_content_ideas;
pub use recommendations::{generate_recommendations, DEFAULT_INTERESTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendCategory {
    Hashtags,
    Sounds,
    Effects,
    Challenges,
}

impl TrendCategory {
    pub const ALL: [TrendCategory; 4] = [
        TrendCategory::Hashtags,
        TrendCategory::Sounds,
        TrendCategory::Effects,
        TrendCategory::Challenges,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TrendCategory::Hashtags => "hashtags",
            TrendCategory::Sounds => "sounds",
            TrendCategory::Effects => "effects",
            TrendCategory::Challenges => "challenges",
        }
    }
}

impl fmt::Display for TrendCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "hashtags" => Ok(TrendCategory::Hashtags),
            "sounds" => Ok(TrendCategory::Sounds),
            "effects" => Ok(TrendCategory::Effects),
            "challenges" => Ok(TrendCategory::Challenges),
            other => Err(format!("invalid category: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingItem {
    pub id: String,
    pub name: String,
    pub view_count: u64,
    /// Percent change, negative when the trend is cooling.
    pub growth: f64,
    pub category: TrendCategory,
    /// Posts using the item.
    pub count: u64,
    pub creator_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationType {
    Hashtag,
    Sound,
    Effect,
    Challenge,
    Content,
}

impl RecommendationType {
    pub const ALL: [RecommendationType; 5] = [
        RecommendationType::Hashtag,
        RecommendationType::Sound,
        RecommendationType::Effect,
        RecommendationType::Challenge,
        RecommendationType::Content,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendRecommendation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub name: String,
    pub description: String,
    /// 7 to 10.
    pub relevance_score: u8,
    /// 6 to 10.
    pub popularity: u8,
    /// 20 to 100.
    pub growth: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    Short,
    Long,
    Live,
    Photo,
}

impl ContentFormat {
    pub const ALL: [ContentFormat; 4] = [
        ContentFormat::Short,
        ContentFormat::Long,
        ContentFormat::Live,
        ContentFormat::Photo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContentFormat::Short => "short",
            ContentFormat::Long => "long",
            ContentFormat::Live => "live",
            ContentFormat::Photo => "photo",
        }
    }

    pub fn estimated_views(self) -> EstimatedViews {
        let (min, max) = match self {
            ContentFormat::Short => (5_000, 50_000),
            ContentFormat::Long => (2_000, 20_000),
            ContentFormat::Live => (500, 5_000),
            ContentFormat::Photo => (1_000, 10_000),
        };
        EstimatedViews { min, max }
    }

    pub fn has_sound(self) -> bool {
        !matches!(self, ContentFormat::Photo)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatedViews {
    pub min: u64,
    pub max: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentIdea {
    pub id: String,
    pub title: String,
    pub description: String,
    pub format: ContentFormat,
    pub suggested_hashtags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_sounds: Option<Vec<String>>,
    pub estimated_views: EstimatedViews,
    /// 8 to 10.
    pub relevance: u8,
}

/// Where an analyzer result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Ai,
    Heuristic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    pub value: T,
    pub source: Source,
}

impl<T> Sourced<T> {
    pub fn ai(value: T) -> Self {
        Self {
            value,
            source: Source::Ai,
        }
    }

    pub fn heuristic(value: T) -> Self {
        Self {
            value,
            source: Source::Heuristic,
        }
    }
}

/// Random v4 id drawn from `rng`, so seeded runs repeat their ids too.
pub(crate) fn new_id<R: Rng + ?Sized>(rng: &mut R, prefix: &str) -> String {
    let id = uuid::Builder::from_random_bytes(rng.gen()).into_uuid();
    format!("{}-{}", prefix, id.simple())
}
