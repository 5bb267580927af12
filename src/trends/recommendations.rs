use rand::seq::SliceRandom;
use rand::Rng;

use crate::trends::catalog::{random_name, CHALLENGES};
use crate::trends::{new_id, RecommendationType, TrendCategory, TrendRecommendation};

pub const DEFAULT_INTERESTS: [&str; 5] = ["dance", "comedy", "fashion", "food", "travel"];

const CONTENT_ANGLES: &[&str] = &[
    "Behind the scenes",
    "Day in the life",
    "Before and after",
    "Quick tutorial",
    "Myth vs fact",
    "Reacting to comments",
    "Three tips in thirty seconds",
    "Unpopular opinion",
];

const DEFAULT_COUNT: usize = 5;

/// Heuristic recommendations sampled from the trend pools.
///
/// `_content_history` is accepted for parity with the AI path, which uses it
/// in its prompt.
pub fn generate_recommendations<R: Rng + ?Sized>(
    rng: &mut R,
    interests: &[String],
    _content_history: &[String],
    count: Option<usize>,
) -> Vec<TrendRecommendation> {
    let interests: Vec<String> = if interests.iter().all(|value| value.trim().is_empty()) {
        DEFAULT_INTERESTS.iter().map(|value| value.to_string()).collect()
    } else {
        interests
            .iter()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .collect()
    };
    let count = count.unwrap_or(DEFAULT_COUNT);

    (0..count)
        .map(|_| {
            let kind = *RecommendationType::ALL
                .choose(rng)
                .unwrap_or(&RecommendationType::Hashtag);
            let interest = interests
                .choose(rng)
                .map(String::as_str)
                .unwrap_or(DEFAULT_INTERESTS[0]);
            let (name, description) = describe(rng, kind, interest);

            TrendRecommendation {
                id: new_id(rng, "rec"),
                kind,
                name,
                description,
                relevance_score: rng.gen_range(7..=10),
                popularity: rng.gen_range(6..=10),
                growth: rng.gen_range(20..=100),
            }
        })
        .collect()
}

fn describe<R: Rng + ?Sized>(
    rng: &mut R,
    kind: RecommendationType,
    interest: &str,
) -> (String, String) {
    match kind {
        RecommendationType::Hashtag => {
            let tag = interest.to_lowercase().replace(char::is_whitespace, "");
            let year = rng.gen_range(2020..=2030);
            (
                format!("#{}{}", tag, year),
                format!("Rising hashtag in the {} community", interest),
            )
        }
        RecommendationType::Sound => (
            random_name(rng, TrendCategory::Sounds),
            format!("Sound picking up momentum in {} videos", interest),
        ),
        RecommendationType::Effect => (
            random_name(rng, TrendCategory::Effects),
            format!("Effect {} creators are using to boost watch time", interest),
        ),
        RecommendationType::Challenge => {
            let name = CHALLENGES
                .choose(rng)
                .copied()
                .unwrap_or("Trending Challenge");
            (
                format!("{} ({} edition)", name, interest),
                format!("Challenge with room for a {} twist", interest),
            )
        }
        RecommendationType::Content => {
            let angle = CONTENT_ANGLES.choose(rng).copied().unwrap_or("Quick tutorial");
            (
                format!("{}: {}", angle, interest),
                format!("{} posts resonate with {} audiences right now", angle, interest),
            )
        }
    }
}
