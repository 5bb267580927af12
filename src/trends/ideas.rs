use rand::seq::SliceRandom;
use rand::Rng;

use crate::trends::catalog::SOUNDS;
use crate::trends::{new_id, ContentFormat, ContentIdea};

pub const HASHTAG_POOL: &[&str] = &[
    "#fyp",
    "#foryou",
    "#viral",
    "#trending",
    "#tiktok",
    "#explore",
    "#creator",
    "#contentcreator",
];

const MAX_HASHTAGS: usize = 5;
const SOUNDS_PER_IDEA: usize = 2;
const DEFAULT_COUNT: usize = 5;

fn templates(niche: &str) -> &'static [&'static str] {
    match niche.trim().to_lowercase().as_str() {
        "food" => &[
            "5-minute dinner anyone can make",
            "Rating viral food hacks",
            "What I eat in a day on a budget",
            "Street food you have to try",
            "One pan, three meals",
        ],
        "fitness" => &[
            "10-minute no-equipment workout",
            "Form mistakes everyone makes",
            "My morning mobility routine",
            "Trying a pro athlete's training day",
            "Gym myths debunked",
        ],
        "fashion" => &[
            "One piece styled five ways",
            "Thrift flip transformation",
            "Outfit formulas for every occasion",
            "Rating trending fits",
            "Capsule wardrobe essentials",
        ],
        "comedy" => &[
            "When your group chat goes silent",
            "Types of people at the grocery store",
            "POV: your first day at a new job",
            "Acting out my notifications",
            "Things nobody says out loud",
        ],
        "tech" => &[
            "Apps you didn't know you needed",
            "Desk setup tour",
            "Phone settings to change right now",
            "Testing viral gadgets",
            "Explaining tech news in 60 seconds",
        ],
        "travel" => &[
            "Hidden spots locals love",
            "Packing hacks for carry-on only",
            "How much this trip really cost",
            "24 hours in a new city",
            "Travel mistakes to avoid",
        ],
        _ => &[
            "Behind the scenes of my day",
            "Answering your most asked question",
            "Three things I wish I knew sooner",
            "Trying a trend for the first time",
            "Storytime: the day everything changed",
        ],
    }
}

/// Heuristic content ideas for a creator in `niche`.
///
/// Titles walk the niche's template list in order and wrap around once
/// `count` exceeds it.
pub fn generate_content_ideas<R: Rng + ?Sized>(
    rng: &mut R,
    user_type: Option<&str>,
    niche: Option<&str>,
    count: Option<usize>,
) -> Vec<ContentIdea> {
    let user_type = non_empty(user_type).unwrap_or("creator");
    let niche = non_empty(niche).unwrap_or("general");
    let count = count.unwrap_or(DEFAULT_COUNT);
    let titles = templates(niche);

    (0..count)
        .map(|index| {
            let format = *ContentFormat::ALL.choose(rng).unwrap_or(&ContentFormat::Short);
            let title = titles[index % titles.len()].to_string();
            let suggested_sounds = if format.has_sound() {
                Some(sample_unique(rng, SOUNDS, SOUNDS_PER_IDEA))
            } else {
                None
            };

            ContentIdea {
                id: new_id(rng, "idea"),
                description: format!(
                    "A {} post for {}s in the {} niche: {}",
                    format.as_str(),
                    user_type,
                    niche,
                    title.to_lowercase()
                ),
                title,
                format,
                suggested_hashtags: sample_unique(rng, HASHTAG_POOL, MAX_HASHTAGS),
                suggested_sounds,
                estimated_views: format.estimated_views(),
                relevance: rng.gen_range(8..=10),
            }
        })
        .collect()
}

/// Draws `draws` entries with replacement and keeps the first occurrence of
/// each, so the result can be shorter than `draws`.
fn sample_unique<R: Rng + ?Sized>(rng: &mut R, pool: &[&str], draws: usize) -> Vec<String> {
    let mut picked: Vec<String> = Vec::with_capacity(draws);
    for _ in 0..draws {
        if let Some(value) = pool.choose(rng) {
            if !picked.iter().any(|existing| existing == value) {
                picked.push(value.to_string());
            }
        }
    }
    picked
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
