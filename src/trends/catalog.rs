use rand::seq::SliceRandom;
use rand::Rng;

use crate::trends::{new_id, TrendCategory, TrendingItem};

pub const HASHTAGS: &[&str] = &[
    "fyp", "foryou", "viral", "trending", "duet", "pov", "lifehack", "storytime", "grwm",
    "booktok", "foodtok", "fittok", "dancechallenge", "comedy", "outfitinspo", "learnontiktok",
];

pub const SOUNDS: &[&str] = &[
    "Original Sound - Trending Beat",
    "Lo-fi Study Loop",
    "Upbeat Summer Remix",
    "Dramatic Reveal",
    "Slowed + Reverb Ballad",
    "Viral Dance Track",
    "Cinematic Build-Up",
    "Acoustic Morning",
    "Glitch Transition Hit",
    "Throwback Pop Chorus",
];

pub const EFFECTS: &[&str] = &[
    "Green Screen",
    "Time Warp Scan",
    "Slow Zoom",
    "Face Zoom",
    "Vintage Film",
    "Bling",
    "Split Screen",
    "AI Portrait",
    "Clone Trio",
    "Color Pop",
];

pub const CHALLENGES: &[&str] = &[
    "Silhouette Challenge",
    "Flip the Switch",
    "Outfit Swap",
    "Hand Jive Remix",
    "Pillow Fashion",
    "One Take Dance",
    "Recipe Speedrun",
    "Tell Me Without Telling Me",
    "Photo Dump Shuffle",
    "Voice Switch",
];

const DEFAULT_COUNT: usize = 10;

fn pool(category: TrendCategory) -> &'static [&'static str] {
    match category {
        TrendCategory::Hashtags => HASHTAGS,
        TrendCategory::Sounds => SOUNDS,
        TrendCategory::Effects => EFFECTS,
        TrendCategory::Challenges => CHALLENGES,
    }
}

/// Picks a display name from the category pool. Hashtags get their `#`.
pub fn random_name<R: Rng + ?Sized>(rng: &mut R, category: TrendCategory) -> String {
    let name = pool(category).choose(rng).copied().unwrap_or("trending");
    match category {
        TrendCategory::Hashtags => format!("#{}", name),
        _ => name.to_string(),
    }
}

pub fn generate_items<R: Rng + ?Sized>(
    rng: &mut R,
    category: TrendCategory,
    count: Option<usize>,
) -> Vec<TrendingItem> {
    let count = count.unwrap_or(DEFAULT_COUNT);
    (0..count).map(|_| generate_item(rng, category)).collect()
}

fn generate_item<R: Rng + ?Sized>(rng: &mut R, category: TrendCategory) -> TrendingItem {
    let view_count = rng.gen_range(100_000..10_100_000u64);
    let growth = if rng.gen_bool(0.8) {
        rng.gen_range(0.0..20.0)
    } else {
        rng.gen_range(-10.0..0.0)
    };
    let count = rng.gen_range(1_000..101_000u64);
    let divisor: f64 = rng.gen_range(5.0..15.0);
    let creator_count = (count as f64 / divisor).floor() as u64;

    TrendingItem {
        id: new_id(rng, category.as_str()),
        name: random_name(rng, category),
        view_count,
        growth,
        category,
        count,
        creator_count,
    }
}
