use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::llm::LlmClient;
use crate::scoped_rng;
use crate::trends::{
    catalog, ideas, new_id, recommendations, ContentFormat, ContentIdea, EstimatedViews,
    RecommendationType, Sourced, TrendCategory, TrendRecommendation, TrendingItem,
};

const MAX_HASHTAGS: usize = 5;

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub seed: Option<u64>,
    /// How long a generated trending list is served again. `None` regenerates
    /// on every call.
    pub cache_ttl: Option<Duration>,
    pub items_per_category: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            seed: None,
            cache_ttl: Some(Duration::from_secs(900)),
            items_per_category: 10,
        }
    }
}

struct CachedItems {
    items: Vec<TrendingItem>,
    generated_at: Instant,
}

/// Trend data and personalised suggestions for creators.
///
/// Suggestions come from the AI provider when one is configured and fall back
/// to the local generators when it is missing or fails; the result says which.
pub struct TrendAnalyzer {
    llm: Option<LlmClient>,
    config: AnalyzerConfig,
    cache: Mutex<HashMap<TrendCategory, CachedItems>>,
}

impl TrendAnalyzer {
    pub fn new(llm: Option<LlmClient>, config: AnalyzerConfig) -> Self {
        Self {
            llm,
            config,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn has_ai(&self) -> bool {
        self.llm.is_some()
    }

    pub async fn trending(&self, category: TrendCategory) -> Vec<TrendingItem> {
        let now = Instant::now();
        let mut guard = self.cache.lock().await;
        if let (Some(ttl), Some(cached)) = (self.config.cache_ttl, guard.get(&category)) {
            if now.duration_since(cached.generated_at) < ttl {
                tracing::debug!(category = %category, "trend cache hit");
                return cached.items.clone();
            }
        }

        let mut rng = scoped_rng(self.config.seed, &format!("trends:{}", category));
        let items = catalog::generate_items(&mut rng, category, Some(self.config.items_per_category));
        if self.config.cache_ttl.is_some() {
            guard.insert(
                category,
                CachedItems {
                    items: items.clone(),
                    generated_at: now,
                },
            );
        }
        items
    }

    pub async fn clear_cache(&self) {
        let mut guard = self.cache.lock().await;
        guard.clear();
    }

    pub async fn recommendations(
        &self,
        interests: &[String],
        content_history: &[String],
        count: usize,
    ) -> Sourced<Vec<TrendRecommendation>> {
        let scope = format!("recommendations:{}:{}", interests.join(","), count);
        let mut rng = scoped_rng(self.config.seed, &scope);

        if let Some(client) = &self.llm {
            let prompt = recommendations_prompt(interests, content_history, count);
            match client.complete_json(RECOMMENDATIONS_SYSTEM_PROMPT, &prompt).await {
                Ok(json) => match parse_recommendations(&json, count, &mut rng) {
                    Ok(items) => return Sourced::ai(items),
                    Err(err) => warn_fallback("recommendations", &err),
                },
                Err(err) => warn_fallback("recommendations", &err),
            }
        }

        Sourced::heuristic(recommendations::generate_recommendations(
            &mut rng,
            interests,
            content_history,
            Some(count),
        ))
    }

    pub async fn content_ideas(
        &self,
        user_type: Option<&str>,
        niche: Option<&str>,
        count: usize,
    ) -> Sourced<Vec<ContentIdea>> {
        let scope = format!(
            "ideas:{}:{}:{}",
            user_type.unwrap_or_default(),
            niche.unwrap_or_default(),
            count
        );
        let mut rng = scoped_rng(self.config.seed, &scope);

        if let Some(client) = &self.llm {
            let prompt = ideas_prompt(user_type, niche, count);
            match client.complete_json(IDEAS_SYSTEM_PROMPT, &prompt).await {
                Ok(json) => match parse_content_ideas(&json, count, &mut rng) {
                    Ok(items) => return Sourced::ai(items),
                    Err(err) => warn_fallback("contentIdeas", &err),
                },
                Err(err) => warn_fallback("contentIdeas", &err),
            }
        }

        Sourced::heuristic(ideas::generate_content_ideas(
            &mut rng,
            user_type,
            niche,
            Some(count),
        ))
    }
}

fn warn_fallback(action: &str, err: &str) {
    tracing::warn!(action, error = %err, source = "heuristic", "AI provider failed, using heuristic result");
}

const RECOMMENDATIONS_SYSTEM_PROMPT: &str = r#"You are a TikTok trend strategist that answers with JSON only.
Return a single JSON object: {"recommendations": [...]}.
Each recommendation has:
- type: one of "hashtag", "sound", "effect", "challenge", "content"
- name (string; hashtags start with #)
- description (one sentence)
- relevanceScore (7..10)
- popularity (6..10)
- growth (20..100, percent)
Rules:
- Output JSON only, no markdown or commentary.
"#;

const IDEAS_SYSTEM_PROMPT: &str = r#"You are a TikTok content coach that answers with JSON only.
Return a single JSON object: {"contentIdeas": [...]}.
Each idea has:
- title (string)
- description (one or two sentences)
- format: one of "short", "long", "live", "photo"
- suggestedHashtags (up to 5 strings starting with #)
- suggestedSounds (array of strings; omit for photo posts)
- estimatedViews ({"min": integer, "max": integer})
- relevance (8..10)
Rules:
- Output JSON only, no markdown or commentary.
"#;

fn recommendations_prompt(interests: &[String], content_history: &[String], count: usize) -> String {
    let interests = if interests.is_empty() {
        recommendations::DEFAULT_INTERESTS.join(", ")
    } else {
        interests.join(", ")
    };
    let history = if content_history.is_empty() {
        "none provided".to_string()
    } else {
        content_history.join("; ")
    };
    format!(
        "Interests: {}\nRecent content: {}\nSuggest {} trends this creator should use next.",
        interests, history, count
    )
}

fn ideas_prompt(user_type: Option<&str>, niche: Option<&str>, count: usize) -> String {
    format!(
        "Creator type: {}\nNiche: {}\nSuggest {} content ideas.",
        user_type.unwrap_or("creator"),
        niche.unwrap_or("general"),
        count
    )
}

#[derive(Deserialize)]
struct AiRecommendations {
    recommendations: Vec<AiRecommendation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AiRecommendation {
    #[serde(rename = "type")]
    kind: RecommendationType,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    relevance_score: f64,
    #[serde(default)]
    popularity: f64,
    #[serde(default)]
    growth: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AiContentIdeas {
    content_ideas: Vec<AiContentIdea>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AiContentIdea {
    title: String,
    #[serde(default)]
    description: String,
    format: ContentFormat,
    #[serde(default)]
    suggested_hashtags: Vec<String>,
    #[serde(default)]
    suggested_sounds: Option<Vec<String>>,
    #[serde(default)]
    estimated_views: Option<EstimatedViews>,
    #[serde(default)]
    relevance: f64,
}

fn parse_recommendations<R: rand::Rng + ?Sized>(
    json: &str,
    count: usize,
    rng: &mut R,
) -> Result<Vec<TrendRecommendation>, String> {
    let parsed: AiRecommendations = serde_json::from_str(json)
        .map_err(|err| format!("AI recommendations JSON parse failed: {}", err))?;

    let items: Vec<TrendRecommendation> = parsed
        .recommendations
        .into_iter()
        .filter(|item| !item.name.trim().is_empty())
        .take(count)
        .map(|item| TrendRecommendation {
            id: new_id(rng, "rec"),
            kind: item.kind,
            name: item.name.trim().to_string(),
            description: item.description.trim().to_string(),
            relevance_score: clamp_round(item.relevance_score, 7.0, 10.0) as u8,
            popularity: clamp_round(item.popularity, 6.0, 10.0) as u8,
            growth: clamp_round(item.growth, 20.0, 100.0) as u32,
        })
        .collect();

    if items.is_empty() {
        return Err("AI returned no recommendations".to_string());
    }
    Ok(items)
}

fn parse_content_ideas<R: rand::Rng + ?Sized>(
    json: &str,
    count: usize,
    rng: &mut R,
) -> Result<Vec<ContentIdea>, String> {
    let parsed: AiContentIdeas = serde_json::from_str(json)
        .map_err(|err| format!("AI content ideas JSON parse failed: {}", err))?;

    let items: Vec<ContentIdea> = parsed
        .content_ideas
        .into_iter()
        .filter(|item| !item.title.trim().is_empty())
        .take(count)
        .map(|item| {
            let suggested_sounds = if item.format.has_sound() {
                item.suggested_sounds.map(|sounds| {
                    sounds
                        .into_iter()
                        .map(|sound| sound.trim().to_string())
                        .filter(|sound| !sound.is_empty())
                        .collect()
                })
            } else {
                None
            };
            let estimated_views = match item.estimated_views {
                Some(views) if views.min <= views.max => views,
                Some(views) => EstimatedViews {
                    min: views.max,
                    max: views.min,
                },
                None => item.format.estimated_views(),
            };

            ContentIdea {
                id: new_id(rng, "idea"),
                title: item.title.trim().to_string(),
                description: item.description.trim().to_string(),
                format: item.format,
                suggested_hashtags: normalize_hashtags(item.suggested_hashtags),
                suggested_sounds,
                estimated_views,
                relevance: clamp_round(item.relevance, 8.0, 10.0) as u8,
            }
        })
        .collect();

    if items.is_empty() {
        return Err("AI returned no content ideas".to_string());
    }
    Ok(items)
}

/// Prefixes `#`, drops blanks and repeats, keeps at most five.
fn normalize_hashtags(tags: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for tag in tags {
        let trimmed = tag.trim().trim_start_matches('#');
        if trimmed.is_empty() {
            continue;
        }
        let tag = format!("#{}", trimmed);
        if !seen.contains(&tag) {
            seen.push(tag);
        }
        if seen.len() == MAX_HASHTAGS {
            break;
        }
    }
    seen
}

fn clamp_round(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.round().max(min).min(max)
}
