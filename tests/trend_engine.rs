use rand::{rngs::StdRng, SeedableRng};
use serde_json::json;
use std::collections::HashSet;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use creator_insights::llm::{extract_json, LlmClient};
use creator_insights::trends::{
    generate_content_ideas, generate_items, generate_recommendations, random_name,
    AnalyzerConfig, ContentFormat, RecommendationType, Source, TrendAnalyzer, TrendCategory,
};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn seeded_analyzer(llm: Option<LlmClient>) -> TrendAnalyzer {
    TrendAnalyzer::new(
        llm,
        AnalyzerConfig {
            seed: Some(21),
            cache_ttl: Some(Duration::from_secs(60)),
            items_per_category: 10,
        },
    )
}

fn mock_client(server: &MockServer) -> LlmClient {
    LlmClient::new(
        "test-key".to_string(),
        server.uri(),
        "test-model".to_string(),
        0.2,
        Duration::from_secs(5),
    )
    .unwrap()
}

fn chat_reply(content: &str) -> serde_json::Value {
    json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
}

#[test]
fn only_hashtags_carry_a_pound_sign() {
    let mut rng = StdRng::seed_from_u64(1);
    for category in TrendCategory::ALL {
        for item in generate_items(&mut rng, category, Some(50)) {
            assert_eq!(item.category, category);
            if category == TrendCategory::Hashtags {
                assert!(item.name.starts_with('#'), "{}", item.name);
            } else {
                assert!(!item.name.starts_with('#'), "{}", item.name);
            }
        }
        let name = random_name(&mut rng, category);
        assert_eq!(name.starts_with('#'), category == TrendCategory::Hashtags);
    }
}

#[test]
fn trending_items_stay_in_range() {
    let mut rng = StdRng::seed_from_u64(2);
    let items = generate_items(&mut rng, TrendCategory::Sounds, Some(500));
    assert_eq!(items.len(), 500);
    assert_eq!(generate_items(&mut rng, TrendCategory::Effects, None).len(), 10);

    for item in &items {
        assert!((100_000..10_100_000).contains(&item.view_count));
        assert!(item.growth >= -10.0 && item.growth < 20.0);
        assert!((1_000..101_000).contains(&item.count));
        assert!(item.creator_count >= item.count / 15);
        assert!(item.creator_count <= item.count / 5);
    }
    assert!(items.iter().any(|item| item.growth < 0.0));
    assert!(items.iter().filter(|item| item.growth >= 0.0).count() > items.len() / 2);

    let ids: HashSet<&str> = items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids.len(), items.len());
}

#[test]
fn recommendations_use_defaults_and_ranges() {
    let mut rng = StdRng::seed_from_u64(3);
    let recommendations = generate_recommendations(&mut rng, &[], &[], Some(200));
    assert_eq!(recommendations.len(), 200);

    for recommendation in &recommendations {
        assert!((7..=10).contains(&recommendation.relevance_score));
        assert!((6..=10).contains(&recommendation.popularity));
        assert!((20..=100).contains(&recommendation.growth));
        assert!(!recommendation.name.is_empty());
        assert!(!recommendation.description.is_empty());
        if recommendation.kind == RecommendationType::Hashtag {
            let tag = recommendation.name.trim_start_matches('#');
            assert!(recommendation.name.starts_with('#'));
            assert!(["dance", "comedy", "fashion", "food", "travel"]
                .iter()
                .any(|interest| tag.starts_with(interest)));
            let year: u32 = tag[tag.len() - 4..].parse().unwrap();
            assert!((2020..=2030).contains(&year));
        }
    }

    let kinds: HashSet<RecommendationType> =
        recommendations.iter().map(|item| item.kind).collect();
    assert_eq!(kinds.len(), RecommendationType::ALL.len());
    assert_eq!(generate_recommendations(&mut rng, &[], &[], None).len(), 5);
}

#[test]
fn hashtag_recommendations_follow_interests() {
    let mut rng = StdRng::seed_from_u64(4);
    let interests = strings(&["skateboarding"]);
    for recommendation in generate_recommendations(&mut rng, &interests, &[], Some(100)) {
        if recommendation.kind == RecommendationType::Hashtag {
            assert!(recommendation.name.starts_with("#skateboarding"));
        }
    }
}

#[test]
fn content_ideas_respect_format_rules() {
    let mut rng = StdRng::seed_from_u64(5);
    let ideas = generate_content_ideas(&mut rng, Some("brand"), Some("fitness"), Some(200));
    assert_eq!(ideas.len(), 200);

    for idea in &ideas {
        assert!(idea.suggested_hashtags.len() <= 5);
        assert!(!idea.suggested_hashtags.is_empty());
        let unique: HashSet<&String> = idea.suggested_hashtags.iter().collect();
        assert_eq!(unique.len(), idea.suggested_hashtags.len());
        assert_eq!(idea.suggested_sounds.is_some(), idea.format != ContentFormat::Photo);
        assert_eq!(idea.estimated_views, idea.format.estimated_views());
        assert!((8..=10).contains(&idea.relevance));
    }

    let formats: HashSet<ContentFormat> = ideas.iter().map(|idea| idea.format).collect();
    assert_eq!(formats.len(), 4);
}

#[test]
fn content_idea_titles_cycle_through_templates() {
    let mut rng = StdRng::seed_from_u64(6);
    let ideas = generate_content_ideas(&mut rng, None, Some("food"), Some(12));
    assert_eq!(ideas[0].title, ideas[5].title);
    assert_eq!(ideas[1].title, ideas[6].title);
    assert_eq!(ideas[2].title, ideas[7].title);
    assert_eq!(ideas[0].title, ideas[10].title);
    let distinct: HashSet<&str> = ideas.iter().map(|idea| idea.title.as_str()).collect();
    assert_eq!(distinct.len(), 5);
}

#[test]
fn unknown_niche_uses_general_templates() {
    let mut rng = StdRng::seed_from_u64(7);
    let unknown = generate_content_ideas(&mut rng, None, Some("underwater basket weaving"), Some(5));
    let general = generate_content_ideas(&mut rng, None, None, Some(5));
    let titles = |ideas: &[creator_insights::ContentIdea]| {
        ideas.iter().map(|idea| idea.title.clone()).collect::<Vec<_>>()
    };
    assert_eq!(titles(&unknown), titles(&general));
}

#[test]
fn extracts_json_from_chatty_reply() {
    let reply = "Sure! Here you go:\n```json\n{\"a\": {\"b\": 1}}\n```";
    assert_eq!(extract_json(reply).as_deref(), Some("{\"a\": {\"b\": 1}}"));
    assert!(extract_json("no json here").is_none());
    assert!(extract_json("{not: valid} and {}").is_none());
    assert_eq!(extract_json(" {\"ok\": true} ").as_deref(), Some("{\"ok\": true}"));
}

#[tokio::test]
async fn trending_lists_are_cached() {
    let analyzer = seeded_analyzer(None);
    let first = analyzer.trending(TrendCategory::Hashtags).await;
    let second = analyzer.trending(TrendCategory::Hashtags).await;
    assert_eq!(first.len(), 10);
    assert_eq!(first, second);

    analyzer.clear_cache().await;
    let regenerated = analyzer.trending(TrendCategory::Hashtags).await;
    assert_eq!(regenerated, first);

    let unseeded = TrendAnalyzer::new(None, AnalyzerConfig::default());
    let before = unseeded.trending(TrendCategory::Effects).await;
    unseeded.clear_cache().await;
    let after = unseeded.trending(TrendCategory::Effects).await;
    assert_ne!(before[0].id, after[0].id);

    let uncached = TrendAnalyzer::new(
        None,
        AnalyzerConfig {
            seed: None,
            cache_ttl: None,
            items_per_category: 3,
        },
    );
    assert_eq!(uncached.trending(TrendCategory::Sounds).await.len(), 3);
}

#[tokio::test]
async fn missing_provider_reports_heuristic_source() {
    let analyzer = seeded_analyzer(None);
    let recommendations = analyzer.recommendations(&[], &[], 4).await;
    assert_eq!(recommendations.source, Source::Heuristic);
    assert_eq!(recommendations.value.len(), 4);

    let ideas = analyzer.content_ideas(None, Some("food"), 3).await;
    assert_eq!(ideas.source, Source::Heuristic);
    assert_eq!(ideas.value.len(), 3);
}

#[tokio::test]
async fn provider_answer_is_normalized() {
    let server = MockServer::start().await;
    let content = json!({
        "recommendations": [
            { "type": "hashtag", "name": "#gymtok", "description": "Big in fitness",
              "relevanceScore": 12, "popularity": 3, "growth": 55.4 },
            { "type": "sound", "name": "Beat Drop", "relevanceScore": 8,
              "popularity": 9, "growth": 500 },
            { "type": "effect", "name": "   " }
        ]
    })
    .to_string();
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(&content)))
        .mount(&server)
        .await;

    let analyzer = seeded_analyzer(Some(mock_client(&server)));
    let result = analyzer
        .recommendations(&strings(&["fitness"]), &strings(&["leg day"]), 5)
        .await;

    assert_eq!(result.source, Source::Ai);
    assert_eq!(result.value.len(), 2);
    let first = &result.value[0];
    assert_eq!(first.kind, RecommendationType::Hashtag);
    assert_eq!(first.relevance_score, 10);
    assert_eq!(first.popularity, 6);
    assert_eq!(first.growth, 55);
    assert_eq!(result.value[1].growth, 100);
}

#[tokio::test]
async fn provider_ideas_are_cleaned_up() {
    let server = MockServer::start().await;
    let content = json!({
        "contentIdeas": [{
            "title": "Meal prep Sunday",
            "description": "Prep five lunches in an hour",
            "format": "photo",
            "suggestedHashtags": ["mealprep", "#mealprep", "#food", "#fyp", "#sunday", "#lunch", "#extra"],
            "suggestedSounds": ["Lo-fi"],
            "relevance": 9
        }]
    })
    .to_string();
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(&content)))
        .mount(&server)
        .await;

    let analyzer = seeded_analyzer(Some(mock_client(&server)));
    let result = analyzer.content_ideas(Some("creator"), Some("food"), 3).await;

    assert_eq!(result.source, Source::Ai);
    let idea = &result.value[0];
    assert_eq!(
        idea.suggested_hashtags,
        strings(&["#mealprep", "#food", "#fyp", "#sunday", "#lunch"])
    );
    assert!(idea.suggested_sounds.is_none());
    assert_eq!(idea.estimated_views, ContentFormat::Photo.estimated_views());
}

#[tokio::test]
async fn provider_errors_fall_back_to_heuristics() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let analyzer = seeded_analyzer(Some(mock_client(&server)));
    let result = analyzer.recommendations(&[], &[], 3).await;
    assert_eq!(result.source, Source::Heuristic);
    assert_eq!(result.value.len(), 3);
}

#[tokio::test]
async fn provider_errors_name_model_and_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let err = mock_client(&server)
        .complete_json("system", "user")
        .await
        .unwrap_err();
    assert!(err.contains("test-model"), "{err}");
    assert!(err.contains(&format!("{}/chat/completions", server.uri())), "{err}");
    assert!(err.contains("status 503"), "{err}");
    assert!(err.contains("overloaded"), "{err}");
}

#[tokio::test]
async fn unparsable_provider_reply_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(chat_reply("{\"contentIdeas\": \"soon\"}")),
        )
        .mount(&server)
        .await;

    let analyzer = seeded_analyzer(Some(mock_client(&server)));
    let result = analyzer.content_ideas(None, Some("tech"), 2).await;
    assert_eq!(result.source, Source::Heuristic);
    assert_eq!(result.value.len(), 2);
}
