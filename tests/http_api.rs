use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use creator_insights::analytics::{AnalyticsStore, HistoricalComparisonService, StoreConfig};
use creator_insights::server::{router, AppState};
use creator_insights::trends::{AnalyzerConfig, TrendAnalyzer};

fn app() -> Router {
    let store = Arc::new(AnalyticsStore::new(StoreConfig::unbounded()));
    let historical = HistoricalComparisonService::new(store, 0.2, None);
    let analyzer = TrendAnalyzer::new(
        None,
        AnalyzerConfig {
            seed: None,
            cache_ttl: Some(Duration::from_secs(60)),
            items_per_category: 10,
        },
    );
    router(AppState::new(historical, analyzer))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

#[tokio::test]
async fn health_is_ok() {
    let response = app()
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn historical_comparison_is_cached_per_user() {
    let app = app();
    let uri = "/api/analytics/historical?userId=U&timeRange=24h";
    let (status, first) = get(&app, uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["success"], json!(true));

    let (_, second) = get(&app, uri).await;
    assert_eq!(first["data"]["metrics"]["current"], second["data"]["metrics"]["current"]);
    assert_eq!(first["data"]["metrics"]["previous"], second["data"]["metrics"]["previous"]);

    let data = &first["data"];
    assert_eq!(data["growthTrend"].as_array().unwrap().len(), 2);
    assert_eq!(data["topPerforming"], json!({ "videos": [], "hashtags": [], "sounds": [] }));
    assert_eq!(data["metrics"]["timeInterval"]["label"], json!("Last 24 hours"));
    assert_eq!(data["metrics"]["timeInterval"]["duration"], json!(1));
    assert!(data["metrics"]["growth"]["views"].is_number());
}

#[tokio::test]
async fn historical_defaults_to_weekly_range() {
    let (status, body) = get(&app(), "/api/analytics/historical").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["growthTrend"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn historical_rejects_unknown_range() {
    let (status, body) = get(&app(), "/api/analytics/historical?userId=U&timeRange=1y").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "error": "Invalid time range" }));
}

#[tokio::test]
async fn posted_metrics_become_current_snapshot() {
    let app = app();
    let (status, body) = post(
        &app,
        "/api/analytics/historical",
        json!({
            "userId": "U",
            "timeRange": "7d",
            "metrics": { "views": 1000, "likes": 100, "comments": 50, "shares": 50, "followers": 20 }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["metrics"]["engagement"], json!(0.2));
    assert_eq!(body["data"]["timeRange"], json!("7d"));

    let (_, comparison) = get(&app, "/api/analytics/historical?userId=U&timeRange=7d").await;
    let current = &comparison["data"]["metrics"]["current"];
    assert_eq!(current["views"], json!(1000));
    assert_eq!(current["followers"], json!(20));
    assert!(current.get("diamonds").is_none());
    assert_eq!(comparison["data"]["growthTrend"][7]["views"], json!(1000));
}

#[tokio::test]
async fn huge_posted_counters_keep_a_finite_engagement() {
    let app = app();
    let (status, body) = post(
        &app,
        "/api/analytics/historical",
        json!({
            "userId": "U",
            "timeRange": "7d",
            "metrics": {
                "views": 10,
                "likes": u64::MAX,
                "comments": 1,
                "shares": u64::MAX,
                "followers": 1
            }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let engagement = body["data"]["metrics"]["engagement"].as_f64().unwrap();
    assert!(engagement.is_finite());
    assert!(engagement > 1e18);

    let (status, comparison) = get(&app, "/api/analytics/historical?userId=U&timeRange=7d").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(comparison["data"]["metrics"]["current"]["likes"], json!(u64::MAX));
}

#[tokio::test]
async fn posted_engagement_is_derived_from_counters() {
    let (status, body) = post(
        &app(),
        "/api/analytics/historical",
        json!({
            "userId": "U",
            "timeRange": "24h",
            "metrics": {
                "views": 200, "likes": 30, "comments": 8, "shares": 2, "followers": 5,
                "engagement": 0.9
            }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["metrics"]["engagement"], json!(0.2));
}

#[tokio::test]
async fn posting_without_required_fields_is_rejected() {
    let (status, body) = post(
        &app(),
        "/api/analytics/historical",
        json!({ "userId": "U", "timeRange": "7d" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Missing required fields: metrics"));
}

#[tokio::test]
async fn malformed_body_keeps_the_envelope() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/analytics/trends")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[tokio::test]
async fn trends_by_category() {
    let (status, body) = get(&app(), "/api/analytics/trends?category=hashtags").await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 10);
    for item in items {
        assert!(item["name"].as_str().unwrap().starts_with('#'));
        assert_eq!(item["category"], json!("hashtags"));
        assert!(item["viewCount"].is_u64());
        assert!(item["creatorCount"].is_u64());
    }
}

#[tokio::test]
async fn trends_without_category_cover_every_pool() {
    let (status, body) = get(&app(), "/api/analytics/trends").await;
    assert_eq!(status, StatusCode::OK);
    for key in ["hashtags", "sounds", "effects", "challenges"] {
        assert_eq!(body["data"][key].as_array().unwrap().len(), 10, "{}", key);
    }
}

#[tokio::test]
async fn invalid_category_is_rejected() {
    let (status, body) = get(&app(), "/api/analytics/trends?category=invalid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "error": "Invalid category" }));
}

#[tokio::test]
async fn content_ideas_for_food_niche() {
    let (status, body) = post(
        &app(),
        "/api/analytics/trends",
        json!({ "action": "contentIdeas", "niche": "food", "count": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["source"], json!("heuristic"));

    let ideas = body["data"]["contentIdeas"].as_array().unwrap();
    assert_eq!(ideas.len(), 3);
    for idea in ideas {
        let format = idea["format"].as_str().unwrap();
        assert!(["short", "long", "live", "photo"].contains(&format));
        if format == "photo" {
            assert!(idea.get("suggestedSounds").is_none());
        } else {
            assert!(idea["suggestedSounds"].is_array());
        }
        assert!(idea["suggestedHashtags"].as_array().unwrap().len() <= 5);
    }
}

#[tokio::test]
async fn recommendations_action() {
    let (status, body) = post(
        &app(),
        "/api/analytics/trends",
        json!({ "action": "recommendations", "userInterests": ["gaming"], "count": 4 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["source"], json!("heuristic"));
    let recommendations = body["data"]["recommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), 4);
    for recommendation in recommendations {
        let kind = recommendation["type"].as_str().unwrap();
        assert!(["hashtag", "sound", "effect", "challenge", "content"].contains(&kind));
        assert!(recommendation["relevanceScore"].as_u64().unwrap() >= 7);
    }
}

#[tokio::test]
async fn unknown_action_is_rejected() {
    let (status, body) = post(&app(), "/api/analytics/trends", json!({ "action": "dance" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "error": "Invalid action" }));
}

#[tokio::test]
async fn suggestion_count_is_clamped() {
    let app = app();
    for (count, expected) in [(json!(0), 1), (json!(500), 20), (Value::Null, 5)] {
        let mut request = json!({ "action": "contentIdeas", "niche": "tech" });
        if !count.is_null() {
            request["count"] = count;
        }
        let (status, body) = post(&app, "/api/analytics/trends", request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["contentIdeas"].as_array().unwrap().len(), expected);
    }

    let (_, body) = post(
        &app,
        "/api/analytics/trends",
        json!({ "action": "recommendations", "userInterests": ["gaming"], "count": 500 }),
    )
    .await;
    assert_eq!(body["data"]["recommendations"].as_array().unwrap().len(), 20);
}
