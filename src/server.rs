use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::analytics::{AnalyticsStore, HistoricalComparison, HistoricalComparisonService};
use crate::api::{
    AllTrends, ApiResponse, ContentIdeasData, HistoricalQuery, RecommendationsData,
    RecordMetricsRequest, StoredMetrics, TrendAction, TrendActionRequest, TrendsQuery,
};
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::llm::LlmClient;
use crate::trends::{TrendAnalyzer, TrendCategory, TrendingItem};

const HISTORICAL_FAILURE: &str = "Failed to fetch historical analytics data";
const RECORD_FAILURE: &str = "Failed to store analytics data";
const PURGE_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Clone)]
pub struct AppState {
    pub historical: Arc<HistoricalComparisonService>,
    pub analyzer: Arc<TrendAnalyzer>,
}

impl AppState {
    pub fn new(historical: HistoricalComparisonService, analyzer: TrendAnalyzer) -> Self {
        Self {
            historical: Arc::new(historical),
            analyzer: Arc::new(analyzer),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, String> {
        let store = Arc::new(AnalyticsStore::new(config.store.to_store_config()));
        let historical = HistoricalComparisonService::new(
            store,
            config.analytics.variance,
            config.analytics.seed,
        );
        let llm_client = LlmClient::from_config(&config.ai)?;
        let analyzer = TrendAnalyzer::new(llm_client, config.analyzer_config());
        Ok(Self::new(historical, analyzer))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/analytics/historical",
            get(historical_handler).post(record_handler),
        )
        .route(
            "/api/analytics/trends",
            get(trends_handler).post(trend_action_handler),
        )
        .with_state(state)
}

pub async fn serve(config: AppConfig) -> Result<(), String> {
    let state = AppState::from_config(&config)?;
    if state.analyzer.has_ai() {
        tracing::info!(model = %config.ai.model, "AI suggestions enabled");
    } else {
        tracing::info!(
            key_env = %config.ai.api_key_env,
            "AI suggestions disabled, serving heuristic results"
        );
    }
    spawn_store_purge(state.historical.store().clone());

    let mut app = router(state);
    if let Some(web_root) = config.server.web_root.as_deref() {
        let index_path = format!("{}/index.html", web_root.trim_end_matches('/'));
        let static_service = ServeDir::new(web_root).not_found_service(ServeFile::new(index_path));
        app = app.fallback_service(static_service);
    }
    let app = app.layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| format!("failed to bind server: {}", err))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .await
        .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

fn spawn_store_purge(store: Arc<AnalyticsStore>) {
    if store.config().ttl.is_none() {
        return;
    }
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(PURGE_INTERVAL).await;
            let removed = store.purge_expired().await;
            if removed > 0 {
                tracing::info!(removed, "purged expired analytics snapshots");
            }
        }
    });
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn historical_handler(
    State(state): State<AppState>,
    query: Result<Query<HistoricalQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<HistoricalComparison>>> {
    let Query(query) = query.map_err(|err| AppError::validation(err.body_text()))?;
    let range = query.time_range().map_err(AppError::Validation)?;
    let user_id = query.user_id();

    let comparison = state
        .historical
        .comparison(&user_id, range)
        .await
        .map_err(|err| AppError::internal(HISTORICAL_FAILURE, err))?;

    Ok(Json(ApiResponse::success(comparison)))
}

async fn record_handler(
    State(state): State<AppState>,
    payload: Result<Json<RecordMetricsRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<StoredMetrics>>> {
    let Json(request) = payload?;
    let (user_id, range, payload) = request.into_parts().map_err(AppError::Validation)?;

    let window = state
        .historical
        .current_window(range)
        .map_err(|err| AppError::internal(RECORD_FAILURE, err))?;
    let metrics = payload.into_metrics(window.to_interval(range));
    state
        .historical
        .record(&user_id, range, metrics.clone())
        .await;

    Ok(Json(ApiResponse::success(StoredMetrics {
        user_id,
        time_range: range,
        metrics,
    })))
}

async fn trends_handler(
    State(state): State<AppState>,
    query: Result<Query<TrendsQuery>, QueryRejection>,
) -> AppResult<axum::response::Response> {
    let Query(query) = query.map_err(|err| AppError::validation(err.body_text()))?;

    match query.category.as_deref().map(str::trim) {
        None | Some("") => {
            let trends = AllTrends {
                hashtags: state.analyzer.trending(TrendCategory::Hashtags).await,
                sounds: state.analyzer.trending(TrendCategory::Sounds).await,
                effects: state.analyzer.trending(TrendCategory::Effects).await,
                challenges: state.analyzer.trending(TrendCategory::Challenges).await,
            };
            Ok(Json(ApiResponse::success(trends)).into_response())
        }
        Some(value) => {
            let category: TrendCategory = value
                .parse()
                .map_err(|_| AppError::validation("Invalid category"))?;
            let items: Vec<TrendingItem> = state.analyzer.trending(category).await;
            Ok(Json(ApiResponse::success(items)).into_response())
        }
    }
}

async fn trend_action_handler(
    State(state): State<AppState>,
    payload: Result<Json<TrendActionRequest>, JsonRejection>,
) -> AppResult<axum::response::Response> {
    let Json(request) = payload?;
    let action = request.action().map_err(AppError::Validation)?;
    let count = request.count();

    match action {
        TrendAction::Recommendations => {
            let result = state
                .analyzer
                .recommendations(&request.user_interests, &request.content_history, count)
                .await;
            tracing::info!(action = "recommendations", count, source = ?result.source, "served trend suggestions");
            Ok(Json(ApiResponse::success(RecommendationsData {
                recommendations: result.value,
                source: result.source,
            }))
            .into_response())
        }
        TrendAction::ContentIdeas => {
            let result = state
                .analyzer
                .content_ideas(request.user_type.as_deref(), request.niche.as_deref(), count)
                .await;
            tracing::info!(action = "contentIdeas", count, source = ?result.source, "served trend suggestions");
            Ok(Json(ApiResponse::success(ContentIdeasData {
                content_ideas: result.value,
                source: result.source,
            }))
            .into_response())
        }
    }
}
