// =================================================================
// api/mod.rs - Dashboard HTTP API
// =================================================================

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::analysis::{
    list_strategies, AnalysisError, StrategyConfig, StrategyInfo, StrategyKind,
};
use crate::provider::ProviderError;
use crate::service::{AnalysisReport, AnalysisRequest, AnalysisService, ServiceError};

/// Default benchmark when the frontend does not pick one (S&P 500)
const DEFAULT_BENCHMARK: &str = "^GSPC";
/// Default lookback window for the date range, in days
const DEFAULT_RANGE_DAYS: i64 = 365;

/// Shared state behind every handler
pub struct AppState {
    pub service: AnalysisService,
}

/// Assemble the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/strategies", get(strategies))
        .route("/api/analysis", get(analysis))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Query string for GET /api/analysis.
#[derive(Debug, Deserialize)]
pub struct AnalysisQuery {
    pub symbol: String,
    pub benchmark: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// Strategy name: "momentum" (default) or "value"
    pub strategy: Option<String>,
    /// Lookback / moving-average window, strategy-dependent default
    pub window: Option<usize>,
    pub threshold: Option<f64>,
}

impl AnalysisQuery {
    fn into_request(self) -> Result<AnalysisRequest, ApiError> {
        let kind: StrategyKind = self
            .strategy
            .as_deref()
            .unwrap_or("momentum")
            .parse()
            .map_err(ServiceError::Analysis)?;

        let end = self.end.unwrap_or_else(|| Utc::now().date_naive());
        let start = self
            .start
            .unwrap_or_else(|| end - chrono::Duration::days(DEFAULT_RANGE_DAYS));
        if end < start {
            return Err(ApiError::BadRequest(format!(
                "inverted date range: {} after {}",
                start, end
            )));
        }

        Ok(AnalysisRequest {
            symbol: self.symbol,
            benchmark: self
                .benchmark
                .unwrap_or_else(|| DEFAULT_BENCHMARK.to_string()),
            start,
            end,
            strategy: StrategyConfig::from_parts(kind, self.window, self.threshold),
        })
    }
}

/// GET /api/health — liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /api/strategies — strategies for the frontend picker.
async fn strategies() -> Json<Vec<StrategyInfo>> {
    Json(list_strategies())
}

/// GET /api/analysis — run one analysis and return the full report.
async fn analysis(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let request = query.into_request()?;
    let report = state.service.analyze(request).await?;
    Ok(Json(report))
}

/// Unified error type for API responses.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Service(ServiceError),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::Service(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Service(err) => (status_for(&err), err.to_string()),
        };

        let body = json!({ "error": message });
        (status, Json(body)).into_response()
    }
}

fn status_for(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::Analysis(AnalysisError::InvalidParameter(_)) => StatusCode::BAD_REQUEST,
        ServiceError::Analysis(AnalysisError::InsufficientData(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ServiceError::Analysis(AnalysisError::Alignment(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        ServiceError::Provider(ProviderError::InvalidSymbol(_)) => StatusCode::BAD_REQUEST,
        ServiceError::Provider(ProviderError::UnknownSymbol(_)) => StatusCode::NOT_FOUND,
        ServiceError::Provider(ProviderError::Network(_) | ProviderError::Timeout) => {
            StatusCode::BAD_GATEWAY
        }
        ServiceError::Provider(_) => StatusCode::BAD_GATEWAY,
        ServiceError::Data(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
