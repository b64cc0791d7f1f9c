//! HTTP endpoint server using Axum

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

use crate::cache::{CacheOutcome, StrategyCache, StrategyCacheKey};
use crate::config::ServiceConfig;
use crate::dca::engine::DcaOptimizer;
use crate::dca::error::DcaError;
use crate::metrics::Metrics;
use crate::models::strategy::{PurchaseFrequency, RiskTolerance, StrategyRequest, StrategyResult};
use crate::services::market_data::{
    FallbackPriceHistoryProvider, HttpPriceHistoryProvider, PriceHistoryProvider,
};
use crate::services::snapshot::{PriceSnapshot, SnapshotStore};
use crate::services::synthetic::SyntheticPriceGenerator;

const SERVICE_NAME: &str = "dcalytics-optimizer";

/// Investment bounds enforced at the service boundary (exclusive min, inclusive max)
pub const MIN_INVESTMENT_AMOUNT: f64 = 100.0;
pub const MAX_INVESTMENT_AMOUNT: f64 = 10_000_000.0;
pub const MAX_DURATION_MONTHS: u32 = 120;

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub snapshots: Arc<SnapshotStore>,
    pub optimizer: Arc<DcaOptimizer>,
    pub cache: Option<Arc<StrategyCache>>,
    pub optimization_timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DcaOptimizationRequest {
    pub investment_amount: f64,
    pub duration_months: u32,
    pub risk_tolerance: String,
}

impl DcaOptimizationRequest {
    /// Apply service-level bounds, then build the engine request
    fn into_strategy_request(self) -> Result<StrategyRequest, ApiError> {
        if !(self.investment_amount > MIN_INVESTMENT_AMOUNT
            && self.investment_amount <= MAX_INVESTMENT_AMOUNT)
        {
            return Err(ApiError::Validation(format!(
                "investment_amount must be greater than {} and at most {}",
                MIN_INVESTMENT_AMOUNT, MAX_INVESTMENT_AMOUNT
            )));
        }
        if !(1..=MAX_DURATION_MONTHS).contains(&self.duration_months) {
            return Err(ApiError::Validation(format!(
                "duration_months must be between 1 and {}",
                MAX_DURATION_MONTHS
            )));
        }

        let risk_tolerance: RiskTolerance = self.risk_tolerance.parse()?;
        Ok(StrategyRequest::new(
            self.investment_amount,
            self.duration_months,
            risk_tolerance,
        )?)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DcaOptimizationResponse {
    pub optimal_frequency: PurchaseFrequency,
    pub recommended_amount_per_purchase: f64,
    pub expected_return: f64,
    pub risk_score: f64,
    pub strategy_explanation: String,
}

impl From<StrategyResult> for DcaOptimizationResponse {
    fn from(result: StrategyResult) -> Self {
        Self {
            optimal_frequency: result.frequency,
            recommended_amount_per_purchase: result.amount_per_purchase,
            expected_return: result.expected_return_pct,
            risk_score: result.risk_score,
            strategy_explanation: result.explanation,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ApiError {
    Validation(String),
    Engine(DcaError),
    SnapshotUnavailable,
    Timeout,
    Internal(String),
}

impl From<DcaError> for ApiError {
    fn from(e: DcaError) -> Self {
        ApiError::Engine(e)
    }
}

impl ApiError {
    fn outcome(&self) -> &'static str {
        match self {
            ApiError::Validation(_)
            | ApiError::Engine(DcaError::InvalidParameter(_))
            | ApiError::Engine(DcaError::InvalidPriceData(_)) => "invalid_request",
            ApiError::Engine(DcaError::InsufficientReturns { .. })
            | ApiError::SnapshotUnavailable => "insufficient_data",
            ApiError::Timeout => "timeout",
            ApiError::Engine(DcaError::InvalidResult(_)) | ApiError::Internal(_) => "error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Engine(e @ DcaError::InvalidParameter(_))
            | ApiError::Engine(e @ DcaError::InvalidPriceData(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
            ApiError::Engine(e @ DcaError::InsufficientReturns { .. }) => {
                (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
            }
            ApiError::SnapshotUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Price history not initialized".to_string(),
            ),
            ApiError::Timeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "Optimization timed out".to_string(),
            ),
            ApiError::Engine(e @ DcaError::InvalidResult(_)) => {
                error!(error = %e, "Optimizer produced an invalid result");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to compute strategy".to_string(),
                )
            }
            ApiError::Internal(msg) => {
                error!(error = %msg, "DCA optimization failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to compute strategy".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    let data_points = state
        .snapshots
        .current()
        .await
        .map(|s| s.series.len())
        .unwrap_or(0);

    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": SERVICE_NAME,
        "data_points": data_points
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

/// Run the engine off the async runtime, bounded by the configured timeout
async fn compute_strategy(
    state: &AppState,
    snapshot: Arc<PriceSnapshot>,
    request: StrategyRequest,
) -> Result<StrategyResult, ApiError> {
    let optimizer = state.optimizer.clone();
    let task = tokio::task::spawn_blocking(move || optimizer.optimize(&snapshot.series, &request));

    match tokio::time::timeout(state.optimization_timeout, task).await {
        Ok(Ok(result)) => Ok(result?),
        Ok(Err(join_error)) => Err(ApiError::Internal(join_error.to_string())),
        // The blocking task finishes on its own; its result is dropped
        Err(_) => Err(ApiError::Timeout),
    }
}

async fn optimize_dca(
    state: &AppState,
    request: DcaOptimizationRequest,
) -> Result<StrategyResult, ApiError> {
    let request = request.into_strategy_request()?;
    let snapshot = state
        .snapshots
        .current()
        .await
        .ok_or(ApiError::SnapshotUnavailable)?;

    let Some(cache) = state.cache.as_ref() else {
        return compute_strategy(state, snapshot, request).await;
    };

    let key = StrategyCacheKey::new(snapshot.id, &request);
    let (result, outcome) = cache
        .get_or_compute(key, compute_strategy(state, snapshot, request))
        .await
        .map_err(|e| (*e).clone())?;

    match outcome {
        CacheOutcome::Hit => state.metrics.strategy_cache_hits_total.inc(),
        CacheOutcome::Miss => state.metrics.strategy_cache_misses_total.inc(),
    }
    Ok(result)
}

/// Optimize a DCA strategy against the current price snapshot
async fn optimize_dca_handler(
    State(state): State<AppState>,
    payload: Result<Json<DcaOptimizationRequest>, JsonRejection>,
) -> Result<Json<DcaOptimizationResponse>, ApiError> {
    let start = Instant::now();
    let outcome = match payload {
        Ok(Json(request)) => optimize_dca(&state, request).await,
        Err(rejection) => Err(ApiError::Validation(rejection.body_text())),
    };
    state
        .metrics
        .optimization_duration_seconds
        .observe(start.elapsed().as_secs_f64());

    match outcome {
        Ok(result) => {
            state.metrics.record_optimization("success");
            Ok(Json(result.into()))
        }
        Err(e) => {
            state.metrics.record_optimization(e.outcome());
            if !matches!(e, ApiError::Validation(_) | ApiError::Engine(_)) {
                warn!(outcome = e.outcome(), "DCA optimization did not complete");
            }
            Err(e)
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/optimize-dca", post(optimize_dca_handler))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(config: ServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    let start_time = Arc::new(Instant::now());

    let provider: Arc<dyn PriceHistoryProvider> = Arc::new(FallbackPriceHistoryProvider::new(
        Arc::new(HttpPriceHistoryProvider::new(
            config.market_data_url.clone(),
            config.market_asset.clone(),
        )),
        Arc::new(SyntheticPriceGenerator::default()),
    ));

    let snapshots = Arc::new(SnapshotStore::new());
    if let Err(e) = snapshots.refresh(provider.as_ref(), config.history_days).await {
        warn!(error = %e, "Initial price snapshot unavailable - optimization requests will fail until a refresh succeeds");
        metrics.snapshot_refresh_failures_total.inc();
    }
    if !config.snapshot_refresh.is_zero() {
        snapshots.clone().spawn_refresh(
            provider,
            config.history_days,
            config.snapshot_refresh,
            Some(metrics.clone()),
        );
    }

    let cache = if config.cache_enabled() {
        Some(Arc::new(StrategyCache::new(
            config.cache_ttl,
            config.cache_capacity,
        )))
    } else {
        None
    };

    let state = AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics: metrics.clone(),
        start_time: start_time.clone(),
        snapshots,
        optimizer: Arc::new(DcaOptimizer::new(config.optimizer)),
        cache,
        optimization_timeout: config.optimization_timeout,
    };
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    info!(port = config.port, "HTTP server listening on port {}", config.port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        config.port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
