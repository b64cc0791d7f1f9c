//! Test utilities for API server integration tests

use axum_test::TestServer;
use dcalytics::cache::StrategyCache;
use dcalytics::core::http::{create_router, AppState, HealthStatus};
use dcalytics::dca::engine::{DcaOptimizer, OptimizerConfig};
use dcalytics::metrics::Metrics;
use dcalytics::models::price::PriceSeries;
use dcalytics::services::snapshot::{PriceSnapshot, SnapshotStore};
use dcalytics::services::synthetic::SyntheticPriceGenerator;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

pub const TEST_SEED: u64 = 2024;
pub const TEST_SIMULATIONS: usize = 200;
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Test helper for API server integration tests
#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
    pub snapshots: Arc<SnapshotStore>,
}

#[allow(dead_code)]
impl TestApiServer {
    /// Server backed by a year of synthetic prices, with caching enabled
    pub async fn new() -> Self {
        let series = SyntheticPriceGenerator::default()
            .generate(365)
            .expect("synthetic series");
        Self::build(Some(series), true, TEST_SIMULATIONS, TEST_TIMEOUT).await
    }

    pub async fn with_prices(prices: Vec<f64>) -> Self {
        let series = PriceSeries::new(prices).expect("valid prices");
        Self::build(Some(series), true, TEST_SIMULATIONS, TEST_TIMEOUT).await
    }

    pub async fn without_cache() -> Self {
        let series = SyntheticPriceGenerator::default()
            .generate(365)
            .expect("synthetic series");
        Self::build(Some(series), false, TEST_SIMULATIONS, TEST_TIMEOUT).await
    }

    pub async fn without_snapshot() -> Self {
        Self::build(None, true, TEST_SIMULATIONS, TEST_TIMEOUT).await
    }

    /// Server whose optimizations cannot finish within `timeout`
    pub async fn with_deadline(simulations: usize, timeout: Duration) -> Self {
        let series = SyntheticPriceGenerator::default()
            .generate(365)
            .expect("synthetic series");
        Self::build(Some(series), true, simulations, timeout).await
    }

    async fn build(
        series: Option<PriceSeries>,
        cache_enabled: bool,
        simulations: usize,
        optimization_timeout: Duration,
    ) -> Self {
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let snapshots = Arc::new(match series {
            Some(series) => SnapshotStore::with_snapshot(PriceSnapshot::new(series, "test")),
            None => SnapshotStore::new(),
        });
        let cache = cache_enabled.then(|| Arc::new(StrategyCache::new(Duration::from_secs(60), 64)));

        let state = AppState {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics: metrics.clone(),
            start_time: Arc::new(Instant::now()),
            snapshots: snapshots.clone(),
            optimizer: Arc::new(DcaOptimizer::new(OptimizerConfig {
                simulations,
                seed: Some(TEST_SEED),
            })),
            cache,
            optimization_timeout,
        };

        let app = create_router(state);
        let server = TestServer::new(app).expect("start test server");

        Self {
            server,
            metrics,
            snapshots,
        }
    }
}
