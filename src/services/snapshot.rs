//! Immutable price snapshots shared with optimization requests
//!
//! Requests take an `Arc<PriceSnapshot>` and keep it for the whole call, so a
//! refresh never changes the data underneath a running optimization.

use chrono::{DateTime, Utc};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::dca::validation;
use crate::metrics::Metrics;
use crate::models::price::PriceSeries;
use crate::services::market_data::{MarketDataError, PriceHistoryProvider};

#[derive(Debug, Clone)]
pub struct PriceSnapshot {
    /// Content fingerprint; identical prices give identical ids
    pub id: u64,
    pub series: PriceSeries,
    pub fetched_at: DateTime<Utc>,
    pub source: &'static str,
}

impl PriceSnapshot {
    pub fn new(series: PriceSeries, source: &'static str) -> Self {
        Self {
            id: fingerprint(&series),
            series,
            fetched_at: Utc::now(),
            source,
        }
    }
}

fn fingerprint(series: &PriceSeries) -> u64 {
    let mut hasher = DefaultHasher::new();
    series.len().hash(&mut hasher);
    for price in series.as_slice() {
        price.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

#[derive(Default)]
pub struct SnapshotStore {
    current: RwLock<Option<Arc<PriceSnapshot>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: PriceSnapshot) -> Self {
        Self {
            current: RwLock::new(Some(Arc::new(snapshot))),
        }
    }

    pub async fn current(&self) -> Option<Arc<PriceSnapshot>> {
        self.current.read().await.clone()
    }

    pub async fn replace(&self, snapshot: PriceSnapshot) -> Arc<PriceSnapshot> {
        let snapshot = Arc::new(snapshot);
        *self.current.write().await = Some(snapshot.clone());
        snapshot
    }

    /// Fetch fresh history and swap it in. On error, including a history too
    /// short to optimize against, the previous snapshot stays.
    pub async fn refresh(
        &self,
        provider: &dyn PriceHistoryProvider,
        days: u32,
    ) -> Result<Arc<PriceSnapshot>, MarketDataError> {
        let series = provider.fetch_price_history(days).await?;
        validation::validate_for_optimization(series.as_slice())?;
        let snapshot = self.replace(PriceSnapshot::new(series, provider.name())).await;

        info!(
            snapshot_id = snapshot.id,
            data_points = snapshot.series.len(),
            source = snapshot.source,
            last_price = snapshot.series.last_price(),
            "Price snapshot refreshed"
        );

        Ok(snapshot)
    }

    /// Periodically refresh from `provider`. The first tick fires after one
    /// full `interval`; callers load the initial snapshot themselves.
    pub fn spawn_refresh(
        self: Arc<Self>,
        provider: Arc<dyn PriceHistoryProvider>,
        days: u32,
        interval: Duration,
        metrics: Option<Arc<Metrics>>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval.max(Duration::from_secs(1)));
            // interval() completes its first tick immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if let Err(e) = self.refresh(provider.as_ref(), days).await {
                    warn!(error = %e, "Price snapshot refresh failed, keeping previous snapshot");
                    if let Some(metrics) = &metrics {
                        metrics.snapshot_refresh_failures_total.inc();
                    }
                }
            }
        })
    }
}
