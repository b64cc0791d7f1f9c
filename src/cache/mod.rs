//! Single-flight, TTL-bounded memoization of strategy results
//!
//! Keys combine the price snapshot fingerprint with the request parameters.
//! Concurrent callers for the same key share one computation; failed
//! computations are not stored.

use moka::future::Cache;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::models::strategy::{RiskTolerance, StrategyRequest, StrategyResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrategyCacheKey {
    snapshot_id: u64,
    investment_amount_bits: u64,
    duration_months: u32,
    risk_tolerance: RiskTolerance,
}

impl StrategyCacheKey {
    pub fn new(snapshot_id: u64, request: &StrategyRequest) -> Self {
        Self {
            snapshot_id,
            investment_amount_bits: request.investment_amount.to_bits(),
            duration_months: request.duration_months,
            risk_tolerance: request.risk_tolerance,
        }
    }
}

/// Whether a result came from the cache or was computed by this call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Miss,
}

pub struct StrategyCache {
    inner: Cache<StrategyCacheKey, StrategyResult>,
}

impl StrategyCache {
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { inner }
    }

    /// Return the cached result for `key`, or run `compute` to produce it.
    ///
    /// At most one `compute` runs per key at a time; other callers wait for
    /// its outcome and receive the same error if it fails.
    pub async fn get_or_compute<F, E>(
        &self,
        key: StrategyCacheKey,
        compute: F,
    ) -> Result<(StrategyResult, CacheOutcome), Arc<E>>
    where
        F: Future<Output = Result<StrategyResult, E>>,
        E: Send + Sync + 'static,
    {
        let entry = self.inner.entry(key).or_try_insert_with(compute).await?;

        let outcome = if entry.is_fresh() {
            CacheOutcome::Miss
        } else {
            CacheOutcome::Hit
        };
        debug!(?key, ?outcome, "Strategy cache lookup");

        Ok((entry.into_value(), outcome))
    }

    pub async fn invalidate_all(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;
    }

    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}
