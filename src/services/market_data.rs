//! Price history providers feeding the optimizer snapshot

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::dca::error::DcaError;
use crate::dca::validation;
use crate::models::price::{MarketDataPoint, PriceSeries};

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("Market data request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Market data service returned status {0}")]
    Status(u16),

    #[error("Market data rejected: {0}")]
    InvalidData(#[from] DcaError),
}

#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Daily closing prices for the last `days` days, oldest first
    async fn fetch_price_history(&self, days: u32) -> Result<PriceSeries, MarketDataError>;

    /// Short name used in logs and snapshot metadata
    fn name(&self) -> &'static str;
}

/// Reads history from the platform's market-data service
pub struct HttpPriceHistoryProvider {
    base_url: String,
    asset: String,
    client: reqwest::Client,
}

impl HttpPriceHistoryProvider {
    pub fn new(base_url: impl Into<String>, asset: impl Into<String>) -> Self {
        Self::with_client(base_url, asset, reqwest::Client::new())
    }

    pub fn with_client(
        base_url: impl Into<String>,
        asset: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            asset: asset.into(),
            client,
        }
    }

    fn history_url(&self) -> String {
        format!("{}/api/market/{}/history", self.base_url, self.asset)
    }
}

#[async_trait]
impl PriceHistoryProvider for HttpPriceHistoryProvider {
    async fn fetch_price_history(&self, days: u32) -> Result<PriceSeries, MarketDataError> {
        let url = self.history_url();
        debug!(url = %url, days = days, "Fetching price history");

        let response = self
            .client
            .get(&url)
            .query(&[("days", days)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketDataError::Status(status.as_u16()));
        }

        let points: Vec<MarketDataPoint> = response.json().await?;
        debug!(points = points.len(), "Price history received");

        Ok(PriceSeries::from_points(&points)?)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

/// Serves `primary`, falling back to `fallback` on any error or when the
/// primary history is too short to optimize against
pub struct FallbackPriceHistoryProvider {
    primary: Arc<dyn PriceHistoryProvider>,
    fallback: Arc<dyn PriceHistoryProvider>,
}

impl FallbackPriceHistoryProvider {
    pub fn new(
        primary: Arc<dyn PriceHistoryProvider>,
        fallback: Arc<dyn PriceHistoryProvider>,
    ) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl PriceHistoryProvider for FallbackPriceHistoryProvider {
    async fn fetch_price_history(&self, days: u32) -> Result<PriceSeries, MarketDataError> {
        let failure = match self.primary.fetch_price_history(days).await {
            Ok(series) => match validation::validate_for_optimization(series.as_slice()) {
                Ok(()) => return Ok(series),
                Err(e) => MarketDataError::from(e),
            },
            Err(e) => e,
        };

        warn!(
            error = %failure,
            primary = self.primary.name(),
            fallback = self.fallback.name(),
            "Failed to fetch price history, using fallback"
        );
        self.fallback.fetch_price_history(days).await
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}
