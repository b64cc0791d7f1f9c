//! Reproducible synthetic price history for development and tests

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::dca::error::DcaError;
use crate::models::price::PriceSeries;
use crate::services::market_data::{MarketDataError, PriceHistoryProvider};

pub const DEFAULT_SYNTHETIC_DAYS: u32 = 365;

/// Geometric random walk with normally distributed daily returns
#[derive(Debug, Clone)]
pub struct SyntheticPriceGenerator {
    pub base_price: f64,
    pub daily_drift: f64,
    pub daily_volatility: f64,
    pub price_floor: f64,
    pub seed: u64,
}

impl Default for SyntheticPriceGenerator {
    fn default() -> Self {
        Self {
            base_price: 43_000.0,
            daily_drift: 0.001,
            daily_volatility: 0.04,
            price_floor: 1_000.0,
            seed: 42,
        }
    }
}

impl SyntheticPriceGenerator {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Generate `days` prices starting at `base_price`.
    ///
    /// The same seed always yields the same series.
    pub fn generate(&self, days: u32) -> Result<PriceSeries, DcaError> {
        let normal = Normal::new(self.daily_drift, self.daily_volatility)
            .map_err(|e| DcaError::InvalidParameter(format!("synthetic volatility: {}", e)))?;
        let mut rng = StdRng::seed_from_u64(self.seed);

        let days = days.max(1) as usize;
        let mut prices = Vec::with_capacity(days);
        prices.push(self.base_price);

        for _ in 1..days {
            let previous = prices[prices.len() - 1];
            let daily_return = normal.sample(&mut rng);
            prices.push((previous * (1.0 + daily_return)).max(self.price_floor));
        }

        PriceSeries::new(prices)
    }
}

#[async_trait]
impl PriceHistoryProvider for SyntheticPriceGenerator {
    async fn fetch_price_history(&self, days: u32) -> Result<PriceSeries, MarketDataError> {
        Ok(self.generate(days)?)
    }

    fn name(&self) -> &'static str {
        "synthetic"
    }
}
