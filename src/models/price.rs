//! Price history data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dca::error::DcaResult;
use crate::dca::validation;

/// A single point as served by the market-data service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketDataPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
}

/// Chronological sequence of positive, finite prices.
///
/// Construction validates every element, so holding a `PriceSeries` means the
/// data is usable for return calculations. The optimization-specific length
/// requirement is checked separately by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PriceSeries {
    prices: Vec<f64>,
}

impl PriceSeries {
    pub fn new(prices: Vec<f64>) -> DcaResult<Self> {
        validation::validate_prices(&prices)?;
        Ok(Self { prices })
    }

    pub fn from_points(points: &[MarketDataPoint]) -> DcaResult<Self> {
        Self::new(points.iter().map(|p| p.price).collect())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.prices
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Last observed price. Validation guarantees the series is non-empty.
    pub fn last_price(&self) -> f64 {
        self.prices[self.prices.len() - 1]
    }
}
