//! Annualized volatility and period returns

use crate::common::math;
use crate::dca::error::{DcaError, DcaResult};
use crate::dca::validation::MIN_RETURN_PRICES;

/// Periods per year; price history is sampled daily
pub const PERIODS_PER_YEAR: f64 = 365.0;

/// Minimum finite returns needed to estimate volatility
pub const MIN_VOLATILITY_RETURNS: usize = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct VolatilityAnalysis {
    /// Annualized standard deviation of simple returns
    pub volatility: f64,
    /// Finite simple returns, in chronological order
    pub returns: Vec<f64>,
}

/// Simple returns between adjacent prices, dropping any non-finite value
pub fn period_returns(prices: &[f64]) -> Vec<f64> {
    if prices.len() < MIN_RETURN_PRICES {
        return Vec::new();
    }

    prices
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0])
        .filter(|r| r.is_finite())
        .collect()
}

/// Compute annualized volatility and the cleaned returns it was derived from
pub fn analyze(prices: &[f64]) -> DcaResult<VolatilityAnalysis> {
    let returns = period_returns(prices);

    if returns.len() < MIN_VOLATILITY_RETURNS {
        return Err(DcaError::InsufficientReturns {
            required: MIN_VOLATILITY_RETURNS,
            available: returns.len(),
        });
    }

    let std = math::std_dev(&returns).ok_or(DcaError::InsufficientReturns {
        required: MIN_VOLATILITY_RETURNS,
        available: 0,
    })?;

    Ok(VolatilityAnalysis {
        volatility: std * PERIODS_PER_YEAR.sqrt(),
        returns,
    })
}

/// Human-readable descriptor used in strategy explanations
pub fn describe(volatility: f64) -> &'static str {
    if volatility <= 0.3 {
        "low"
    } else if volatility <= 0.5 {
        "moderate"
    } else {
        "high"
    }
}
