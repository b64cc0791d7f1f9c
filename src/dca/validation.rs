//! Price series sanity checks

use crate::dca::error::{DcaError, DcaResult};

/// Minimum number of prices required to run an optimization
pub const MIN_OPTIMIZATION_PRICES: usize = 30;

/// Minimum number of prices for any return calculation
pub const MIN_RETURN_PRICES: usize = 2;

/// Reject empty series and any NaN, infinite, zero or negative price
pub fn validate_prices(prices: &[f64]) -> DcaResult<()> {
    if prices.is_empty() {
        return Err(DcaError::InvalidPriceData(
            "price series is empty".to_string(),
        ));
    }

    if let Some((index, price)) = prices
        .iter()
        .enumerate()
        .find(|(_, p)| !p.is_finite() || **p <= 0.0)
    {
        return Err(DcaError::InvalidPriceData(format!(
            "price at index {} is not a positive finite number: {}",
            index, price
        )));
    }

    Ok(())
}

/// Full gate applied before an optimization run
pub fn validate_for_optimization(prices: &[f64]) -> DcaResult<()> {
    validate_prices(prices)?;

    if prices.len() < MIN_OPTIMIZATION_PRICES {
        return Err(DcaError::InvalidPriceData(format!(
            "need at least {} prices for optimization, got {}",
            MIN_OPTIMIZATION_PRICES,
            prices.len()
        )));
    }

    Ok(())
}
