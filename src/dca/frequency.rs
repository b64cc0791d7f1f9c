//! Purchase cadence selection

use crate::dca::error::{DcaError, DcaResult};
use crate::models::strategy::{PurchaseFrequency, PurchasePlan, RiskTolerance, StrategyRequest};

/// Pick a cadence from volatility relative to the tolerance threshold.
///
/// Intervals are closed-open: exactly half the threshold is already biweekly,
/// exactly the threshold is already weekly.
pub fn select_frequency(volatility: f64, risk_tolerance: RiskTolerance) -> PurchaseFrequency {
    let threshold = risk_tolerance.volatility_threshold();

    if volatility < threshold * 0.5 {
        PurchaseFrequency::Monthly
    } else if volatility < threshold {
        PurchaseFrequency::Biweekly
    } else {
        PurchaseFrequency::Weekly
    }
}

/// Total purchases over the horizon; fractional, never rounded here
pub fn total_purchases(duration_months: u32, frequency: PurchaseFrequency) -> f64 {
    (duration_months as f64 / 12.0) * frequency.annual_multiplier() as f64
}

/// Build the purchase plan for a request given the measured volatility
pub fn plan(volatility: f64, request: &StrategyRequest) -> DcaResult<PurchasePlan> {
    request.validate()?;

    let frequency = select_frequency(volatility, request.risk_tolerance);
    let total_purchases = total_purchases(request.duration_months, frequency);

    if total_purchases <= 0.0 {
        return Err(DcaError::InvalidParameter(format!(
            "duration of {} months yields no purchases",
            request.duration_months
        )));
    }

    Ok(PurchasePlan {
        frequency,
        total_purchases,
        amount_per_purchase: request.investment_amount / total_purchases,
    })
}
