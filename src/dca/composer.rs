//! Assembles the final recommendation and checks its post-conditions

use crate::common::math::round_to;
use crate::dca::error::{DcaError, DcaResult};
use crate::dca::volatility;
use crate::models::strategy::{PurchasePlan, RiskTolerance, StrategyResult};

/// Combine the stage outputs into a [`StrategyResult`].
///
/// `median_return` is a fraction (0.05 == 5%).
pub fn compose(
    plan: &PurchasePlan,
    volatility: f64,
    risk_tolerance: RiskTolerance,
    median_return: f64,
) -> DcaResult<StrategyResult> {
    let threshold = risk_tolerance.volatility_threshold();

    // `+ 0.0` normalizes a rounded negative zero
    let amount_per_purchase = round_to(plan.amount_per_purchase, 2) + 0.0;
    let expected_return_pct = round_to(median_return * 100.0, 2) + 0.0;
    let risk_score = round_to((volatility / threshold).min(1.0), 3) + 0.0;

    if !amount_per_purchase.is_finite() || amount_per_purchase <= 0.0 {
        return Err(DcaError::InvalidResult(format!(
            "amount per purchase must be positive, got {}",
            amount_per_purchase
        )));
    }
    if !risk_score.is_finite() || !(0.0..=1.0).contains(&risk_score) {
        return Err(DcaError::InvalidResult(format!(
            "risk score must lie in [0, 1], got {}",
            risk_score
        )));
    }
    if !expected_return_pct.is_finite() {
        return Err(DcaError::InvalidResult(
            "expected return is not finite".to_string(),
        ));
    }

    let explanation = explain(
        plan,
        volatility,
        risk_tolerance,
        expected_return_pct,
    );

    Ok(StrategyResult {
        frequency: plan.frequency,
        amount_per_purchase,
        expected_return_pct,
        risk_score,
        explanation,
    })
}

fn explain(
    plan: &PurchasePlan,
    volatility: f64,
    risk_tolerance: RiskTolerance,
    expected_return_pct: f64,
) -> String {
    format!(
        "Based on current market volatility ({}) and your {} risk tolerance, \
         a {} DCA strategy is recommended. This approach expects a {:.1}% return \
         while managing downside risk through consistent dollar-cost averaging \
         during market fluctuations.",
        volatility::describe(volatility),
        risk_tolerance,
        plan.frequency,
        expected_return_pct,
    )
}
