//! Unit tests for result composition

use dcalytics::dca::composer::compose;
use dcalytics::dca::error::DcaError;
use dcalytics::models::strategy::{PurchaseFrequency, PurchasePlan, RiskTolerance};

fn plan(frequency: PurchaseFrequency, amount: f64) -> PurchasePlan {
    PurchasePlan {
        frequency,
        total_purchases: 12.0,
        amount_per_purchase: amount,
    }
}

#[test]
fn test_rounding() {
    let result = compose(
        &plan(PurchaseFrequency::Monthly, 83.333_333),
        0.1,
        RiskTolerance::Medium,
        0.123_456,
    )
    .unwrap();

    assert_eq!(result.amount_per_purchase, 83.33);
    assert_eq!(result.expected_return_pct, 12.35);
    assert_eq!(result.risk_score, 0.2);
}

#[test]
fn test_risk_score_is_capped() {
    let result = compose(
        &plan(PurchaseFrequency::Weekly, 10.0),
        2.5,
        RiskTolerance::High,
        0.0,
    )
    .unwrap();
    assert_eq!(result.risk_score, 1.0);
}

#[test]
fn test_negative_zero_normalized() {
    let result = compose(
        &plan(PurchaseFrequency::Monthly, 100.0),
        0.0,
        RiskTolerance::Low,
        -0.000_01,
    )
    .unwrap();

    assert_eq!(result.expected_return_pct, 0.0);
    assert!(result.expected_return_pct.is_sign_positive());
    assert!(result.risk_score.is_sign_positive());
}

#[test]
fn test_invalid_results_rejected() {
    assert!(matches!(
        compose(&plan(PurchaseFrequency::Monthly, 0.001), 0.1, RiskTolerance::Low, 0.0),
        Err(DcaError::InvalidResult(_))
    ));
    assert!(matches!(
        compose(&plan(PurchaseFrequency::Monthly, 10.0), 0.1, RiskTolerance::Low, f64::NAN),
        Err(DcaError::InvalidResult(_))
    ));
}

#[test]
fn test_explanation_text() {
    let result = compose(
        &plan(PurchaseFrequency::Biweekly, 50.0),
        0.4,
        RiskTolerance::Medium,
        0.05,
    )
    .unwrap();

    assert_eq!(
        result.explanation,
        "Based on current market volatility (moderate) and your medium risk tolerance, \
         a biweekly DCA strategy is recommended. This approach expects a 5.0% return \
         while managing downside risk through consistent dollar-cost averaging \
         during market fluctuations."
    );
}
