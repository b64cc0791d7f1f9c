//! End-to-end optimizer scenarios

use dcalytics::dca::engine::{DcaOptimizer, OptimizerConfig};
use dcalytics::dca::error::DcaError;
use dcalytics::models::price::PriceSeries;
use dcalytics::models::strategy::{PurchaseFrequency, RiskTolerance, StrategyRequest};
use dcalytics::services::synthetic::SyntheticPriceGenerator;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_optimizer(seed: u64) -> DcaOptimizer {
    DcaOptimizer::new(OptimizerConfig {
        simulations: 500,
        seed: Some(seed),
    })
}

fn alternating_series(points: usize, swing: f64) -> PriceSeries {
    let mut prices = vec![100.0];
    for i in 1..points {
        let previous = prices[i - 1];
        let factor = if i % 2 == 1 { 1.0 + swing } else { 1.0 - swing };
        prices.push(previous * factor);
    }
    PriceSeries::new(prices).unwrap()
}

#[test]
fn test_flat_market_low_tolerance() {
    let prices = PriceSeries::new(vec![100.0; 40]).unwrap();
    let request = StrategyRequest::new(1200.0, 12, RiskTolerance::Low).unwrap();

    let result = seeded_optimizer(7).optimize(&prices, &request).unwrap();

    assert_eq!(result.frequency, PurchaseFrequency::Monthly);
    assert_eq!(result.amount_per_purchase, 100.0);
    assert_eq!(result.expected_return_pct, 0.0);
    assert_eq!(result.risk_score, 0.0);
    assert!(result.explanation.contains("(low)"));
    assert!(result.explanation.contains("monthly"));
}

#[test]
fn test_volatile_market_high_tolerance() {
    let prices = alternating_series(40, 0.15);
    let request = StrategyRequest::new(1200.0, 12, RiskTolerance::High).unwrap();

    let result = seeded_optimizer(7).optimize(&prices, &request).unwrap();

    assert_eq!(result.frequency, PurchaseFrequency::Weekly);
    assert_eq!(result.amount_per_purchase, 23.08);
    assert_eq!(result.risk_score, 1.0);
    assert!(result.expected_return_pct.is_finite());
    assert!(result.explanation.contains("(high)"));
}

#[test]
fn test_invalid_parameters() {
    let prices = PriceSeries::new(vec![100.0; 40]).unwrap();
    let optimizer = seeded_optimizer(1);

    for request in [
        StrategyRequest {
            investment_amount: 0.0,
            duration_months: 12,
            risk_tolerance: RiskTolerance::Medium,
        },
        StrategyRequest {
            investment_amount: 1000.0,
            duration_months: 0,
            risk_tolerance: RiskTolerance::Medium,
        },
    ] {
        assert!(matches!(
            optimizer.optimize(&prices, &request),
            Err(DcaError::InvalidParameter(_))
        ));
    }
}

#[test]
fn test_short_history_rejected_before_parameters() {
    let prices = PriceSeries::new(vec![100.0; 29]).unwrap();
    let request = StrategyRequest {
        investment_amount: 0.0,
        duration_months: 0,
        risk_tolerance: RiskTolerance::Low,
    };

    assert!(matches!(
        seeded_optimizer(1).optimize(&prices, &request),
        Err(DcaError::InvalidPriceData(_))
    ));
}

#[test]
fn test_results_are_bounded_across_inputs() {
    let prices = SyntheticPriceGenerator::default().generate(365).unwrap();
    let optimizer = seeded_optimizer(11);

    for tolerance in [RiskTolerance::Low, RiskTolerance::Medium, RiskTolerance::High] {
        for months in [1, 6, 24, 120] {
            let request = StrategyRequest::new(5_000.0, months, tolerance).unwrap();
            let result = optimizer.optimize(&prices, &request).unwrap();

            assert!((0.0..=1.0).contains(&result.risk_score));
            assert!(result.amount_per_purchase > 0.0);
            assert!(result.expected_return_pct.is_finite());
        }
    }
}

#[test]
fn test_seeded_optimization_is_idempotent() {
    let prices = SyntheticPriceGenerator::default().generate(180).unwrap();
    let request = StrategyRequest::new(2_500.0, 18, RiskTolerance::Medium).unwrap();
    let optimizer = seeded_optimizer(42);

    let first = optimizer.optimize(&prices, &request).unwrap();
    let second = optimizer.optimize(&prices, &request).unwrap();
    assert_eq!(first, second);

    let explicit = DcaOptimizer::new(OptimizerConfig {
        simulations: 500,
        seed: None,
    })
    .optimize_with_rng(&prices, &request, &mut StdRng::seed_from_u64(42))
    .unwrap();
    assert_eq!(explicit, first);
}
