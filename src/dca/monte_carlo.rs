//! Monte Carlo estimate of DCA returns under a heavy-tailed return model
//!
//! Each run walks a simulated price forward one purchase at a time, drawing
//! per-purchase returns from a Student-t distribution fitted to the trimmed
//! historical returns. Units bought along the path are valued at the last
//! observed market price, so a run's return isolates the cost-basis effect.
//!
//! Runs are independent and executed on the rayon pool. The caller's RNG only
//! hands out one seed per run, which keeps results reproducible regardless of
//! how runs are scheduled across threads.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StudentT};
use rayon::prelude::*;
use tracing::debug;

use crate::common::math;
use crate::dca::error::{DcaError, DcaResult};
use crate::models::strategy::PurchasePlan;

pub const DEFAULT_SIMULATIONS: usize = 1000;
pub const MIN_SIMULATION_RETURNS: usize = 10;

const DEGREES_OF_FREEDOM: f64 = 3.0;
const OUTLIER_PERCENTILE: f64 = 95.0;
const MIN_STEP_RETURN: f64 = -0.5;
const MAX_STEP_RETURN: f64 = 2.0;
const PRICE_FLOOR_RATIO: f64 = 0.1;

/// Location/scale of the per-purchase return distribution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnModel {
    pub location: f64,
    pub scale: f64,
}

impl ReturnModel {
    /// Fit from historical returns, trimming anything at or above the 95th
    /// percentile of absolute returns.
    ///
    /// Falls back to the untrimmed returns when trimming leaves nothing, which
    /// happens when every absolute return is identical.
    pub fn fit(returns: &[f64]) -> DcaResult<Self> {
        if returns.len() < MIN_SIMULATION_RETURNS {
            return Err(DcaError::InsufficientReturns {
                required: MIN_SIMULATION_RETURNS,
                available: returns.len(),
            });
        }

        let abs_returns: Vec<f64> = returns.iter().map(|r| r.abs()).collect();
        let cutoff = math::percentile(&abs_returns, OUTLIER_PERCENTILE).ok_or(
            DcaError::InsufficientReturns {
                required: MIN_SIMULATION_RETURNS,
                available: 0,
            },
        )?;

        let trimmed: Vec<f64> = returns
            .iter()
            .copied()
            .filter(|r| r.abs() < cutoff)
            .collect();
        let sample = if trimmed.is_empty() { returns } else { &trimmed[..] };

        let location = math::mean(sample).unwrap_or(0.0);
        let scale = math::std_dev(sample).unwrap_or(0.0);

        debug!(
            cutoff = cutoff,
            kept = sample.len(),
            total = returns.len(),
            location = location,
            scale = scale,
            "Fitted return model"
        );

        Ok(Self { location, scale })
    }
}

/// Aggregated outcome of all runs, returns expressed as fractions
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSummary {
    pub runs: usize,
    pub median_return: f64,
    pub mean_return: f64,
    pub percentile_5: f64,
    pub percentile_95: f64,
}

#[derive(Debug, Clone)]
pub struct MonteCarloSimulator {
    simulations: usize,
}

impl Default for MonteCarloSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_SIMULATIONS)
    }
}

impl MonteCarloSimulator {
    pub fn new(simulations: usize) -> Self {
        Self { simulations }
    }

    pub fn simulations(&self) -> usize {
        self.simulations
    }

    /// Simulate `plan` against the historical `returns`, anchored at `last_price`
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        returns: &[f64],
        last_price: f64,
        plan: &PurchasePlan,
        rng: &mut R,
    ) -> DcaResult<SimulationSummary> {
        if self.simulations == 0 {
            return Err(DcaError::InvalidParameter(
                "simulation count must be at least 1".to_string(),
            ));
        }
        if !last_price.is_finite() || last_price <= 0.0 {
            return Err(DcaError::InvalidPriceData(format!(
                "last observed price must be positive, got {}",
                last_price
            )));
        }

        let purchases = plan.total_purchases.trunc() as usize;
        if purchases == 0 {
            return Err(DcaError::InvalidParameter(format!(
                "plan of {:.3} purchases rounds down to zero",
                plan.total_purchases
            )));
        }

        let model = ReturnModel::fit(returns)?;
        let student_t = StudentT::new(DEGREES_OF_FREEDOM)
            .map_err(|e| DcaError::InvalidParameter(format!("t-distribution: {}", e)))?;

        let seeds: Vec<u64> = (0..self.simulations).map(|_| rng.gen()).collect();

        let mut results: Vec<f64> = seeds
            .into_par_iter()
            .map(|seed| {
                let mut run_rng = StdRng::seed_from_u64(seed);
                simulate_run(
                    &model,
                    &student_t,
                    last_price,
                    plan.amount_per_purchase,
                    purchases,
                    &mut run_rng,
                )
            })
            .collect();

        if results.iter().any(|r| !r.is_finite()) {
            return Err(DcaError::InvalidResult(
                "simulation produced a non-finite run return".to_string(),
            ));
        }

        results.sort_by(|a, b| a.total_cmp(b));

        let quantile = |pct: f64| {
            math::percentile_sorted(&results, pct).ok_or_else(|| {
                DcaError::InvalidResult("simulation produced no runs".to_string())
            })
        };
        let summary = SimulationSummary {
            runs: results.len(),
            median_return: quantile(50.0)?,
            mean_return: math::mean(&results).unwrap_or(0.0),
            percentile_5: quantile(5.0)?,
            percentile_95: quantile(95.0)?,
        };

        debug!(
            runs = summary.runs,
            purchases = purchases,
            median = summary.median_return,
            mean = summary.mean_return,
            p5 = summary.percentile_5,
            p95 = summary.percentile_95,
            "Monte Carlo simulation complete"
        );

        Ok(summary)
    }
}

/// One trajectory; returns (final value - invested) / invested
fn simulate_run<R: Rng + ?Sized>(
    model: &ReturnModel,
    student_t: &StudentT<f64>,
    last_price: f64,
    amount_per_purchase: f64,
    purchases: usize,
    rng: &mut R,
) -> f64 {
    let floor = last_price * PRICE_FLOOR_RATIO;
    let mut price = last_price;
    let mut units = 0.0;
    let mut invested = 0.0;

    for _ in 0..purchases {
        let draw = model.location + model.scale * student_t.sample(rng);
        let step = draw.clamp(MIN_STEP_RETURN, MAX_STEP_RETURN);

        price = (price * (1.0 + step)).max(floor);
        units += amount_per_purchase / price;
        invested += amount_per_purchase;
    }

    let final_value = units * last_price;
    (final_value - invested) / invested
}
