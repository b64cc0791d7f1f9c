//! Optimization pipeline: validate, analyze, select, simulate, compose

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::dca::composer;
use crate::dca::error::DcaResult;
use crate::dca::frequency;
use crate::dca::monte_carlo::{MonteCarloSimulator, DEFAULT_SIMULATIONS};
use crate::dca::validation;
use crate::dca::volatility;
use crate::models::price::PriceSeries;
use crate::models::strategy::{StrategyRequest, StrategyResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizerConfig {
    pub simulations: usize,
    /// Fixed seed for reproducible results; entropy when unset
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            simulations: DEFAULT_SIMULATIONS,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DcaOptimizer {
    config: OptimizerConfig,
    simulator: MonteCarloSimulator,
}

impl DcaOptimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self {
            config,
            simulator: MonteCarloSimulator::new(config.simulations),
        }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Optimize using the configured seed, or OS entropy when none is set
    pub fn optimize(
        &self,
        prices: &PriceSeries,
        request: &StrategyRequest,
    ) -> DcaResult<StrategyResult> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.optimize_with_rng(prices, request, &mut rng)
    }

    /// Optimize drawing all simulation randomness from `rng`
    pub fn optimize_with_rng<R: Rng + ?Sized>(
        &self,
        prices: &PriceSeries,
        request: &StrategyRequest,
        rng: &mut R,
    ) -> DcaResult<StrategyResult> {
        validation::validate_for_optimization(prices.as_slice())?;
        request.validate()?;

        let analysis = volatility::analyze(prices.as_slice())?;
        let plan = frequency::plan(analysis.volatility, request)?;

        debug!(
            volatility = analysis.volatility,
            frequency = %plan.frequency,
            total_purchases = plan.total_purchases,
            amount_per_purchase = plan.amount_per_purchase,
            "Purchase plan selected"
        );

        let summary = self
            .simulator
            .simulate(&analysis.returns, prices.last_price(), &plan, rng)?;

        let result = composer::compose(
            &plan,
            analysis.volatility,
            request.risk_tolerance,
            summary.median_return,
        )?;

        info!(
            risk_tolerance = %request.risk_tolerance,
            frequency = %result.frequency,
            amount_per_purchase = result.amount_per_purchase,
            expected_return_pct = result.expected_return_pct,
            risk_score = result.risk_score,
            "DCA strategy optimized"
        );

        Ok(result)
    }
}
