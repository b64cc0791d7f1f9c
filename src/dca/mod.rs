//! DCA strategy optimization engine.

pub mod composer;
pub mod engine;
pub mod error;
pub mod frequency;
pub mod monte_carlo;
pub mod validation;
pub mod volatility;

pub use engine::{DcaOptimizer, OptimizerConfig};
pub use error::{DcaError, DcaResult};
pub use monte_carlo::{MonteCarloSimulator, ReturnModel, SimulationSummary};
pub use volatility::VolatilityAnalysis;
