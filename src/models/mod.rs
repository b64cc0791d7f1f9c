//! Shared data models spanning the engine and service layers.

pub mod price;
pub mod strategy;

pub use price::{MarketDataPoint, PriceSeries};
pub use strategy::{
    PurchaseFrequency, PurchasePlan, RiskTolerance, StrategyRequest, StrategyResult,
};
