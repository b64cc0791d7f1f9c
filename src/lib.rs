//! DCAlytics optimizer: recommends a dollar-cost-averaging cadence and
//! purchase size from historical prices, with a Monte Carlo return estimate.

pub mod cache;
pub mod common;
pub mod config;
pub mod core;
pub mod dca;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
