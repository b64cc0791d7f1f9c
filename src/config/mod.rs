//! Environment-driven configuration
//!
//! Every value has a default so the service starts with an empty environment.
//! Binaries load `.env` through `dotenvy` before reading anything here.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::dca::engine::OptimizerConfig;
use crate::dca::monte_carlo::DEFAULT_SIMULATIONS;

const DEFAULT_PORT: u16 = 8001;
const DEFAULT_MARKET_DATA_URL: &str = "http://localhost:5000";
const DEFAULT_MARKET_ASSET: &str = "bitcoin";
const DEFAULT_HISTORY_DAYS: u32 = 365;
const DEFAULT_SNAPSHOT_REFRESH_SECONDS: u64 = 3600;
const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;
const DEFAULT_CACHE_CAPACITY: u64 = 1024;
const DEFAULT_OPTIMIZATION_TIMEOUT_MS: u64 = 10_000;

/// Deployment environment name (`production`, `sandbox`, ...)
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn var_or<T: FromStr>(key: &str, default: T) -> T {
    parse_var(key).unwrap_or(default)
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub market_data_url: String,
    pub market_asset: String,
    pub history_days: u32,
    pub snapshot_refresh: Duration,
    pub optimizer: OptimizerConfig,
    /// Zero disables the strategy cache
    pub cache_ttl: Duration,
    pub cache_capacity: u64,
    pub optimization_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            market_data_url: DEFAULT_MARKET_DATA_URL.to_string(),
            market_asset: DEFAULT_MARKET_ASSET.to_string(),
            history_days: DEFAULT_HISTORY_DAYS,
            snapshot_refresh: Duration::from_secs(DEFAULT_SNAPSHOT_REFRESH_SECONDS),
            optimizer: OptimizerConfig::default(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECONDS),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            optimization_timeout: Duration::from_millis(DEFAULT_OPTIMIZATION_TIMEOUT_MS),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self {
            port: var_or("PORT", DEFAULT_PORT),
            market_data_url: env::var("MARKET_DATA_URL")
                .unwrap_or_else(|_| DEFAULT_MARKET_DATA_URL.to_string()),
            market_asset: env::var("MARKET_ASSET")
                .unwrap_or_else(|_| DEFAULT_MARKET_ASSET.to_string()),
            history_days: var_or("PRICE_HISTORY_DAYS", DEFAULT_HISTORY_DAYS),
            snapshot_refresh: Duration::from_secs(var_or(
                "SNAPSHOT_REFRESH_SECONDS",
                DEFAULT_SNAPSHOT_REFRESH_SECONDS,
            )),
            optimizer: OptimizerConfig {
                simulations: var_or("MONTE_CARLO_SIMULATIONS", DEFAULT_SIMULATIONS).max(1),
                seed: parse_var("MONTE_CARLO_SEED"),
            },
            cache_ttl: Duration::from_secs(var_or(
                "STRATEGY_CACHE_TTL_SECONDS",
                DEFAULT_CACHE_TTL_SECONDS,
            )),
            cache_capacity: var_or("STRATEGY_CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY),
            optimization_timeout: Duration::from_millis(var_or(
                "OPTIMIZATION_TIMEOUT_MS",
                DEFAULT_OPTIMIZATION_TIMEOUT_MS,
            )),
        }
    }

    pub fn cache_enabled(&self) -> bool {
        !self.cache_ttl.is_zero()
    }
}
