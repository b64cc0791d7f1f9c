//! Unit tests for environment configuration

use dcalytics::config::ServiceConfig;
use std::env;
use std::time::Duration;

#[test]
fn test_defaults() {
    let config = ServiceConfig::default();

    assert_eq!(config.port, 8001);
    assert_eq!(config.market_data_url, "http://localhost:5000");
    assert_eq!(config.market_asset, "bitcoin");
    assert_eq!(config.history_days, 365);
    assert_eq!(config.snapshot_refresh, Duration::from_secs(3600));
    assert_eq!(config.optimizer.simulations, 1000);
    assert_eq!(config.optimizer.seed, None);
    assert_eq!(config.cache_ttl, Duration::from_secs(300));
    assert_eq!(config.cache_capacity, 1024);
    assert_eq!(config.optimization_timeout, Duration::from_millis(10_000));
    assert!(config.cache_enabled());
}

#[test]
fn test_from_env_overrides() {
    env::set_var("PORT", "not-a-port");
    env::set_var("MONTE_CARLO_SIMULATIONS", "0");
    env::set_var("MONTE_CARLO_SEED", "1234");
    env::set_var("STRATEGY_CACHE_TTL_SECONDS", "0");
    env::set_var("PRICE_HISTORY_DAYS", " 90 ");

    let config = ServiceConfig::from_env();

    env::remove_var("PORT");
    env::remove_var("MONTE_CARLO_SIMULATIONS");
    env::remove_var("MONTE_CARLO_SEED");
    env::remove_var("STRATEGY_CACHE_TTL_SECONDS");
    env::remove_var("PRICE_HISTORY_DAYS");

    assert_eq!(config.port, 8001);
    assert_eq!(config.optimizer.simulations, 1);
    assert_eq!(config.optimizer.seed, Some(1234));
    assert_eq!(config.history_days, 90);
    assert!(!config.cache_enabled());
}
