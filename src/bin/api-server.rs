//! DCAlytics Optimizer API Server
//!
//! Serves `/optimize-dca`, `/health` and `/metrics`. Price history is loaded
//! at startup and refreshed in the background.

use dcalytics::config::{get_environment, ServiceConfig};
use dcalytics::core::http::start_server;
use dcalytics::logging;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let config = ServiceConfig::from_env();
    let port = config.port;

    info!("Starting DCAlytics Optimizer API Server");
    info!(environment = %get_environment(), "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);
    info!(
        market_data_url = %config.market_data_url,
        asset = %config.market_asset,
        history_days = config.history_days,
        simulations = config.optimizer.simulations,
        cache_enabled = config.cache_enabled(),
        "Optimizer configuration"
    );

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(config).await {
            error!(error = %e, "HTTP server error");
        }
    });

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
