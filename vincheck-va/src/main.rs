//! vincheck-va - Vehicle Analysis Microservice
//!
//! Decodes a VIN through local structural tables plus the NHTSA vPIC
//! database, reconciles the two sources into one authoritative record, and
//! generates a purchase analysis for the buyer.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vincheck_va::services::{AnalysisClient, VpicClient};
use vincheck_va::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = vincheck_common::config::load_config("vincheck-va")?;

    // Initialize tracing; RUST_LOG overrides the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting vincheck-va (Vehicle Analysis) microservice");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let api_key = vincheck_va::config::resolve_analysis_api_key(&config)?;

    let vpic = VpicClient::from_config(&config.vpic)
        .map_err(|e| anyhow::anyhow!("Failed to create vPIC client: {}", e))?;
    let analysis = AnalysisClient::from_config(&config.analysis, api_key)
        .map_err(|e| anyhow::anyhow!("Failed to create analysis client: {}", e))?;

    let listen_addr = config.listen_addr.clone();
    let state = AppState::new(config, vpic, analysis);
    let app = vincheck_va::build_router(state);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    info!("Listening on http://{}", listen_addr);
    info!("Health check: http://{}/health", listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
