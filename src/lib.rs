pub mod api;
pub mod config;
pub mod error;
pub mod exchange;
pub mod log;
pub mod providers;
pub mod rate_provider;
pub mod registry;
pub mod service;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::AppState;
use crate::providers::coingecko::CoinGeckoProvider;
use crate::registry::SymbolRegistry;
use crate::service::CurrencyService;

/// Loads configuration, wires the provider stack and serves the HTTP API
/// until the process stops.
pub async fn run(config_path: Option<&str>) -> Result<()> {
    info!("coinrelay starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    if config.coingecko.api_key.is_empty() {
        warn!("No CoinGecko API key configured; requests may be throttled upstream");
    }

    let registry = Arc::new(SymbolRegistry::new());
    let provider = CoinGeckoProvider::new(&config.coingecko, Arc::clone(&registry));
    provider.warm_up().await;

    let state = Arc::new(AppState {
        currency_service: CurrencyService::new(Arc::new(provider)),
    });
    let router = api::app_router(state);

    let addr = config.server.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on {addr}");
    axum::serve(listener, router).await?;
    Ok(())
}
