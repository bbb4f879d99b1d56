use anyhow::Result;
use async_trait::async_trait;
use reqwest::header;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, instrument};

use crate::config::CoinGeckoConfig;
use crate::error::ProviderError;
use crate::rate_provider::{RateProvider, RateQuote};
use crate::registry::SymbolRegistry;

const API_KEY_HEADER: &str = "x-cg-demo-api-key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const COMMUNICATION_FAILURE: &str = "Problem during communication with the CoinGecko API.";

fn communication_failure() -> ProviderError {
    ProviderError::Upstream(COMMUNICATION_FAILURE.to_string())
}

/// Rate provider backed by the CoinGecko simple-price API.
///
/// Currency ids are checked against the shared symbol registry before any
/// price request goes out; the registry itself is filled from the CoinGecko
/// listing endpoint on first use.
pub struct CoinGeckoProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
    registry: Arc<SymbolRegistry>,
}

// Entry of the /coins/list response. Remaining fields are ignored.
#[derive(Deserialize, Debug)]
struct CurrencyListing {
    id: String,
    symbol: String,
}

impl CoinGeckoProvider {
    pub fn new(config: &CoinGeckoConfig, registry: Arc<SymbolRegistry>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("coinrelay/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        CoinGeckoProvider {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            client,
            registry,
        }
    }

    /// Best-effort registry bootstrap for startup. A failure is only logged;
    /// the registry then populates lazily on first use.
    pub async fn warm_up(&self) {
        self.registry
            .populate_if_empty(|| self.list_currencies())
            .await;
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .header(API_KEY_HEADER, &self.api_key)
    }

    fn price_url(&self, currency_id: &str, filters: &HashSet<String>) -> String {
        let targets = filters
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{}/simple/price?ids={}&vs_currencies={}",
            self.base_url, currency_id, targets
        )
    }

    async fn list_currencies(&self) -> Result<HashMap<String, String>> {
        let url = format!("{}/coins/list", self.base_url);
        debug!("Requesting the supported currency listing from {}", url);

        let response = self.get(&url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("listing request returned HTTP {}", response.status());
        }

        let listings: Vec<CurrencyListing> = response.json().await?;
        Ok(listings
            .into_iter()
            .map(|listing| (listing.id, listing.symbol))
            .collect())
    }
}

#[async_trait]
impl RateProvider for CoinGeckoProvider {
    #[instrument(
        name = "CoinGeckoRates",
        skip(self, filters),
        fields(currency = %currency)
    )]
    async fn fetch_rates(
        &self,
        currency: &str,
        filters: &HashSet<String>,
    ) -> Result<RateQuote, ProviderError> {
        self.registry
            .populate_if_empty(|| self.list_currencies())
            .await;
        if !self.registry.contains(currency) {
            return Err(ProviderError::UnsupportedCurrency(currency.to_string()));
        }

        let url = self.price_url(currency, filters);
        debug!("Requesting rates from {}", url);

        let response = match self.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Request to the CoinGecko API failed");
                return Err(communication_failure());
            }
        };
        if !response.status().is_success() {
            error!(status = %response.status(), "Unsuccessful response from the CoinGecko API");
            return Err(communication_failure());
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, "Failed to read the CoinGecko response body");
                return Err(communication_failure());
            }
        };
        if body.trim().is_empty() {
            error!("Received an empty response from the CoinGecko API");
            return Err(communication_failure());
        }

        let prices: HashMap<String, HashMap<String, f64>> = match serde_json::from_str(&body) {
            Ok(prices) => prices,
            Err(e) => {
                error!(error = %e, response = %body, "Failed to parse the CoinGecko price response");
                return Err(communication_failure());
            }
        };

        match prices.into_iter().next() {
            Some((base, rates)) => Ok(RateQuote { base, rates }),
            None => {
                error!(response = %body, "CoinGecko price response holds no currency entry");
                Err(communication_failure())
            }
        }
    }
}
