use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

use crate::error::ProviderError;

/// Exchange rates for one base currency against a set of target symbols.
#[derive(Debug, Clone, PartialEq)]
pub struct RateQuote {
    /// Canonical id of the base currency, e.g. "bitcoin".
    pub base: String,
    /// Rate per target symbol, e.g. "usd" -> 40000.0.
    pub rates: HashMap<String, f64>,
}

/// Source of exchange rates for a base currency.
///
/// An empty filter set asks for the source's default, unfiltered rate set.
/// Implementations validate the currency id against their supported-currency
/// registry before going to the network.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(
        &self,
        currency: &str,
        filters: &HashSet<String>,
    ) -> Result<RateQuote, ProviderError>;
}
