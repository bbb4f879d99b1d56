use std::collections::HashSet;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::error::ProviderError;
use crate::exchange::{self, ConversionPolicy, ExchangeResult};
use crate::rate_provider::{RateProvider, RateQuote};

/// Answers rate and exchange requests by composing the injected rate
/// provider with the conversion engine.
pub struct CurrencyService {
    provider: Arc<dyn RateProvider>,
    policy: ConversionPolicy,
}

impl CurrencyService {
    pub fn new(provider: Arc<dyn RateProvider>) -> Self {
        CurrencyService {
            provider,
            policy: ConversionPolicy::default(),
        }
    }

    /// Current rates for one base currency, optionally narrowed to a set of
    /// target symbols.
    pub async fn get_rates(
        &self,
        currency: &str,
        filters: &HashSet<String>,
    ) -> Result<RateQuote, ProviderError> {
        self.provider.fetch_rates(currency, filters).await
    }

    /// Converts `amount` of `from` into every currency in `to`.
    ///
    /// One provider fetch covers all targets. Callers reject empty target
    /// sets and non-positive amounts before getting here; outcomes come back
    /// in no particular order.
    pub async fn exchange(
        &self,
        from: &str,
        to: &HashSet<String>,
        amount: Decimal,
    ) -> Result<Vec<ExchangeResult>, ProviderError> {
        let quote = self.provider.fetch_rates(from, to).await?;
        Ok(exchange::convert(amount, self.policy, &quote))
    }
}
