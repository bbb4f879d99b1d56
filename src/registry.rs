use std::collections::HashMap;
use std::future::Future;

use anyhow::Result;
use tokio::sync::OnceCell;
use tracing::{debug, error};

/// Process-wide mapping of currency ids ("bitcoin") to trading symbols ("btc").
///
/// The registry starts empty and is filled from the rate source at most once:
/// concurrent first uses are serialized by the cell instead of racing
/// duplicate listing fetches, and a failed or empty population leaves the
/// registry empty so the next use retries. Once it holds data it is never
/// refreshed.
pub struct SymbolRegistry {
    symbols: OnceCell<HashMap<String, String>>,
}

impl SymbolRegistry {
    pub fn new() -> Self {
        SymbolRegistry {
            symbols: OnceCell::new(),
        }
    }

    /// Fills the registry through `load` unless it already holds data.
    ///
    /// A load failure is logged and swallowed here; callers treat the listing
    /// as a best-effort warm-up and decide per lookup what a miss means. A
    /// load that yields no entries counts as failed, keeping "populated"
    /// equivalent to "non-empty".
    pub async fn populate_if_empty<F, Fut>(&self, load: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<HashMap<String, String>>>,
    {
        let result = self
            .symbols
            .get_or_try_init(|| async {
                let symbols = load().await?;
                if symbols.is_empty() {
                    anyhow::bail!("currency listing is empty");
                }
                Ok(symbols)
            })
            .await;

        match result {
            Ok(symbols) => debug!("Registry holds {} supported currencies", symbols.len()),
            Err(e) => error!(error = %e, "Cannot initialize supported currencies"),
        }
    }

    /// Whether `currency_id` is a known supported currency.
    pub fn contains(&self, currency_id: &str) -> bool {
        self.symbols
            .get()
            .is_some_and(|map| map.contains_key(currency_id))
    }

    /// Trading symbol for a currency id, if the id is known.
    pub fn symbol(&self, currency_id: &str) -> Option<&str> {
        self.symbols
            .get()
            .and_then(|map| map.get(currency_id))
            .map(String::as_str)
    }

    pub fn is_populated(&self) -> bool {
        self.symbols.get().is_some()
    }
}

impl Default for SymbolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
