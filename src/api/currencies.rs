use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult, FieldViolation};
use crate::exchange::ExchangeResult;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/currencies/{currency}", get(get_currency))
        .route("/currencies/exchange", post(exchange_currencies))
}

#[derive(Debug, Deserialize)]
struct RatesQuery {
    filter: Option<String>,
}

#[derive(Debug, Serialize)]
struct CurrencyResponse {
    source: String,
    rates: HashMap<String, f64>,
}

async fn get_currency(
    Path(currency): Path<String>,
    Query(query): Query<RatesQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CurrencyResponse>> {
    let filters = parse_filters(query.filter.as_deref());
    let quote = state.currency_service.get_rates(&currency, &filters).await?;
    Ok(Json(CurrencyResponse {
        source: quote.base,
        rates: quote.rates,
    }))
}

/// Comma-separated filter list; blank segments and duplicates collapse away.
fn parse_filters(raw: Option<&str>) -> HashSet<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|symbol| !symbol.is_empty())
        .map(str::to_string)
        .collect()
}

/// Exchange request as it arrives on the wire. Fields stay optional here so
/// one pass of `validate` can report every violation together instead of
/// failing on the first missing field.
#[derive(Debug, Deserialize)]
struct ExchangeRequest {
    #[serde(default)]
    from: String,
    #[serde(default)]
    to: Option<HashSet<String>>,
    #[serde(default)]
    amount: f64,
}

#[derive(Debug)]
struct ValidExchange {
    from: String,
    to: HashSet<String>,
    amount: Decimal,
}

impl ExchangeRequest {
    /// Amounts that cannot be represented in decimal arithmetic are rejected
    /// the same way as non-positive ones.
    fn validate(self) -> Result<ValidExchange, Vec<FieldViolation>> {
        let mut violations = Vec::new();

        if self.from.trim().is_empty() {
            violations.push(FieldViolation::new("from", "From value is mandatory."));
        }

        match &self.to {
            None => violations.push(FieldViolation::new("to", "must not be null")),
            Some(to) if to.is_empty() => violations.push(FieldViolation::new(
                "to",
                "You must select at least one currency to exchange.",
            )),
            Some(_) => {}
        }

        let amount = Decimal::from_f64(self.amount).filter(|a| a.is_sign_positive() && !a.is_zero());
        if amount.is_none() {
            violations.push(FieldViolation::new("amount", "Amount must be positive."));
        }

        match (self.to, amount) {
            (Some(to), Some(amount)) if violations.is_empty() => Ok(ValidExchange {
                from: self.from,
                to,
                amount,
            }),
            _ => Err(violations),
        }
    }
}

#[derive(Serialize)]
struct ExchangeResponse {
    from: String,
    #[serde(flatten)]
    conversions: HashMap<String, ExchangeResult>,
}

async fn exchange_currencies(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExchangeRequest>,
) -> ApiResult<Json<ExchangeResponse>> {
    let request = request.validate().map_err(ApiError::Validation)?;

    let results = state
        .currency_service
        .exchange(&request.from, &request.to, request.amount)
        .await?;

    let conversions = results
        .into_iter()
        .map(|result| (result.to.clone(), result))
        .collect();
    Ok(Json(ExchangeResponse {
        from: request.from,
        conversions,
    }))
}
