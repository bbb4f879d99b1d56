//! Fee-adjusted conversion of one amount into many target currencies.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Serialize;
use tracing::warn;

use crate::rate_provider::RateQuote;

/// Fee charged on every exchange, as a fraction of the input amount.
#[derive(Debug, Clone, Copy)]
pub struct ConversionPolicy {
    pub fee_rate: Decimal,
}

impl Default for ConversionPolicy {
    fn default() -> Self {
        // 1% of the input amount.
        ConversionPolicy {
            fee_rate: Decimal::new(1, 2),
        }
    }
}

/// Outcome of exchanging an amount into one target currency.
///
/// All figures are decimal; they only become floats at serialization time.
/// The target symbol is skipped in the body because responses key the
/// outcome map by it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeResult {
    #[serde(skip)]
    pub to: String,
    pub rate: Decimal,
    pub amount: Decimal,
    pub result: Decimal,
    pub fee: Decimal,
}

/// Converts `amount` into every rate entry of `quote`, deducting the policy
/// fee from the amount before applying each rate.
///
/// Entries are independent of each other and an empty quote yields an empty
/// vec. Rates come through as-is, including zero or negative values. The one
/// exception is a rate or product that cannot be represented in decimal
/// arithmetic; such entries are logged and dropped.
pub fn convert(amount: Decimal, policy: ConversionPolicy, quote: &RateQuote) -> Vec<ExchangeResult> {
    quote
        .rates
        .iter()
        .filter_map(|(symbol, rate)| exchange_into(amount, policy.fee_rate, symbol, *rate))
        .collect()
}

fn exchange_into(amount: Decimal, fee_rate: Decimal, to: &str, rate: f64) -> Option<ExchangeResult> {
    let Some(rate) = Decimal::from_f64(rate) else {
        warn!(to, rate, "Skipping rate that cannot be represented as a decimal");
        return None;
    };

    let fee = amount * fee_rate;
    let after_fee = amount - fee;
    let Some(result) = after_fee.checked_mul(rate) else {
        warn!(to, %rate, "Skipping conversion that overflows the decimal range");
        return None;
    };

    Some(ExchangeResult {
        to: to.to_string(),
        rate,
        amount,
        result,
        fee,
    })
}
