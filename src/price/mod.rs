//! Exchange rate lookup.
//!
//! The fee engine converts token values into native currency through an
//! [`ExchangeRateSource`]. Rates are assumed current at call time; this
//! engine imposes no caching contract on the source.

mod coingecko;
pub use coingecko::CoinGeckoRateSource;

use crate::error::PriceError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Source of token-to-native exchange rates, keyed by token symbol.
#[async_trait]
pub trait ExchangeRateSource: Send + Sync {
    /// The current amount of native currency one whole token is worth.
    async fn rate_of(&self, symbol: &str) -> Result<Decimal, PriceError>;
}

/// Fixed rate table, for tests and operator-pinned deployments.
#[derive(Debug, Clone, Default)]
pub struct FixedRateSource {
    rates: HashMap<String, Decimal>,
}

impl FixedRateSource {
    /// Creates a source answering from the given table.
    pub fn new(rates: HashMap<String, Decimal>) -> Self {
        Self { rates }
    }
}

#[async_trait]
impl ExchangeRateSource for FixedRateSource {
    async fn rate_of(&self, symbol: &str) -> Result<Decimal, PriceError> {
        self.rates
            .get(symbol)
            .copied()
            .ok_or_else(|| PriceError::UnavailableRate(symbol.to_string()))
    }
}
