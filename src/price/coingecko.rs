use crate::{error::PriceError, price::ExchangeRateSource};
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use std::{collections::HashMap, time::Duration};
use tracing::trace;

/// Base URL of the CoinGecko simple price API.
const SIMPLE_PRICE_URL: &str = "https://api.coingecko.com/api/v3/simple/price";

/// Request timeout for rate lookups.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// CoinGecko-backed [`ExchangeRateSource`].
///
/// Token symbols are mapped to CoinGecko coin ids through a configured
/// table; the rate is quoted against the native currency's id. Responses
/// are deserialized straight into [`Decimal`] from the raw JSON number, so
/// the rate never rounds through a float.
#[derive(Debug, Clone)]
pub struct CoinGeckoRateSource {
    client: Client,
    /// Token symbol to CoinGecko coin id.
    coin_ids: HashMap<String, String>,
    /// CoinGecko id of the currency rates are quoted in.
    vs_currency: String,
}

impl CoinGeckoRateSource {
    /// Creates a rate source for the given symbol-to-id table, quoting
    /// against `vs_currency`.
    pub fn new(coin_ids: HashMap<String, String>, vs_currency: String) -> Self {
        let client = Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .expect("reqwest client with static configuration");
        Self { client, coin_ids, vs_currency }
    }
}

#[async_trait]
impl ExchangeRateSource for CoinGeckoRateSource {
    async fn rate_of(&self, symbol: &str) -> Result<Decimal, PriceError> {
        let id = self
            .coin_ids
            .get(symbol)
            .ok_or_else(|| PriceError::UnavailableRate(symbol.to_string()))?;

        let url =
            format!("{SIMPLE_PRICE_URL}?ids={id}&vs_currencies={}", self.vs_currency);
        let response: HashMap<String, HashMap<String, Decimal>> = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| PriceError::Fetch(err.to_string()))?
            .error_for_status()
            .map_err(|err| PriceError::Fetch(err.to_string()))?
            .json()
            .await
            .map_err(|err| PriceError::Fetch(err.to_string()))?;

        let rate = response
            .get(id)
            .and_then(|quotes| quotes.get(&self.vs_currency))
            .copied()
            .ok_or_else(|| PriceError::UnavailableRate(symbol.to_string()))?;

        trace!(%symbol, %rate, "fetched exchange rate");
        Ok(rate)
    }
}
