//! Relay configuration.

use crate::{
    constants::DEFAULT_MAX_ESTIMATED_GAS_DEVIATION,
    estimation::{EstimationStrategy, LinearFitModel},
    price::{CoinGeckoRateSource, ExchangeRateSource, FixedRateSource},
};
use alloy::primitives::Address;
use eyre::Context;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{
    collections::{HashMap, HashSet},
    net::{IpAddr, Ipv4Addr},
    path::Path,
    sync::Arc,
};
use tracing::info;
use url::Url;

/// Relay configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Application-level fee and admission configuration.
    #[serde(default)]
    pub app: AppConfig,
    /// Chain access configuration.
    #[serde(default)]
    pub blockchain: BlockchainConfig,
    /// Exchange rate source configuration.
    #[serde(default)]
    pub rates: RateSourceConfig,
}

impl RelayConfig {
    /// Loads the configuration from `path`, writing and returning the
    /// defaults when the file does not exist yet.
    pub fn load(path: &Path) -> eyre::Result<Self> {
        if path.exists() {
            let raw = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("could not read config at {}", path.display()))?;
            serde_yaml::from_str(&raw)
                .wrap_err_with(|| format!("could not parse config at {}", path.display()))
        } else {
            info!(path = %path.display(), "configuration file missing, writing defaults");
            let config = Self::default();
            std::fs::write(path, serde_yaml::to_string(&config)?)
                .wrap_err_with(|| format!("could not write config to {}", path.display()))?;
            Ok(config)
        }
    }

    /// Sets the IP address to serve the RPC on.
    pub fn with_address(mut self, address: IpAddr) -> Self {
        self.server.address = address;
        self
    }

    /// Sets the port to serve the RPC on.
    pub fn with_port(mut self, port: u16) -> Self {
        self.server.port = port;
        self
    }

    /// Sets the chain RPC endpoint.
    pub fn with_rpc_url(mut self, rpc_url: Url) -> Self {
        self.blockchain.rpc_url = rpc_url;
        self
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// The address to serve the RPC on.
    pub address: IpAddr,
    /// The port to serve the RPC on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::LOCALHOST), port: 8090 }
    }
}

/// Fee and admission configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Fee charged as a fraction of the base gas estimate. Zero disables
    /// the gas fee.
    pub gas_fee_percentage: Decimal,
    /// Fee charged as a fraction of the transferred token value when the
    /// forwarded call is a recognized ERC20 transfer. Takes priority over
    /// the gas fee; unset or zero falls back to it.
    pub transfer_fee_percentage: Option<Decimal>,
    /// Tolerated deviation between declared and estimated gas before a
    /// relay request is rejected.
    pub max_estimated_gas_deviation: Decimal,
    /// Verifiers whose requests are relayed free of charge.
    pub sponsored_verifiers: HashSet<Address>,
    /// The gas estimation strategy quoted and enforced by this instance.
    pub estimation_strategy: EstimationStrategy,
    /// Linear-fit model parameters, used by the linear-fit strategy.
    pub linear_fit: LinearFitModel,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gas_fee_percentage: Decimal::ZERO,
            transfer_fee_percentage: None,
            max_estimated_gas_deviation: DEFAULT_MAX_ESTIMATED_GAS_DEVIATION,
            sponsored_verifiers: HashSet::new(),
            estimation_strategy: EstimationStrategy::default(),
            linear_fit: LinearFitModel::default(),
        }
    }
}

/// Chain access configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// The RPC endpoint of the chain node.
    pub rpc_url: Url,
    /// The relay hub simulations run against.
    pub relay_hub: Address,
    /// The worker address simulations are sent from. Custody of the worker
    /// key lives outside this service.
    pub relay_worker: Address,
    /// The manager address advertised in ping responses.
    pub relay_manager: Address,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: Url::parse("http://127.0.0.1:8545").expect("static url"),
            relay_hub: Address::ZERO,
            relay_worker: Address::ZERO,
            relay_manager: Address::ZERO,
        }
    }
}

/// Exchange rate source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateSourceConfig {
    /// Operator-pinned rates by token symbol. When non-empty, these answer
    /// every lookup and no external source is queried.
    pub fixed_rates: HashMap<String, Decimal>,
    /// Token symbol to CoinGecko coin id.
    pub coin_ids: HashMap<String, String>,
    /// CoinGecko id of the currency rates are quoted in.
    pub vs_currency: String,
}

impl Default for RateSourceConfig {
    fn default() -> Self {
        Self { fixed_rates: HashMap::new(), coin_ids: HashMap::new(), vs_currency: "eth".into() }
    }
}

impl RateSourceConfig {
    /// Builds the configured exchange rate source.
    pub fn source(&self) -> Arc<dyn ExchangeRateSource> {
        if self.fixed_rates.is_empty() {
            Arc::new(CoinGeckoRateSource::new(self.coin_ids.clone(), self.vs_currency.clone()))
        } else {
            Arc::new(FixedRateSource::new(self.fixed_rates.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn defaults_charge_no_fee() {
        let config = AppConfig::default();
        assert_eq!(config.gas_fee_percentage, Decimal::ZERO);
        assert!(config.transfer_fee_percentage.is_none());
        assert_eq!(config.max_estimated_gas_deviation, dec!(0.2));
        assert_eq!(config.estimation_strategy, EstimationStrategy::Standard);
    }

    #[test]
    fn roundtrip() {
        let file = tempfile::NamedTempFile::new().unwrap();
        // First load writes the defaults, second load reads them back.
        std::fs::remove_file(file.path()).unwrap();
        let written = RelayConfig::load(file.path()).unwrap();
        let reloaded = RelayConfig::load(file.path()).unwrap();

        assert_eq!(
            serde_yaml::to_string(&written).unwrap(),
            serde_yaml::to_string(&reloaded).unwrap()
        );
    }
}
