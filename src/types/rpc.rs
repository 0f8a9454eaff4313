//! Wire types of the `relay_` namespace.

use alloy::primitives::{Address, B256};
use serde::{Deserialize, Serialize};

/// Status response describing relay readiness, addresses and chain identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingResponse {
    /// Relay worker address.
    pub relay_worker_address: Address,
    /// Relay manager address.
    pub relay_manager_address: Address,
    /// Relay hub address.
    pub relay_hub_address: Address,
    /// Minimum gas price of the current network.
    pub min_gas_price: String,
    /// Chain id of the network.
    pub chain_id: String,
    /// Network id of the network.
    pub network_id: String,
    /// Whether the server is ready to relay transactions.
    pub ready: bool,
    /// Server version in semver format.
    pub version: String,
}

/// The quoted total gas the user will be charged for, fee inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasEstimationResult {
    /// Decimal string representation of the estimation.
    pub estimation: String,
}

/// Acknowledgement for an admitted and dispatched transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayTransactionResponse {
    /// Hash of the broadcast transaction.
    pub transaction_hash: B256,
}
