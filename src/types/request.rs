//! Request envelope types.
//!
//! A request is either a *relay* (routed through an already deployed smart
//! wallet) or a *deploy* (creates the wallet in the same transaction). The
//! two variants are decided once at ingestion into [`EnvelopingRequest`] and
//! stay typed from then on; they drive different simulation targets on the
//! relay hub.

use alloy::primitives::{Address, B256, Bytes, U256};
use serde::{Deserialize, Serialize};

/// The user's intended call, forwarded through an existing smart wallet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardRequest {
    /// Relay hub the request is addressed to.
    pub relay_hub: Address,
    /// Owner of the smart wallet.
    pub from: Address,
    /// Destination of the forwarded call.
    pub to: Address,
    /// Token the user pays the relay with.
    pub token_contract: Address,
    /// Native value forwarded with the call.
    #[serde(default)]
    pub value: U256,
    /// Gas the user declares the forwarded call needs.
    pub gas: U256,
    /// Smart wallet nonce.
    pub nonce: U256,
    /// Token amount the user agrees to pay.
    #[serde(default)]
    pub token_amount: U256,
    /// Pre-computed gas cost of the token payment; zero when the user leaves
    /// the estimation to the relay.
    #[serde(default)]
    pub token_gas: U256,
    /// Forwarded call data.
    #[serde(default)]
    pub data: Bytes,
}

/// The user's intended call plus the wallet deployment it rides on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequestStruct {
    /// Relay hub the request is addressed to.
    pub relay_hub: Address,
    /// Owner of the smart wallet to deploy.
    pub from: Address,
    /// Destination of the optional initialization call.
    pub to: Address,
    /// Token the user pays the relay with.
    pub token_contract: Address,
    /// Recovery address of the new wallet.
    pub recoverer: Address,
    /// Native value forwarded with the call.
    #[serde(default)]
    pub value: U256,
    /// Factory nonce.
    pub nonce: U256,
    /// Token amount the user agrees to pay.
    #[serde(default)]
    pub token_amount: U256,
    /// Pre-computed gas cost of the token payment; zero when the user leaves
    /// the estimation to the relay.
    #[serde(default)]
    pub token_gas: U256,
    /// Creation index, part of the counterfactual wallet address.
    pub index: U256,
    /// Initialization call data.
    #[serde(default)]
    pub data: Bytes,
}

/// Shared transaction context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayData {
    /// Gas price the relayed transaction will be broadcast with.
    pub gas_price: U256,
    /// EIP-712 domain separator of the forwarder.
    pub domain_separator: B256,
    /// The worker address that will sign and broadcast the transaction.
    pub relay_worker: Address,
    /// The forwarder executing the call: the smart wallet for relays, the
    /// wallet factory for deploys.
    pub call_forwarder: Address,
    /// Verifier contract approving the request.
    pub call_verifier: Address,
}

/// A relay request: payload plus shared context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayRequest {
    /// The forwarded call.
    pub request: ForwardRequest,
    /// Shared transaction context.
    pub relay_data: RelayData,
}

/// A deploy request: payload plus shared context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    /// The wallet deployment payload.
    pub request: DeployRequestStruct,
    /// Shared transaction context.
    pub relay_data: RelayData,
}

/// A relay or deploy request.
///
/// Deserialization is decided by the payload shape: deploy payloads carry
/// `recoverer` and `index`, relay payloads carry `gas`. The variants are
/// mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvelopingRequest {
    /// Deploys the user's smart wallet as part of the transaction.
    Deploy(DeployRequest),
    /// Routes through an existing smart wallet.
    Relay(RelayRequest),
}

impl EnvelopingRequest {
    /// Whether this request deploys a smart wallet.
    pub const fn is_deploy(&self) -> bool {
        matches!(self, Self::Deploy(_))
    }

    /// Shared transaction context of either variant.
    pub const fn relay_data(&self) -> &RelayData {
        match self {
            Self::Deploy(request) => &request.relay_data,
            Self::Relay(request) => &request.relay_data,
        }
    }

    /// The token the user pays with.
    pub const fn token_contract(&self) -> Address {
        match self {
            Self::Deploy(request) => request.request.token_contract,
            Self::Relay(request) => request.request.token_contract,
        }
    }

    /// The token amount the user agrees to pay.
    pub const fn token_amount(&self) -> U256 {
        match self {
            Self::Deploy(request) => request.request.token_amount,
            Self::Relay(request) => request.request.token_amount,
        }
    }

    /// The pre-computed token payment gas, zero when not declared.
    pub const fn token_gas(&self) -> U256 {
        match self {
            Self::Deploy(request) => request.request.token_gas,
            Self::Relay(request) => request.request.token_gas,
        }
    }

    /// The forwarded (or initialization) call data.
    pub const fn data(&self) -> &Bytes {
        match self {
            Self::Deploy(request) => &request.request.data,
            Self::Relay(request) => &request.request.data,
        }
    }
}

/// Post-signing metadata. Irrelevant to estimation, required for execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayMetadata {
    /// Relay hub the signature commits to.
    pub relay_hub_address: Address,
    /// Highest worker nonce the user accepts.
    pub relay_max_nonce: u64,
    /// The user's signature over the request.
    #[serde(default)]
    pub signature: Bytes,
}

/// The submission envelope: a signed relay or deploy request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopingTxRequest {
    /// The relay or deploy request.
    pub relay_request: EnvelopingRequest,
    /// Post-signing metadata.
    pub metadata: RelayMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_variant_is_decided_by_payload_shape() {
        let relay = json!({
            "request": {
                "relayHub": Address::ZERO,
                "from": Address::ZERO,
                "to": Address::ZERO,
                "tokenContract": Address::ZERO,
                "gas": "10000",
                "nonce": "0",
            },
            "relayData": {
                "gasPrice": "60000000",
                "domainSeparator": B256::ZERO,
                "relayWorker": Address::ZERO,
                "callForwarder": Address::ZERO,
                "callVerifier": Address::ZERO,
            },
        });
        let parsed: EnvelopingRequest = serde_json::from_value(relay).unwrap();
        assert!(!parsed.is_deploy());

        let deploy = json!({
            "request": {
                "relayHub": Address::ZERO,
                "from": Address::ZERO,
                "to": Address::ZERO,
                "tokenContract": Address::ZERO,
                "recoverer": Address::ZERO,
                "index": "0",
                "nonce": "0",
            },
            "relayData": {
                "gasPrice": "60000000",
                "domainSeparator": B256::ZERO,
                "relayWorker": Address::ZERO,
                "callForwarder": Address::ZERO,
                "callVerifier": Address::ZERO,
            },
        });
        let parsed: EnvelopingRequest = serde_json::from_value(deploy).unwrap();
        assert!(parsed.is_deploy());
    }
}
