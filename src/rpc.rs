//! The `relay_` namespace.
//!
//! - `relay_ping` describes relay readiness, addresses and chain identity.
//! - `relay_estimateMaxPossibleGas` quotes the total gas a request will be
//!   charged for.
//! - `relay_relayTransaction` admits a signed request through the gate and
//!   hands it to the transaction dispatcher.

use crate::{
    config::BlockchainConfig,
    error::{RelayError, ToRpcResult},
    interactor::ContractInteractor,
    relay::RelayServer,
    types::{EnvelopingTxRequest, GasEstimationResult, PingResponse, RelayTransactionResponse},
    version::RELAY_VERSION,
};
use alloy::primitives::B256;
use jsonrpsee::{
    core::{RpcResult, async_trait},
    proc_macros::rpc,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument};

/// Signing, broadcast and persistence peer.
///
/// Receives an admitted envelope together with the enforced gas figure and
/// returns the hash of the broadcast transaction. Worker key custody, nonce
/// sequencing and the retry record live behind this trait.
#[async_trait]
pub trait TransactionDispatcher: Send + Sync {
    /// Signs, broadcasts and persists the admitted request.
    async fn dispatch(
        &self,
        envelope: &EnvelopingTxRequest,
        max_possible_gas: Decimal,
    ) -> eyre::Result<B256>;
}

/// Relay RPC interface.
#[rpc(server, namespace = "relay")]
pub trait RelayApi {
    /// Status of the relay.
    #[method(name = "ping")]
    async fn ping(&self) -> RpcResult<PingResponse>;

    /// Quotes the total gas a request will be charged for, fee inclusive.
    #[method(name = "estimateMaxPossibleGas")]
    async fn estimate_max_possible_gas(
        &self,
        request: EnvelopingTxRequest,
    ) -> RpcResult<GasEstimationResult>;

    /// Admits a signed request and dispatches it on-chain.
    #[method(name = "relayTransaction")]
    async fn relay_transaction(
        &self,
        request: EnvelopingTxRequest,
    ) -> RpcResult<RelayTransactionResponse>;
}

/// The `relay_` namespace implementation.
pub struct Relay {
    server: RelayServer,
    interactor: Arc<dyn ContractInteractor>,
    blockchain: BlockchainConfig,
    dispatcher: Option<Arc<dyn TransactionDispatcher>>,
}

impl Relay {
    /// Creates the RPC surface over the admission engine.
    ///
    /// Without a dispatcher the relay runs in estimation-only mode:
    /// submissions are rejected, ping reports not ready.
    pub fn new(
        server: RelayServer,
        interactor: Arc<dyn ContractInteractor>,
        blockchain: BlockchainConfig,
        dispatcher: Option<Arc<dyn TransactionDispatcher>>,
    ) -> Self {
        Self { server, interactor, blockchain, dispatcher }
    }
}

#[async_trait]
impl RelayApiServer for Relay {
    #[instrument(skip_all)]
    async fn ping(&self) -> RpcResult<PingResponse> {
        let chain_id =
            self.interactor.chain_id().await.map_err(RelayError::from).to_rpc_result()?;
        let network_id =
            self.interactor.network_id().await.map_err(RelayError::from).to_rpc_result()?;
        let min_gas_price = self
            .interactor
            .network_gas_price()
            .await
            .map_err(RelayError::from)
            .to_rpc_result()?;

        Ok(PingResponse {
            relay_worker_address: self.blockchain.relay_worker,
            relay_manager_address: self.blockchain.relay_manager,
            relay_hub_address: self.blockchain.relay_hub,
            min_gas_price: min_gas_price.to_string(),
            chain_id: chain_id.to_string(),
            network_id,
            ready: self.dispatcher.is_some(),
            version: RELAY_VERSION.to_string(),
        })
    }

    #[instrument(skip_all)]
    async fn estimate_max_possible_gas(
        &self,
        request: EnvelopingTxRequest,
    ) -> RpcResult<GasEstimationResult> {
        self.server.estimate_max_possible_gas(&request).await.to_rpc_result()
    }

    #[instrument(skip_all)]
    async fn relay_transaction(
        &self,
        request: EnvelopingTxRequest,
    ) -> RpcResult<RelayTransactionResponse> {
        let Some(dispatcher) = &self.dispatcher else {
            return Err(RelayError::DispatchUnavailable.into());
        };

        let max_possible_gas =
            self.server.get_max_possible_gas(&request).await.to_rpc_result()?;
        let transaction_hash = dispatcher
            .dispatch(&request, max_possible_gas)
            .await
            .map_err(RelayError::InternalError)
            .to_rpc_result()?;

        info!(%transaction_hash, %max_possible_gas, "relayed transaction");
        Ok(RelayTransactionResponse { transaction_hash })
    }
}
