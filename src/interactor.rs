//! Chain RPC collaborator.
//!
//! [`ContractInteractor`] is the seam between the estimation engine and the
//! chain node: raw gas estimation, relay hub simulations, ERC20 resolution
//! and smart wallet address derivation. The engine only consumes the trait;
//! [`AlloyInteractor`] is the production implementation on an alloy
//! [`Provider`].
//!
//! Calls are best-effort, non-retried reads. A transport failure surfaces as
//! [`EstimationError::Rpc`]; retry policy belongs to the calling
//! orchestrator, timeouts to the transport.

use crate::{
    error::EstimationError,
    types::{
        DeployRequest, IERC20, RelayRequest,
        relay_hub::{IRelayHub, ISmartWalletFactory},
    },
};
use alloy::{
    primitives::{Address, Bytes, U256},
    providers::Provider,
    rpc::types::{TransactionInput, TransactionRequest},
};
use async_trait::async_trait;
use tracing::instrument;

/// Parameters for a raw gas estimation of an arbitrary call.
#[derive(Debug, Clone)]
pub struct EstimateGasParams {
    /// Sender of the simulated call.
    pub from: Address,
    /// Destination of the simulated call.
    pub to: Address,
    /// Call data.
    pub data: Bytes,
    /// Gas price the simulation is performed at.
    pub gas_price: U256,
}

/// A resolved ERC20 token.
#[derive(Debug, Clone)]
pub struct Erc20Token {
    /// Contract address.
    pub address: Address,
    /// Token symbol, the key used for exchange rate lookups.
    pub symbol: String,
    /// Declared decimal precision.
    pub decimals: u8,
}

/// Read-only chain access used by the estimation engine.
#[async_trait]
pub trait ContractInteractor: Send + Sync {
    /// Chain id of the connected network.
    async fn chain_id(&self) -> Result<u64, EstimationError>;

    /// Network id of the connected network. Usually but not always equal to
    /// the chain id.
    async fn network_id(&self) -> Result<String, EstimationError>;

    /// Current network gas price, used as the advertised minimum.
    async fn network_gas_price(&self) -> Result<U256, EstimationError>;

    /// Raw `eth_estimateGas` of an arbitrary call. No corrections applied;
    /// callers pick the correction for their context.
    async fn estimate_gas(&self, params: EstimateGasParams) -> Result<u64, EstimationError>;

    /// Simulates `relayCall` on the relay hub with `relay_worker` as sender.
    async fn simulate_relay_call(
        &self,
        request: &RelayRequest,
        signature: &Bytes,
        relay_worker: Address,
    ) -> Result<u64, EstimationError>;

    /// Simulates `deployCall` on the relay hub with `relay_worker` as sender.
    async fn simulate_deploy_call(
        &self,
        request: &DeployRequest,
        signature: &Bytes,
        relay_worker: Address,
    ) -> Result<u64, EstimationError>;

    /// Resolves an ERC20 token's symbol and decimals.
    async fn erc20_token(&self, address: Address) -> Result<Erc20Token, EstimationError>;

    /// Simulates `transfer(to, amount)` on `token` sent from `from`.
    async fn simulate_token_transfer(
        &self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<u64, EstimationError>;

    /// Derives the counterfactual smart wallet address of a deploy request
    /// from its factory (the request's forwarder).
    async fn smart_wallet_address(
        &self,
        request: &DeployRequest,
    ) -> Result<Address, EstimationError>;
}

/// [`ContractInteractor`] implementation on an alloy [`Provider`].
#[derive(Debug, Clone)]
pub struct AlloyInteractor<P> {
    provider: P,
    relay_hub: Address,
}

impl<P> AlloyInteractor<P> {
    /// Creates a new interactor simulating against the given relay hub.
    pub const fn new(provider: P, relay_hub: Address) -> Self {
        Self { provider, relay_hub }
    }
}

fn rpc_err(err: impl std::fmt::Display) -> EstimationError {
    EstimationError::Rpc(err.to_string())
}

#[async_trait]
impl<P> ContractInteractor for AlloyInteractor<P>
where
    P: Provider + Send + Sync,
{
    #[instrument(skip_all)]
    async fn chain_id(&self) -> Result<u64, EstimationError> {
        self.provider.get_chain_id().await.map_err(rpc_err)
    }

    #[instrument(skip_all)]
    async fn network_id(&self) -> Result<String, EstimationError> {
        self.provider.get_net_version().await.map(|id| id.to_string()).map_err(rpc_err)
    }

    #[instrument(skip_all)]
    async fn network_gas_price(&self) -> Result<U256, EstimationError> {
        self.provider.get_gas_price().await.map(U256::from).map_err(rpc_err)
    }

    #[instrument(skip_all)]
    async fn estimate_gas(&self, params: EstimateGasParams) -> Result<u64, EstimationError> {
        let tx = TransactionRequest {
            from: Some(params.from),
            to: Some(params.to.into()),
            gas_price: Some(params.gas_price.saturating_to()),
            input: TransactionInput::new(params.data),
            ..Default::default()
        };
        self.provider.estimate_gas(tx).await.map_err(rpc_err)
    }

    #[instrument(skip_all, fields(worker = %relay_worker))]
    async fn simulate_relay_call(
        &self,
        request: &RelayRequest,
        signature: &Bytes,
        relay_worker: Address,
    ) -> Result<u64, EstimationError> {
        let hub = IRelayHub::new(self.relay_hub, &self.provider);
        hub.relayCall(request.into(), signature.clone())
            .from(relay_worker)
            .estimate_gas()
            .await
            .map_err(rpc_err)
    }

    #[instrument(skip_all, fields(worker = %relay_worker))]
    async fn simulate_deploy_call(
        &self,
        request: &DeployRequest,
        signature: &Bytes,
        relay_worker: Address,
    ) -> Result<u64, EstimationError> {
        let hub = IRelayHub::new(self.relay_hub, &self.provider);
        hub.deployCall(request.into(), signature.clone())
            .from(relay_worker)
            .estimate_gas()
            .await
            .map_err(rpc_err)
    }

    #[instrument(skip_all, fields(token = %address))]
    async fn erc20_token(&self, address: Address) -> Result<Erc20Token, EstimationError> {
        let token = IERC20::new(address, &self.provider);
        let symbol = token.symbol().call().await.map_err(rpc_err)?;
        let decimals = token.decimals().call().await.map_err(rpc_err)?;
        Ok(Erc20Token { address, symbol, decimals })
    }

    #[instrument(skip_all, fields(token = %token))]
    async fn simulate_token_transfer(
        &self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<u64, EstimationError> {
        IERC20::new(token, &self.provider)
            .transfer(to, amount)
            .from(from)
            .estimate_gas()
            .await
            .map_err(rpc_err)
    }

    #[instrument(skip_all)]
    async fn smart_wallet_address(
        &self,
        request: &DeployRequest,
    ) -> Result<Address, EstimationError> {
        // The wallet is not deployed yet; its address is derived by the
        // factory the deploy request names as its forwarder.
        let factory =
            ISmartWalletFactory::new(request.relay_data.call_forwarder, &self.provider);
        factory
            .getSmartWalletAddress(request.request.from, request.request.recoverer, request.request.index)
            .call()
            .await
            .map_err(rpc_err)
    }
}
