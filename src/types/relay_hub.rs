//! Relay hub and smart wallet factory bindings.

use crate::types::request;
use alloy::sol;

sol! {
    /// Forwarded execution payload of a relay request.
    #[derive(Debug)]
    struct ForwardRequest {
        address relayHub;
        address from;
        address to;
        address tokenContract;
        uint256 value;
        uint256 gas;
        uint256 nonce;
        uint256 tokenAmount;
        uint256 tokenGas;
        bytes data;
    }

    /// Wallet creation payload of a deploy request.
    #[derive(Debug)]
    struct DeployRequestStruct {
        address relayHub;
        address from;
        address to;
        address tokenContract;
        address recoverer;
        uint256 value;
        uint256 nonce;
        uint256 tokenAmount;
        uint256 tokenGas;
        uint256 index;
        bytes data;
    }

    /// Shared transaction context.
    #[derive(Debug)]
    struct RelayData {
        uint256 gasPrice;
        bytes32 domainSeparator;
        address relayWorker;
        address callForwarder;
        address callVerifier;
    }

    #[derive(Debug)]
    struct RelayRequest {
        ForwardRequest request;
        RelayData relayData;
    }

    #[derive(Debug)]
    struct DeployRequest {
        DeployRequestStruct request;
        RelayData relayData;
    }

    #[sol(rpc)]
    #[derive(Debug)]
    interface IRelayHub {
        function relayCall(RelayRequest relayRequest, bytes signature) external;
        function deployCall(DeployRequest deployRequest, bytes signature) external;
    }

    #[sol(rpc)]
    #[derive(Debug)]
    interface ISmartWalletFactory {
        function getSmartWalletAddress(address owner, address recoverer, uint256 index) external view returns (address);
    }
}

impl From<&request::RelayData> for RelayData {
    fn from(data: &request::RelayData) -> Self {
        Self {
            gasPrice: data.gas_price,
            domainSeparator: data.domain_separator,
            relayWorker: data.relay_worker,
            callForwarder: data.call_forwarder,
            callVerifier: data.call_verifier,
        }
    }
}

impl From<&request::RelayRequest> for RelayRequest {
    fn from(request: &request::RelayRequest) -> Self {
        let payload = &request.request;
        Self {
            request: ForwardRequest {
                relayHub: payload.relay_hub,
                from: payload.from,
                to: payload.to,
                tokenContract: payload.token_contract,
                value: payload.value,
                gas: payload.gas,
                nonce: payload.nonce,
                tokenAmount: payload.token_amount,
                tokenGas: payload.token_gas,
                data: payload.data.clone(),
            },
            relayData: (&request.relay_data).into(),
        }
    }
}

impl From<&request::DeployRequest> for DeployRequest {
    fn from(request: &request::DeployRequest) -> Self {
        let payload = &request.request;
        Self {
            request: DeployRequestStruct {
                relayHub: payload.relay_hub,
                from: payload.from,
                to: payload.to,
                tokenContract: payload.token_contract,
                recoverer: payload.recoverer,
                value: payload.value,
                nonce: payload.nonce,
                tokenAmount: payload.token_amount,
                tokenGas: payload.token_gas,
                index: payload.index,
                data: payload.data.clone(),
            },
            relayData: (&request.relay_data).into(),
        }
    }
}
