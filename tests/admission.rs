//! Admission gate integration tests.
//!
//! Drives the quote and enforce entry points end-to-end over mock
//! collaborators: a canned chain interactor and a fixed exchange rate
//! table. The simulated figures are chosen so the base estimate before fees
//! is exactly 100000 gas.

use alloy::primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use enveloping_relay::{
    config::AppConfig,
    error::{AdmissionError, EstimationError, RelayError},
    estimation::EstimationStrategy,
    fees::VerifierAllowList,
    interactor::{ContractInteractor, Erc20Token, EstimateGasParams},
    price::FixedRateSource,
    relay::RelayServer,
    types::{
        DeployRequest, EnvelopingRequest, EnvelopingTxRequest, ForwardRequest, IERC20,
        RelayData, RelayMetadata, RelayRequest,
    },
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::{
    collections::{HashMap, HashSet},
    str::FromStr,
    sync::Arc,
};

const GAS_PRICE: u64 = 10000;
const TOKEN_X_RATE: Decimal = dec!(0.5);
/// 1e18, a whole token at 18 decimals.
const TOKEN_AMOUNT_TO_TRANSFER: &str = "1000000000000000000";
/// 5e17, the amount committed in enforce requests.
const TOKEN_AMOUNT_IN_REQUEST: &str = "500000000000000000";
const SPONSORED_VERIFIER: Address = Address::repeat_byte(0xaa);

/// Interactor returning figures that add up to a base estimation of 100000:
/// the transfer simulation corrects to 20000 token gas, the relay and
/// deploy simulations contribute 80000.
#[derive(Debug, Clone)]
struct CannedInteractor {
    execution_gas: u64,
}

impl Default for CannedInteractor {
    fn default() -> Self {
        Self { execution_gas: 100 }
    }
}

#[async_trait]
impl ContractInteractor for CannedInteractor {
    async fn chain_id(&self) -> Result<u64, EstimationError> {
        Ok(33)
    }

    async fn network_id(&self) -> Result<String, EstimationError> {
        Ok("33".into())
    }

    async fn network_gas_price(&self) -> Result<U256, EstimationError> {
        Ok(U256::from(GAS_PRICE))
    }

    async fn estimate_gas(&self, _params: EstimateGasParams) -> Result<u64, EstimationError> {
        Ok(self.execution_gas)
    }

    async fn simulate_relay_call(
        &self,
        _request: &RelayRequest,
        _signature: &Bytes,
        _relay_worker: Address,
    ) -> Result<u64, EstimationError> {
        Ok(80000)
    }

    async fn simulate_deploy_call(
        &self,
        _request: &DeployRequest,
        _signature: &Bytes,
        _relay_worker: Address,
    ) -> Result<u64, EstimationError> {
        Ok(80000)
    }

    async fn erc20_token(&self, address: Address) -> Result<Erc20Token, EstimationError> {
        Ok(Erc20Token { address, symbol: "TT".into(), decimals: 18 })
    }

    async fn simulate_token_transfer(
        &self,
        _token: Address,
        _from: Address,
        _to: Address,
        _amount: U256,
    ) -> Result<u64, EstimationError> {
        Ok(40000)
    }

    async fn smart_wallet_address(
        &self,
        _request: &DeployRequest,
    ) -> Result<Address, EstimationError> {
        Ok(Address::repeat_byte(0x57))
    }
}

fn server(config: AppConfig) -> RelayServer {
    server_with_interactor(config, CannedInteractor::default())
}

fn server_with_interactor(config: AppConfig, interactor: CannedInteractor) -> RelayServer {
    RelayServer::new(
        config,
        Arc::new(interactor),
        Arc::new(FixedRateSource::new(HashMap::from([("TT".to_string(), TOKEN_X_RATE)]))),
        Arc::new(VerifierAllowList::new(HashSet::from([SPONSORED_VERIFIER]))),
        Address::ZERO,
    )
}

fn fee_config(transfer_fee_percentage: Option<Decimal>) -> AppConfig {
    AppConfig {
        gas_fee_percentage: dec!(0.1),
        transfer_fee_percentage,
        ..Default::default()
    }
}

fn relay_envelope(verifier: Address, data: Bytes, token_amount: U256) -> EnvelopingTxRequest {
    EnvelopingTxRequest {
        relay_request: EnvelopingRequest::Relay(RelayRequest {
            request: ForwardRequest {
                gas: U256::from(100),
                token_amount,
                data,
                ..Default::default()
            },
            relay_data: RelayData {
                gas_price: U256::from(GAS_PRICE),
                call_verifier: verifier,
                ..Default::default()
            },
        }),
        metadata: RelayMetadata::default(),
    }
}

fn deploy_envelope(verifier: Address) -> EnvelopingTxRequest {
    EnvelopingTxRequest {
        relay_request: EnvelopingRequest::Deploy(DeployRequest {
            relay_data: RelayData {
                gas_price: U256::from(GAS_PRICE),
                call_verifier: verifier,
                ..Default::default()
            },
            ..Default::default()
        }),
        metadata: RelayMetadata::default(),
    }
}

fn transfer_data() -> Bytes {
    use alloy::sol_types::SolCall;
    IERC20::transferCall {
        to: Address::repeat_byte(0x84),
        amount: U256::from_str(TOKEN_AMOUNT_TO_TRANSFER).unwrap(),
    }
    .abi_encode()
    .into()
}

fn transfer_from_data() -> Bytes {
    use alloy::sol_types::SolCall;
    IERC20::transferFromCall {
        from: Address::repeat_byte(0xe8),
        to: Address::repeat_byte(0x84),
        amount: U256::from_str(TOKEN_AMOUNT_TO_TRANSFER).unwrap(),
    }
    .abi_encode()
    .into()
}

mod estimate_max_possible_gas {
    use super::*;

    #[tokio::test]
    async fn charges_no_fee_when_sponsored() {
        let server = server(fee_config(Some(dec!(0.1))));
        let envelope = relay_envelope(SPONSORED_VERIFIER, Bytes::new(), U256::ZERO);

        let quote = server.estimate_max_possible_gas(&envelope).await.unwrap();
        assert_eq!(quote.estimation, "100000");
    }

    #[tokio::test]
    async fn charges_gas_fee_when_transfer_fee_is_zero() {
        let server = server(fee_config(Some(Decimal::ZERO)));
        let envelope = relay_envelope(Address::ZERO, Bytes::new(), U256::ZERO);

        let quote = server.estimate_max_possible_gas(&envelope).await.unwrap();
        assert_eq!(quote.estimation, "110000");
    }

    #[tokio::test]
    async fn charges_gas_fee_when_transfer_fee_is_unset() {
        let server = server(fee_config(None));
        let envelope = relay_envelope(Address::ZERO, Bytes::new(), U256::ZERO);

        let quote = server.estimate_max_possible_gas(&envelope).await.unwrap();
        assert_eq!(quote.estimation, "110000");
    }

    #[tokio::test]
    async fn charges_on_transfer_value_for_a_relayed_transfer() {
        let server = server(fee_config(Some(dec!(0.1))));
        let envelope = relay_envelope(Address::ZERO, transfer_data(), U256::ZERO);

        // Token fee 1e17, as a fraction 0.1, in native 0.05, shifted to wei
        // and divided by the gas price: 5e12 gas on top of the base.
        let quote = server.estimate_max_possible_gas(&envelope).await.unwrap();
        assert_eq!(quote.estimation, "5000000100000");
    }

    #[tokio::test]
    async fn charges_on_transfer_value_for_a_relayed_transfer_from() {
        let server = server(fee_config(Some(dec!(0.1))));
        let envelope = relay_envelope(Address::ZERO, transfer_from_data(), U256::ZERO);

        let quote = server.estimate_max_possible_gas(&envelope).await.unwrap();
        assert_eq!(quote.estimation, "5000000100000");
    }

    #[tokio::test]
    async fn falls_back_to_gas_fee_when_data_is_not_a_transfer() {
        let mut data = transfer_data().to_vec();
        data[0] ^= 0x01;

        let server = server(fee_config(Some(dec!(0.1))));
        let envelope = relay_envelope(Address::ZERO, data.into(), U256::ZERO);

        let quote = server.estimate_max_possible_gas(&envelope).await.unwrap();
        assert_eq!(quote.estimation, "110000");
    }
}

mod get_max_possible_gas {
    use super::*;

    fn committed_amount() -> U256 {
        U256::from_str(TOKEN_AMOUNT_IN_REQUEST).unwrap()
    }

    #[tokio::test]
    async fn charges_no_fee_when_sponsored() {
        let server = server(fee_config(Some(dec!(0.1))));
        let envelope = relay_envelope(SPONSORED_VERIFIER, Bytes::new(), U256::ZERO);

        let required = server.get_max_possible_gas(&envelope).await.unwrap();
        assert_eq!(required, dec!(100000));
    }

    #[tokio::test]
    async fn charges_gas_fee_when_transfer_fee_is_zero() {
        let server = server(fee_config(Some(Decimal::ZERO)));
        let envelope = relay_envelope(Address::ZERO, Bytes::new(), committed_amount());

        let required = server.get_max_possible_gas(&envelope).await.unwrap();
        assert_eq!(required, dec!(110000));
    }

    #[tokio::test]
    async fn charges_gas_fee_when_transfer_fee_is_unset() {
        let server = server(fee_config(None));
        let envelope = relay_envelope(Address::ZERO, Bytes::new(), committed_amount());

        let required = server.get_max_possible_gas(&envelope).await.unwrap();
        assert_eq!(required, dec!(110000));
    }

    #[tokio::test]
    async fn charges_on_transfer_value_for_a_relayed_transfer() {
        let server = server(fee_config(Some(dec!(0.1))));
        let envelope = relay_envelope(Address::ZERO, transfer_data(), committed_amount());

        // The committed 5e17 tokens are worth 2.5e13 gas, above the required
        // 5000000100000.
        let required = server.get_max_possible_gas(&envelope).await.unwrap();
        assert_eq!(required, dec!(5000000100000));
    }

    #[tokio::test]
    async fn charges_on_transfer_value_for_a_relayed_transfer_from() {
        let server = server(fee_config(Some(dec!(0.1))));
        let envelope =
            relay_envelope(Address::ZERO, transfer_from_data(), committed_amount());

        let required = server.get_max_possible_gas(&envelope).await.unwrap();
        assert_eq!(required, dec!(5000000100000));
    }

    #[tokio::test]
    async fn rejects_a_committed_amount_below_the_required_cost() {
        let server = server(fee_config(None));
        // 5e7 tokens are worth 2500 gas, far below the required 110000.
        let envelope =
            relay_envelope(Address::ZERO, Bytes::new(), U256::from(50000000u64));

        let result = server.get_max_possible_gas(&envelope).await;
        assert!(matches!(
            result,
            Err(RelayError::Admission(AdmissionError::InsufficientTokenAmount {
                required,
                agreed,
            })) if required == dec!(110000) && agreed == dec!(2500)
        ));
    }

    #[tokio::test]
    async fn rejects_declared_gas_below_the_estimated_requirement() {
        // The forwarded call estimates to 30000, corrected to 10000, far
        // above the declared 100 even with the 20% tolerance.
        let server = server_with_interactor(
            fee_config(None),
            CannedInteractor { execution_gas: 30000 },
        );
        let envelope = relay_envelope(Address::ZERO, Bytes::new(), committed_amount());

        let result = server.get_max_possible_gas(&envelope).await;
        assert!(matches!(
            result,
            Err(RelayError::Admission(AdmissionError::GasDeviation { estimated, declared }))
                if estimated == dec!(10000) && declared == dec!(100)
        ));
    }

    #[tokio::test]
    async fn rejects_linear_fit_for_deployments() {
        let config = AppConfig {
            estimation_strategy: EstimationStrategy::LinearFit,
            ..fee_config(None)
        };
        let server = server(config);
        let envelope = deploy_envelope(Address::ZERO);

        let result = server.get_max_possible_gas(&envelope).await;
        assert!(matches!(
            result,
            Err(RelayError::Estimation(EstimationError::UnsupportedStrategy))
        ));
    }
}

mod consistency {
    use super::*;

    /// The value obtained from the quote equals the value required on
    /// execution for equivalent inputs.
    #[tokio::test]
    async fn quote_and_enforce_agree() {
        let server = server(fee_config(Some(dec!(0.1))));

        let quoted = server
            .estimate_max_possible_gas(&relay_envelope(
                Address::ZERO,
                transfer_data(),
                U256::ZERO,
            ))
            .await
            .unwrap();
        let required = server
            .get_max_possible_gas(&relay_envelope(
                Address::ZERO,
                transfer_data(),
                U256::from_str(TOKEN_AMOUNT_IN_REQUEST).unwrap(),
            ))
            .await
            .unwrap();

        assert_eq!(quoted.estimation, required.normalize().to_string());
    }

    #[tokio::test]
    async fn quote_and_enforce_agree_on_gas_fees() {
        let server = server(fee_config(None));

        let quoted = server
            .estimate_max_possible_gas(&relay_envelope(Address::ZERO, Bytes::new(), U256::ZERO))
            .await
            .unwrap();
        let required = server
            .get_max_possible_gas(&relay_envelope(
                Address::ZERO,
                Bytes::new(),
                U256::from_str(TOKEN_AMOUNT_IN_REQUEST).unwrap(),
            ))
            .await
            .unwrap();

        assert_eq!(quoted.estimation, required.normalize().to_string());
    }
}
