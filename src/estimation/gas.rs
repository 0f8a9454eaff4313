//! Estimation strategies and correction primitives.

use crate::{
    constants::{
        ESTIMATED_GAS_CORRECTION_FACTOR, INTERNAL_TRANSACTION_ESTIMATE_CORRECTION,
        TOKEN_TRANSFER_SUBSIDY,
    },
    conversions::decimal_from_u256,
    error::EstimationError,
    estimation::{EstimationStrategy, LinearFitModel},
    interactor::{ContractInteractor, EstimateGasParams},
    types::{EnvelopingRequest, EnvelopingTxRequest},
};
use alloy::primitives::Address;
use rust_decimal::Decimal;
use tracing::instrument;

/// Applies the multiplicative safety margin to a raw simulation result.
///
/// Chain simulators undercount real execution cost under certain opcode and
/// state-access patterns; every raw `relayCall`/`deployCall` figure passes
/// through this before it is trusted. The result is never below the input
/// while the factor is kept >= 1.
pub fn apply_gas_correction_factor(estimation: Decimal) -> Decimal {
    estimation.saturating_mul(ESTIMATED_GAS_CORRECTION_FACTOR)
}

/// Applies the additive correction for simulations of internal calls.
///
/// The simulator prices internal calls (token transfers, forwarded
/// execution) as top-level transactions, overstating them by a roughly
/// constant offset. Estimations at or below the offset are returned
/// unchanged, so the result is never negative and stays monotonic.
pub fn apply_internal_correction(estimation: Decimal) -> Decimal {
    if estimation > INTERNAL_TRANSACTION_ESTIMATE_CORRECTION {
        estimation - INTERNAL_TRANSACTION_ESTIMATE_CORRECTION
    } else {
        estimation
    }
}

/// Raw node estimate of an arbitrary call.
///
/// No correction is applied here: this primitive is reused in different
/// correction contexts and callers pick the one that fits.
pub async fn estimate_max_possible_gas_execution(
    interactor: &dyn ContractInteractor,
    params: EstimateGasParams,
) -> Result<Decimal, EstimationError> {
    Ok(Decimal::from(interactor.estimate_gas(params).await?))
}

/// Estimates the gas cost of the token payment of a request.
///
/// A request that already declares a non-zero `tokenGas` has pre-computed
/// this cost; it is trusted under the same safety margin as any other raw
/// figure and no simulation is performed. Otherwise the payment transfer is
/// simulated from the paying wallet: the forwarder for relays, the still
/// counterfactual smart wallet for deploys (resolved through the factory
/// first). A simulation that prices the transfer at zero is replaced by the
/// subsidy floor; a zero charge would be economically wrong.
#[instrument(skip_all)]
pub async fn estimate_max_possible_gas_token_transfer(
    interactor: &dyn ContractInteractor,
    request: &EnvelopingRequest,
) -> Result<Decimal, EstimationError> {
    let declared_token_gas = request.token_gas();
    if !declared_token_gas.is_zero() {
        return Ok(apply_gas_correction_factor(decimal_from_u256(declared_token_gas)?));
    }

    let token = interactor.erc20_token(request.token_contract()).await?;
    let from = match request {
        EnvelopingRequest::Relay(relay) => relay.relay_data.call_forwarder,
        EnvelopingRequest::Deploy(deploy) => interactor.smart_wallet_address(deploy).await?,
    };

    let simulated = interactor
        .simulate_token_transfer(
            token.address,
            from,
            request.relay_data().relay_worker,
            request.token_amount(),
        )
        .await?;

    let corrected = apply_internal_correction(Decimal::from(simulated));
    if corrected.is_zero() {
        return Ok(TOKEN_TRANSFER_SUBSIDY);
    }
    Ok(corrected)
}

/// Default strategy: one full `relayCall`/`deployCall` simulation against
/// the relay hub with the resolved worker as sender.
///
/// Returns `token_gas + corrected simulation`; callers that already hold a
/// token payment estimate pass it in so it is only computed once.
#[instrument(skip_all)]
pub async fn standard_max_possible_gas_estimation(
    interactor: &dyn ContractInteractor,
    envelope: &EnvelopingTxRequest,
    relay_worker: Address,
    token_gas: Decimal,
) -> Result<Decimal, EstimationError> {
    let signature = &envelope.metadata.signature;
    let simulated = match &envelope.relay_request {
        EnvelopingRequest::Relay(request) => {
            interactor.simulate_relay_call(request, signature, relay_worker).await?
        }
        EnvelopingRequest::Deploy(request) => {
            interactor.simulate_deploy_call(request, signature, relay_worker).await?
        }
    };

    Ok(token_gas + apply_gas_correction_factor(Decimal::from(simulated)))
}

/// Linear-fit strategy: trades the full hub simulation for a cheaper
/// internal-call estimate plus an offline-fitted approximation.
///
/// Only supported for relay requests; a deploy has no forwarded call to fit
/// against and fails without performing any simulation.
#[instrument(skip_all)]
pub async fn linear_fit_max_possible_gas_estimation(
    interactor: &dyn ContractInteractor,
    request: &EnvelopingRequest,
    token_gas: Decimal,
    model: &LinearFitModel,
) -> Result<Decimal, EstimationError> {
    let EnvelopingRequest::Relay(relay) = request else {
        return Err(EstimationError::UnsupportedStrategy);
    };

    let params = EstimateGasParams {
        from: relay.relay_data.call_forwarder,
        to: relay.request.to,
        data: relay.request.data.clone(),
        gas_price: relay.relay_data.gas_price,
    };
    let internal =
        apply_internal_correction(estimate_max_possible_gas_execution(interactor, params).await?);

    Ok(model.estimate(internal, token_gas)?)
}

/// Execution-only strategy: the corrected estimate of the forwarded call
/// plus the token payment, without any hub overhead.
///
/// Relay requests only, like the linear fit: a deploy has no forwarded call
/// to estimate.
#[instrument(skip_all)]
pub async fn execution_only_max_possible_gas_estimation(
    interactor: &dyn ContractInteractor,
    request: &EnvelopingRequest,
    token_gas: Decimal,
) -> Result<Decimal, EstimationError> {
    let EnvelopingRequest::Relay(relay) = request else {
        return Err(EstimationError::UnsupportedStrategy);
    };

    let params = EstimateGasParams {
        from: relay.relay_data.call_forwarder,
        to: relay.request.to,
        data: relay.request.data.clone(),
        gas_price: relay.relay_data.gas_price,
    };
    let internal =
        apply_internal_correction(estimate_max_possible_gas_execution(interactor, params).await?);

    Ok(token_gas + internal)
}

/// The default estimation entry point: token payment estimate followed by
/// the standard hub simulation.
#[instrument(skip_all)]
pub async fn estimate_max_possible_gas(
    interactor: &dyn ContractInteractor,
    envelope: &EnvelopingTxRequest,
    relay_worker: Address,
) -> Result<Decimal, EstimationError> {
    let token_gas =
        estimate_max_possible_gas_token_transfer(interactor, &envelope.relay_request).await?;
    standard_max_possible_gas_estimation(interactor, envelope, relay_worker, token_gas).await
}

/// Dispatches to the configured estimation strategy.
pub async fn estimate_with_strategy(
    strategy: EstimationStrategy,
    model: &LinearFitModel,
    interactor: &dyn ContractInteractor,
    envelope: &EnvelopingTxRequest,
    relay_worker: Address,
) -> Result<Decimal, EstimationError> {
    match strategy {
        EstimationStrategy::Standard => {
            estimate_max_possible_gas(interactor, envelope, relay_worker).await
        }
        EstimationStrategy::LinearFit => {
            if envelope.relay_request.is_deploy() {
                return Err(EstimationError::UnsupportedStrategy);
            }
            let token_gas =
                estimate_max_possible_gas_token_transfer(interactor, &envelope.relay_request)
                    .await?;
            linear_fit_max_possible_gas_estimation(
                interactor,
                &envelope.relay_request,
                token_gas,
                model,
            )
            .await
        }
        EstimationStrategy::ExecutionOnly => {
            if envelope.relay_request.is_deploy() {
                return Err(EstimationError::UnsupportedStrategy);
            }
            let token_gas =
                estimate_max_possible_gas_token_transfer(interactor, &envelope.relay_request)
                    .await?;
            execution_only_max_possible_gas_estimation(
                interactor,
                &envelope.relay_request,
                token_gas,
            )
            .await
        }
    }
}
