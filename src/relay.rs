//! Admission gate.
//!
//! The two public entry points of the engine: [`RelayServer::estimate_max_possible_gas`]
//! quotes the total gas a request will be charged for, and
//! [`RelayServer::get_max_possible_gas`] enforces it before execution. Both
//! run the identical sponsorship/fee decision tree over the same inputs, so
//! for equivalent requests the enforced figure equals the quoted one.
//!
//! Each request is evaluated independently; there is no state here and no
//! internal synchronization. The actual sources of cross-request contention
//! (worker keys, nonces, persistence) live with external collaborators.

use crate::{
    config::AppConfig,
    conversions::{decimal_from_u256, to_native_wei},
    error::{AdmissionError, ConversionError, EstimationError, RelayError},
    estimation::{
        apply_internal_correction, estimate_max_possible_gas_execution, estimate_with_strategy,
    },
    fees::{SponsorshipPolicy, calculate_fee},
    interactor::{ContractInteractor, EstimateGasParams},
    metrics::{AdmissionOutcome, record_admission},
    price::ExchangeRateSource,
    types::{EnvelopingRequest, EnvelopingTxRequest, GasEstimationResult},
};
use alloy::primitives::Address;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, instrument};

/// The estimation and admission engine.
///
/// Stateless aside from read-only collaborator calls and safe to share
/// across concurrent requests.
#[derive(Clone)]
pub struct RelayServer {
    config: AppConfig,
    interactor: Arc<dyn ContractInteractor>,
    rates: Arc<dyn ExchangeRateSource>,
    sponsorship: Arc<dyn SponsorshipPolicy>,
    relay_worker: Address,
}

impl RelayServer {
    /// Creates a new engine over the given collaborators. `relay_worker` is
    /// the address hub simulations are sent from; its key custody lives
    /// outside this service.
    pub fn new(
        config: AppConfig,
        interactor: Arc<dyn ContractInteractor>,
        rates: Arc<dyn ExchangeRateSource>,
        sponsorship: Arc<dyn SponsorshipPolicy>,
        relay_worker: Address,
    ) -> Self {
        Self { config, interactor, rates, sponsorship, relay_worker }
    }

    /// Quotes the total gas the request will be charged for, fee inclusive.
    #[instrument(skip_all)]
    pub async fn estimate_max_possible_gas(
        &self,
        envelope: &EnvelopingTxRequest,
    ) -> Result<GasEstimationResult, RelayError> {
        let (estimation, _) = self.quoted_gas(envelope).await.inspect_err(record_rejection)?;
        Ok(GasEstimationResult { estimation: estimation.normalize().to_string() })
    }

    /// Validates the request against what the user declared and returns the
    /// gas figure the execution will be charged for.
    ///
    /// Rejects when the declared gas deviates too much from the estimated
    /// requirement, or when the agreed token amount cannot cover the
    /// required cost. On success the figure equals what
    /// [`Self::estimate_max_possible_gas`] quotes for the same inputs.
    #[instrument(skip_all)]
    pub async fn get_max_possible_gas(
        &self,
        envelope: &EnvelopingTxRequest,
    ) -> Result<Decimal, RelayError> {
        let result = self.enforce(envelope).await;
        match &result {
            Ok((_, sponsored)) => record_admission(if *sponsored {
                AdmissionOutcome::AcceptedSponsored
            } else {
                AdmissionOutcome::AcceptedFeeCharged
            }),
            Err(err) => record_rejection(err),
        }
        result.map(|(gas, _)| gas)
    }

    async fn enforce(
        &self,
        envelope: &EnvelopingTxRequest,
    ) -> Result<(Decimal, bool), RelayError> {
        self.validate_gas_amount(envelope).await?;

        let (max_possible_gas, sponsored) = self.quoted_gas(envelope).await?;
        if !sponsored {
            self.validate_token_amount(max_possible_gas, &envelope.relay_request).await?;
        }
        Ok((max_possible_gas, sponsored))
    }

    /// The shared quote: base estimate plus fee, or the base alone for
    /// sponsored requests.
    async fn quoted_gas(
        &self,
        envelope: &EnvelopingTxRequest,
    ) -> Result<(Decimal, bool), RelayError> {
        let base = estimate_with_strategy(
            self.config.estimation_strategy,
            &self.config.linear_fit,
            self.interactor.as_ref(),
            envelope,
            self.relay_worker,
        )
        .await?;

        if self.sponsorship.is_sponsorship_allowed(&envelope.relay_request) {
            debug!(%base, "request is sponsored, no fee charged");
            return Ok((base, true));
        }

        let fee = calculate_fee(
            self.interactor.as_ref(),
            self.rates.as_ref(),
            &envelope.relay_request,
            base,
            &self.config,
        )
        .await?;
        debug!(%base, %fee, "charging fee");

        let total = base
            .checked_add(fee)
            .ok_or_else(|| ConversionError::Overflow(base.to_string()))?;
        Ok((total, false))
    }

    /// Rejects relay requests whose declared gas falls below the tolerated
    /// deviation from the estimated cost of the forwarded call.
    ///
    /// Deploy requests are exempt: their wallet does not exist yet, so there
    /// is no forwarded call to estimate against.
    async fn validate_gas_amount(
        &self,
        envelope: &EnvelopingTxRequest,
    ) -> Result<(), RelayError> {
        let EnvelopingRequest::Relay(relay) = &envelope.relay_request else {
            return Ok(());
        };

        let params = EstimateGasParams {
            from: relay.relay_data.call_forwarder,
            to: relay.request.to,
            data: relay.request.data.clone(),
            gas_price: relay.relay_data.gas_price,
        };
        let estimated = apply_internal_correction(
            estimate_max_possible_gas_execution(self.interactor.as_ref(), params).await?,
        );

        let declared = decimal_from_u256(relay.request.gas)?;
        let max_agreed = declared
            .checked_mul(Decimal::ONE + self.config.max_estimated_gas_deviation)
            .ok_or_else(|| ConversionError::Overflow(declared.to_string()))?;

        if estimated > max_agreed {
            return Err(AdmissionError::GasDeviation { estimated, declared }.into());
        }
        Ok(())
    }

    /// Rejects requests whose agreed token amount, converted to gas units,
    /// cannot cover the required cost.
    async fn validate_token_amount(
        &self,
        required: Decimal,
        request: &EnvelopingRequest,
    ) -> Result<(), RelayError> {
        let token = self.interactor.erc20_token(request.token_contract()).await?;
        let exchange_rate = self.rates.rate_of(&token.symbol).await?;

        let agreed_native = to_native_wei(
            decimal_from_u256(request.token_amount())?,
            exchange_rate,
            token.decimals,
        )?;
        let gas_price = decimal_from_u256(request.relay_data().gas_price)?;
        let agreed =
            agreed_native.checked_div(gas_price).ok_or(ConversionError::ZeroGasPrice)?;

        if agreed < required {
            return Err(AdmissionError::InsufficientTokenAmount { required, agreed }.into());
        }
        Ok(())
    }
}

fn record_rejection(err: &RelayError) {
    match err {
        RelayError::Admission(AdmissionError::GasDeviation { .. }) => {
            record_admission(AdmissionOutcome::RejectedGasDeviation)
        }
        RelayError::Admission(AdmissionError::InsufficientTokenAmount { .. }) => {
            record_admission(AdmissionOutcome::RejectedInsufficientValue)
        }
        RelayError::Estimation(EstimationError::UnsupportedStrategy) => {
            record_admission(AdmissionOutcome::RejectedUnsupportedStrategy)
        }
        _ => {}
    }
}
