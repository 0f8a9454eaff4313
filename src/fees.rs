//! Fee engine.
//!
//! Decides whether a request is sponsored and, if not, computes the fee on
//! top of the base gas estimate: either a percentage of the detected token
//! transfer value (converted to gas-equivalent units through the exchange
//! rate) or a percentage of the base gas. The same function backs the quote
//! and the charge path; any divergence between the two is a defect.

use crate::{
    config::AppConfig,
    constants::NATIVE_CURRENCY_DECIMALS,
    conversions::{decimal_from_u256, to_precision},
    error::{ConversionError, RelayError},
    interactor::ContractInteractor,
    price::ExchangeRateSource,
    types::{EnvelopingRequest, TokenTransfer},
};
use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Pluggable sponsorship decision.
///
/// The engine only consumes the verdict; the policy itself (a verifier
/// allow-list, an on-chain check) lives with the operator.
pub trait SponsorshipPolicy: Send + Sync {
    /// Whether the request is relayed free of charge.
    fn is_sponsorship_allowed(&self, request: &EnvelopingRequest) -> bool;
}

/// Sponsors every request whose verifier is on the allow-list.
#[derive(Debug, Clone, Default)]
pub struct VerifierAllowList {
    verifiers: HashSet<Address>,
}

impl VerifierAllowList {
    /// Creates a policy sponsoring requests approved by the given verifiers.
    pub fn new(verifiers: HashSet<Address>) -> Self {
        Self { verifiers }
    }
}

impl SponsorshipPolicy for VerifierAllowList {
    fn is_sponsorship_allowed(&self, request: &EnvelopingRequest) -> bool {
        self.verifiers.contains(&request.relay_data().call_verifier)
    }
}

/// Computes the fee charged on top of `base` gas for a non-sponsored
/// request.
///
/// The transfer-value fee applies only when a transfer percentage is
/// configured above zero *and* the forwarded call data is a recognized
/// ERC20 transfer; everything else falls back to the gas percentage,
/// including an unset or zero gas percentage meaning no fee at all.
#[instrument(skip_all)]
pub async fn calculate_fee(
    interactor: &dyn ContractInteractor,
    rates: &dyn ExchangeRateSource,
    request: &EnvelopingRequest,
    base: Decimal,
    config: &AppConfig,
) -> Result<Decimal, RelayError> {
    if let Some(percentage) = config.transfer_fee_percentage.filter(|p| !p.is_zero())
        && let Some(transfer) = TokenTransfer::decode(request.data())
    {
        debug!(?transfer, "charging fee on transfer value");
        return fee_from_transfer(interactor, rates, request, transfer.amount(), percentage)
            .await;
    }

    Ok(fee_from_gas(base, config.gas_fee_percentage)?)
}

/// Fee as a percentage of the transferred token value, expressed in gas
/// units.
///
/// The token fee is shifted by the token's declared decimals to a fractional
/// token amount, converted to native currency through the current exchange
/// rate, shifted back to full native precision and divided by the request's
/// gas price.
async fn fee_from_transfer(
    interactor: &dyn ContractInteractor,
    rates: &dyn ExchangeRateSource,
    request: &EnvelopingRequest,
    amount: U256,
    percentage: Decimal,
) -> Result<Decimal, RelayError> {
    let token = interactor.erc20_token(request.token_contract()).await?;
    let exchange_rate = rates.rate_of(&token.symbol).await?;

    let token_fee = decimal_from_u256(amount)?
        .checked_mul(percentage)
        .ok_or_else(|| ConversionError::Overflow(amount.to_string()))?;
    let fee_as_fraction = to_precision(token_fee, -(i32::from(token.decimals)))?;
    let fee_in_native = to_precision(
        fee_as_fraction
            .checked_mul(exchange_rate)
            .ok_or_else(|| ConversionError::Overflow(fee_as_fraction.to_string()))?,
        NATIVE_CURRENCY_DECIMALS as i32,
    )?;

    let gas_price = decimal_from_u256(request.relay_data().gas_price)?;
    let fee = fee_in_native.checked_div(gas_price).ok_or(ConversionError::ZeroGasPrice)?;
    Ok(fee)
}

/// Fee as a percentage of the base gas estimate.
fn fee_from_gas(base: Decimal, percentage: Decimal) -> Result<Decimal, ConversionError> {
    base.checked_mul(percentage).ok_or_else(|| ConversionError::Overflow(base.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RelayData, RelayRequest};
    use rust_decimal_macros::dec;

    #[test]
    fn gas_fee_is_a_straight_percentage() {
        assert_eq!(fee_from_gas(dec!(100000), dec!(0.1)).unwrap(), dec!(10000));
        assert_eq!(fee_from_gas(dec!(100000), Decimal::ZERO).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn allow_list_sponsors_only_known_verifiers() {
        let sponsored_verifier = Address::repeat_byte(0xaa);
        let policy = VerifierAllowList::new(HashSet::from([sponsored_verifier]));

        let mut request = EnvelopingRequest::Relay(RelayRequest {
            relay_data: RelayData { call_verifier: sponsored_verifier, ..Default::default() },
            ..Default::default()
        });
        assert!(policy.is_sponsorship_allowed(&request));

        let EnvelopingRequest::Relay(relay) = &mut request else { unreachable!() };
        relay.relay_data.call_verifier = Address::repeat_byte(0xbb);
        assert!(!policy.is_sponsorship_allowed(&request));
    }
}
