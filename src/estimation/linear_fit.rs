//! Offline-fitted linear substitute for the full relay hub simulation.

use crate::error::ConversionError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Linear model mapping an internal-call gas estimate and a token payment
/// gas estimate to a total `relayCall` cost.
///
/// Slopes and intercepts are fitted offline against historical relayCall
/// overhead measurements; the defaults are the values of the last
/// calibration run. Subsidized requests (no token payment) follow their own
/// fit because the hub skips the payment transfer entirely for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinearFitModel {
    /// Intercept of the subsidized fit.
    pub subsidized_intercept: Decimal,
    /// Slope of the subsidized fit over the internal-call estimate.
    pub subsidized_slope: Decimal,
    /// Intercept of the paying fit.
    pub intercept: Decimal,
    /// Slope of the paying fit over the internal-call estimate.
    pub internal_gas_slope: Decimal,
    /// Slope of the paying fit over the token payment estimate.
    pub token_gas_slope: Decimal,
}

impl Default for LinearFitModel {
    fn default() -> Self {
        Self {
            subsidized_intercept: dec!(35181.47),
            subsidized_slope: dec!(1.09271),
            intercept: dec!(40576.22),
            internal_gas_slope: dec!(1.12416),
            token_gas_slope: dec!(1.19929),
        }
    }
}

impl LinearFitModel {
    /// Applies the fit to a corrected internal-call estimate and a token
    /// payment estimate.
    pub fn estimate(
        &self,
        internal_gas: Decimal,
        token_gas: Decimal,
    ) -> Result<Decimal, ConversionError> {
        let total = if token_gas.is_zero() {
            self.subsidized_slope
                .checked_mul(internal_gas)
                .and_then(|gas| gas.checked_add(self.subsidized_intercept))
        } else {
            self.internal_gas_slope
                .checked_mul(internal_gas)
                .and_then(|gas| {
                    Some(gas.checked_add(self.token_gas_slope.checked_mul(token_gas)?)?)
                })
                .and_then(|gas| gas.checked_add(self.intercept))
        };
        total.ok_or_else(|| ConversionError::Overflow(internal_gas.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paying_fit_charges_more_than_its_parts() {
        let model = LinearFitModel::default();
        let internal = dec!(16559);
        let token = dec!(16559);

        let total = model.estimate(internal, token).unwrap();
        assert!(total > internal + token);
    }

    #[test]
    fn subsidized_fit_ignores_token_slope() {
        let model = LinearFitModel::default();
        let total = model.estimate(dec!(50000), Decimal::ZERO).unwrap();

        assert_eq!(
            total,
            model.subsidized_slope * dec!(50000) + model.subsidized_intercept
        );
    }

    #[test]
    fn fit_is_monotonic_in_internal_gas() {
        let model = LinearFitModel::default();
        let low = model.estimate(dec!(10000), dec!(16559)).unwrap();
        let high = model.estimate(dec!(20000), dec!(16559)).unwrap();
        assert!(high > low);
    }
}
