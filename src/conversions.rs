//! Fixed-point conversions between token units, native-currency units and gas
//! units.
//!
//! Every monetary quantity in the engine is a [`Decimal`]; scaling between
//! precisions is always a decimal shift through [`to_precision`] so the same
//! rounding behavior applies on the quoting and the charging path. Nothing in
//! this module goes through a native float.

use crate::{constants::NATIVE_CURRENCY_DECIMALS, error::ConversionError};
use alloy::primitives::U256;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Largest decimal shift [`to_precision`] supports, bounded by the 96-bit
/// mantissa of [`Decimal`].
const MAX_SHIFT: u32 = 28;

/// Shifts `value` by `precision` decimal places.
///
/// A positive `precision` scales up (`x * 10^p`), a negative one scales down
/// (`x * 10^-p`). Scaling down is implemented as an exact multiplication by a
/// sub-unit factor rather than a division.
pub fn to_precision(value: Decimal, precision: i32) -> Result<Decimal, ConversionError> {
    if precision == 0 {
        return Ok(value);
    }

    let magnitude = precision.unsigned_abs();
    if magnitude > MAX_SHIFT {
        return Err(ConversionError::ShiftOutOfRange(precision));
    }

    let factor = if precision > 0 {
        Decimal::from_i128_with_scale(10i128.pow(magnitude), 0)
    } else {
        Decimal::from_i128_with_scale(1, magnitude)
    };

    value.checked_mul(factor).ok_or_else(|| ConversionError::Overflow(value.to_string()))
}

/// Converts a token amount in minor units into native currency wei.
///
/// The amount is shifted down by the token's declared decimals, multiplied by
/// the token-to-native exchange rate and shifted back up to full native
/// precision.
pub fn to_native_wei(
    amount: Decimal,
    exchange_rate: Decimal,
    token_decimals: u8,
) -> Result<Decimal, ConversionError> {
    let fraction = to_precision(amount, -(i32::from(token_decimals)))?;
    let in_native = fraction
        .checked_mul(exchange_rate)
        .ok_or_else(|| ConversionError::Overflow(fraction.to_string()))?;
    to_precision(in_native, NATIVE_CURRENCY_DECIMALS as i32)
}

/// Converts an [`U256`] wire quantity into a [`Decimal`].
///
/// Values beyond the 96-bit decimal mantissa surface as a typed error instead
/// of truncating.
pub fn decimal_from_u256(value: U256) -> Result<Decimal, ConversionError> {
    Decimal::from_str(&value.to_string())
        .map_err(|_| ConversionError::Overflow(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn shifts_up_and_down() {
        assert_eq!(to_precision(dec!(0.05), 18).unwrap(), dec!(50000000000000000));
        assert_eq!(to_precision(dec!(100000000000000000), -18).unwrap(), dec!(0.1));
        assert_eq!(to_precision(dec!(42), 0).unwrap(), dec!(42));
    }

    #[test]
    fn rejects_shift_beyond_mantissa() {
        assert!(matches!(
            to_precision(dec!(1), 29),
            Err(ConversionError::ShiftOutOfRange(29))
        ));
        assert!(matches!(
            to_precision(dec!(1), -29),
            Err(ConversionError::ShiftOutOfRange(-29))
        ));
    }

    #[test]
    fn token_amount_to_native_wei() {
        // 0.5 tokens at a rate of 0.5 natives per token is 0.25 natives.
        let wei = to_native_wei(dec!(500000000000000000), dec!(0.5), 18).unwrap();
        assert_eq!(wei, dec!(250000000000000000));
    }

    #[test]
    fn u256_conversion_is_exact() {
        let value = U256::from(10).pow(U256::from(18));
        assert_eq!(decimal_from_u256(value).unwrap(), dec!(1000000000000000000));

        // 2^255 does not fit the 96-bit mantissa.
        assert!(decimal_from_u256(U256::MAX >> 1).is_err());
    }
}
