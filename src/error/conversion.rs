use thiserror::Error;

/// Errors raised by fixed-point conversions.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// A decimal shift was requested beyond the supported mantissa.
    #[error("decimal shift out of range: {0}")]
    ShiftOutOfRange(i32),
    /// A value does not fit the decimal mantissa.
    #[error("decimal value out of range: {0}")]
    Overflow(String),
    /// The request carries a zero gas price, which no fee can be divided by.
    #[error("request gas price is zero")]
    ZeroGasPrice,
}
